//! Approximate text matching and relevance ranking.
//!
//! A term matches a field when some substring of the field is within
//! `floor(len(term) * tolerance)` edits of the term. The field score is
//! `1 - edits / len(term)`, so an exact substring scores 1.0 wherever it
//! occurs. Field scores are combined into a weighted mean over the fields a
//! record actually has.

use tracing::trace;

use crate::catalog::Product;
use crate::search::config::SearchConfig;
use crate::search::results::ScoredProduct;

/// Smallest edit distance between `pattern` and any substring of `text`.
///
/// Classic dynamic programme with a free starting column, so a match may
/// begin and end anywhere in `text`. Runs in `O(len(pattern) * len(text))`
/// time and `O(len(pattern))` space.
pub fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();
    if m == 0 {
        return 0;
    }

    // col[i] = distance between pattern[..i] and the best substring ending
    // at the current text position.
    let mut col: Vec<usize> = (0..=m).collect();
    let mut best = m;

    for &tc in text {
        let mut diag = col[0];
        col[0] = 0;
        for i in 1..=m {
            let left = col[i];
            let cost = usize::from(pattern[i - 1] != tc);
            col[i] = (diag + cost).min(left + 1).min(col[i - 1] + 1);
            diag = left;
        }
        best = best.min(col[m]);
        if best == 0 {
            break;
        }
    }
    best
}

/// A compiled search term.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    pattern: Vec<char>,
    max_errors: usize,
    min_chars: usize,
    case_sensitive: bool,
}

impl FuzzyMatcher {
    pub fn new(term: &str, config: &SearchConfig) -> Self {
        let term = term.trim();
        let pattern: Vec<char> = if config.case_sensitive {
            term.chars().collect()
        } else {
            term.to_lowercase().chars().collect()
        };
        let max_errors = config.allowed_errors(pattern.len());

        Self {
            pattern,
            max_errors,
            min_chars: config.min_match_chars,
            case_sensitive: config.case_sensitive,
        }
    }

    /// Term length in characters.
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Edits a match may contain.
    pub fn max_errors(&self) -> usize {
        self.max_errors
    }

    /// Whether the term is long enough to be matched at all.
    pub fn is_searchable(&self) -> bool {
        !self.pattern.is_empty() && self.pattern.len() >= self.min_chars
    }

    /// Edit count of the best match in `text`, if within tolerance.
    pub fn find(&self, text: &str) -> Option<usize> {
        if !self.is_searchable() {
            return None;
        }
        let haystack: Vec<char> = if self.case_sensitive {
            text.chars().collect()
        } else {
            text.to_lowercase().chars().collect()
        };
        let distance = substring_distance(&self.pattern, &haystack);
        (distance <= self.max_errors).then_some(distance)
    }

    /// Match quality in `[0, 1]`; zero when there is no match within tolerance.
    pub fn score(&self, text: &str) -> f64 {
        match self.find(text) {
            Some(distance) => 1.0 - distance as f64 / self.pattern.len() as f64,
            None => 0.0,
        }
    }
}

/// Per-field scores for one product. `None` marks a field the product lacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScores {
    pub name: Option<f64>,
    pub description: Option<f64>,
    pub category: Option<f64>,
}

impl FieldScores {
    /// Weighted mean over present fields.
    pub fn composite(&self, config: &SearchConfig) -> f64 {
        let fields = [
            (self.name, config.name_weight),
            (self.description, config.description_weight),
            (self.category, config.category_weight),
        ];

        let (weighted, total) = fields
            .iter()
            .filter_map(|(score, weight)| score.map(|s| (s * weight, *weight)))
            .fold((0.0, 0.0), |(ws, wt), (s, w)| (ws + s, wt + w));

        if total > 0.0 {
            weighted / total
        } else {
            0.0
        }
    }
}

/// Scores candidates against a term and discards non-matches.
#[derive(Debug, Clone)]
pub struct Ranker<'a> {
    matcher: FuzzyMatcher,
    config: &'a SearchConfig,
}

impl<'a> Ranker<'a> {
    pub fn new(term: &str, config: &'a SearchConfig) -> Self {
        Self {
            matcher: FuzzyMatcher::new(term, config),
            config,
        }
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    /// Score each field of `product`.
    pub fn field_scores(&self, product: &Product) -> FieldScores {
        let field = |text: &str| {
            if text.trim().is_empty() {
                None
            } else {
                Some(self.matcher.score(text))
            }
        };

        FieldScores {
            name: field(&product.name),
            description: product.description_text().and_then(field),
            category: field(&product.category),
        }
    }

    /// Composite relevance of `product` in `[0, 1]`.
    pub fn score(&self, product: &Product) -> f64 {
        self.field_scores(product).composite(self.config)
    }

    /// Keep candidates with a positive composite score, in input order.
    pub fn rank(&self, candidates: Vec<Product>) -> Vec<ScoredProduct> {
        if !self.matcher.is_searchable() {
            trace!(chars = self.matcher.len(), "term too short to match");
            return Vec::new();
        }

        candidates
            .into_iter()
            .filter_map(|product| {
                let score = self.score(&product);
                (score > 0.0).then(|| ScoredProduct::scored(product, score))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn product(name: &str, description: Option<&str>, category: &str) -> Product {
        let mut p = Product::new(name, category, 10.0);
        p.description = description.map(String::from);
        p
    }

    #[test]
    fn test_substring_distance() {
        assert_eq!(substring_distance(&chars("mouse"), &chars("wireless mouse")), 0);
        assert_eq!(substring_distance(&chars("mose"), &chars("wireless mouse")), 1);
        assert_eq!(substring_distance(&chars("wireles mose"), &chars("wireless mouse")), 2);
        assert_eq!(substring_distance(&chars("mpuse"), &chars("a mouse")), 1);
        assert_eq!(substring_distance(&chars("abc"), &chars("")), 3);
        assert_eq!(substring_distance(&chars(""), &chars("anything")), 0);
    }

    #[test]
    fn test_best_of_several_occurrences_wins() {
        // The second occurrence is exact; the first needs an edit.
        assert_eq!(substring_distance(&chars("laptop"), &chars("lapdop bag for laptop")), 0);
    }

    #[test]
    fn test_matcher_is_case_insensitive_by_default() {
        let config = SearchConfig::default();
        let matcher = FuzzyMatcher::new("WIRELESS", &config);
        assert_eq!(matcher.score("Wireless Mouse"), 1.0);

        let strict = SearchConfig {
            case_sensitive: true,
            ..Default::default()
        };
        let matcher = FuzzyMatcher::new("WIRELESS", &strict);
        assert_eq!(matcher.score("Wireless Mouse"), 0.0);
    }

    #[test]
    fn test_tolerance_boundary() {
        let config = SearchConfig::default();
        // 10 characters allow 3 edits.
        let matcher = FuzzyMatcher::new("abcdefghij", &config);
        assert_eq!(matcher.max_errors(), 3);
        assert_eq!(matcher.find("abcXeXgXij"), Some(3));
        assert!((matcher.score("abcXeXgXij") - 0.7).abs() < 1e-12);
        assert_eq!(matcher.find("aXcXeXgXij"), None);
        assert_eq!(matcher.score("aXcXeXgXij"), 0.0);
    }

    #[test]
    fn test_short_terms_never_match() {
        let config = SearchConfig::default();
        let matcher = FuzzyMatcher::new("a", &config);
        assert!(!matcher.is_searchable());
        assert_eq!(matcher.score("a"), 0.0);

        // Two characters allow zero edits: exact substring only.
        let matcher = FuzzyMatcher::new("tv", &config);
        assert_eq!(matcher.score("Smart TV 55"), 1.0);
        assert_eq!(matcher.score("Smart TB 55"), 0.0);
    }

    #[test]
    fn test_composite_excludes_missing_fields() {
        let config = SearchConfig::default();
        let scores = FieldScores {
            name: Some(1.0),
            description: None,
            category: Some(0.0),
        };
        assert!((scores.composite(&config) - 0.7 / 0.8).abs() < 1e-12);

        let scores = FieldScores {
            name: Some(1.0),
            description: Some(0.0),
            category: Some(0.0),
        };
        assert!((scores.composite(&config) - 0.7).abs() < 1e-12);

        let none = FieldScores {
            name: None,
            description: None,
            category: None,
        };
        assert_eq!(none.composite(&config), 0.0);
    }

    #[test]
    fn test_two_typos_still_match() {
        let config = SearchConfig::default();
        let ranker = Ranker::new("wireles mose", &config);
        let mouse = product("Wireless Mouse", None, "Electronics");
        let scores = ranker.field_scores(&mouse);
        assert!((scores.name.unwrap() - (1.0 - 2.0 / 12.0)).abs() < 1e-12);
        assert_eq!(scores.description, None);
        assert!(ranker.score(&mouse) > 0.0);
    }

    #[test]
    fn test_rank_discards_non_matches_and_keeps_order() {
        let config = SearchConfig::default();
        let ranker = Ranker::new("keyboard", &config);
        let ranked = ranker.rank(vec![
            product("Gaming Keyboard", None, "Electronics"),
            product("Desk Lamp", Some("Warm light"), "Home"),
            product("Wrist Rest", Some("Fits any keybord"), "Accessories"),
        ]);
        let names: Vec<&str> = ranked.iter().map(|s| s.product.name.as_str()).collect();
        assert_eq!(names, vec!["Gaming Keyboard", "Wrist Rest"]);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_category_only_match_is_kept() {
        let config = SearchConfig::default();
        let ranker = Ranker::new("books", &config);
        let ranked = ranker.rank(vec![product("The Hobbit", Some("A novel"), "Books")]);
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].score.unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_nonsense_term_matches_nothing() {
        let config = SearchConfig::default();
        let ranker = Ranker::new("xyz-nonexistent", &config);
        let ranked = ranker.rank(vec![
            product("Wireless Mouse", Some("Ergonomic mouse with USB receiver"), "Electronics"),
            product("Rust Book", Some("Systems programming"), "Books"),
        ]);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_scores_are_deterministic() {
        let config = SearchConfig::default();
        let ranker = Ranker::new("lamp", &config);
        let p = product("Desk Lamp", Some("LED lamp with clamp"), "Home");
        let first = ranker.score(&p);
        for _ in 0..10 {
            assert_eq!(ranker.score(&p), first);
        }
    }
}
