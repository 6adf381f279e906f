//! Search tuning knobs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Ranking and pagination settings.
///
/// The defaults are the production contract: name 0.7, description 0.2,
/// category 0.1, a 30% edit tolerance and a two-character minimum term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_name_weight")]
    pub name_weight: f64,
    #[serde(default = "default_description_weight")]
    pub description_weight: f64,
    #[serde(default = "default_category_weight")]
    pub category_weight: f64,
    /// Fraction of the term length that may be edited and still match.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Terms shorter than this (in characters) never match.
    #[serde(default = "default_min_match_chars")]
    pub min_match_chars: usize,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

fn default_name_weight() -> f64 {
    0.7
}

fn default_description_weight() -> f64 {
    0.2
}

fn default_category_weight() -> f64 {
    0.1
}

fn default_tolerance() -> f64 {
    0.3
}

fn default_min_match_chars() -> usize {
    2
}

fn default_limit() -> u32 {
    10
}

fn default_max_limit() -> u32 {
    100
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            name_weight: default_name_weight(),
            description_weight: default_description_weight(),
            category_weight: default_category_weight(),
            tolerance: default_tolerance(),
            min_match_chars: default_min_match_chars(),
            case_sensitive: false,
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl SearchConfig {
    /// Load from a TOML or JSON file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = if path.extension().map_or(false, |e| e == "json") {
            serde_json::from_str(&content)
                .map_err(|e| CatalogError::InvalidConfig(e.to_string()))?
        } else {
            toml::from_str(&content).map_err(|e| CatalogError::InvalidConfig(e.to_string()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the ranker cannot work with.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let weights = [self.name_weight, self.description_weight, self.category_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CatalogError::InvalidConfig(
                "field weights must be finite and non-negative".into(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(CatalogError::InvalidConfig(
                "at least one field weight must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(CatalogError::InvalidConfig(format!(
                "tolerance must be within 0..=1, got {}",
                self.tolerance
            )));
        }
        if self.max_limit == 0 || self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(CatalogError::InvalidConfig(format!(
                "default_limit ({}) must be within 1..={}",
                self.default_limit, self.max_limit
            )));
        }
        Ok(())
    }

    /// Number of edits a term of `term_len` characters may absorb.
    pub fn allowed_errors(&self, term_len: usize) -> usize {
        // The epsilon keeps 0.3 * 10 from flooring to 2.
        ((term_len as f64) * self.tolerance + 1e-9).floor() as usize
    }

    /// Clamp a requested page size into `1..=max_limit`.
    pub fn clamp_limit(&self, limit: u32) -> u32 {
        limit.clamp(1, self.max_limit.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.name_weight, 0.7);
        assert_eq!(config.description_weight, 0.2);
        assert_eq!(config.category_weight, 0.1);
        assert_eq!(config.tolerance, 0.3);
        assert_eq!(config.min_match_chars, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_allowed_errors_boundaries() {
        let config = SearchConfig::default();
        assert_eq!(config.allowed_errors(2), 0);
        assert_eq!(config.allowed_errors(3), 0);
        assert_eq!(config.allowed_errors(4), 1);
        assert_eq!(config.allowed_errors(6), 1);
        assert_eq!(config.allowed_errors(7), 2);
        assert_eq!(config.allowed_errors(10), 3);
        assert_eq!(config.allowed_errors(12), 3);
        assert_eq!(config.allowed_errors(20), 6);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SearchConfig = toml::from_str("tolerance = 0.2\nmax_limit = 50").unwrap();
        assert_eq!(config.tolerance, 0.2);
        assert_eq!(config.max_limit, 50);
        assert_eq!(config.name_weight, 0.7);
        assert_eq!(config.default_limit, 10);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = SearchConfig {
            tolerance: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.tolerance = 0.3;
        config.name_weight = 0.0;
        config.description_weight = 0.0;
        config.category_weight = 0.0;
        assert!(config.validate().is_err());

        config.name_weight = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_limit() {
        let config = SearchConfig::default();
        assert_eq!(config.clamp_limit(0), 1);
        assert_eq!(config.clamp_limit(50), 50);
        assert_eq!(config.clamp_limit(500), 100);
    }
}
