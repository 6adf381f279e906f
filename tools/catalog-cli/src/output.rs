//! Output formatting for the CLI.

use console::{style, Term};
use turbo_catalog::catalog::{Product, ProductStatus};
use turbo_catalog::search::{Pagination, ResultPage};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stdout(),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print one page of results as a table followed by a pagination line.
    pub fn result_page(&self, page: &ResultPage) {
        if self.json {
            self.json(page);
            return;
        }

        if page.is_empty() {
            self.info("No products matched.");
            self.pagination(&page.pagination);
            return;
        }

        let name_width = self.name_width();
        let widths = [name_width, 16, 10, 8, 6, 6];
        println!();
        self.table_row(
            &["NAME", "CATEGORY", "PRICE", "DISCOUNT", "RATING", "SCORE"],
            &widths,
        );
        for item in &page.items {
            let product = &item.product;
            let score = item
                .score
                .map(|s| format!("{:.3}", s))
                .unwrap_or_else(|| "-".to_string());
            let cols = [
                truncate(&product.name, name_width),
                truncate(&product.category, 16),
                format_price(product.price),
                format!("{}%", product.discount),
                format!("{:.1}", product.rating),
                score,
            ];
            let row: Vec<&str> = cols.iter().map(String::as_str).collect();
            self.table_row(&row, &widths);
        }
        println!();
        self.pagination(&page.pagination);
    }

    fn pagination(&self, pagination: &Pagination) {
        let mut line = format!(
            "Page {} of {} ({} result{})",
            pagination.page,
            pagination.total_pages,
            pagination.total,
            if pagination.total == 1 { "" } else { "s" }
        );
        if pagination.start_item() > 0 {
            line.push_str(&format!(
                ", showing {}-{}",
                pagination.start_item(),
                pagination.end_item()
            ));
        }
        println!("  {}", style(line).dim());
    }

    /// Print a product's details.
    pub fn product(&self, product: &Product) {
        if self.json {
            self.json(product);
            return;
        }

        self.header(&product.name);
        self.kv("id", product.id.as_str());
        self.kv("status", &status_badge(product.status));
        self.kv("category", &product.category);
        if let Some(description) = product.description_text() {
            self.kv("description", description);
        }
        self.kv("price", &format_price(product.price));
        if product.discount > 0.0 {
            self.kv(
                "discount",
                &format!(
                    "{}% (now {})",
                    product.discount,
                    format_price(product.discounted_price())
                ),
            );
        }
        self.kv("rating", &format!("{:.1}", product.rating));
        self.kv("stock", &product.stock.to_string());
        self.kv("views", &product.views.to_string());
        if !product.image.is_empty() {
            self.kv("image", &product.image);
        }
        self.kv("created", &format_timestamp(product.created_at.as_str()));
        self.kv("updated", &format_timestamp(product.updated_at.as_str()));
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Width of the name column, leaving room for the other columns.
    fn name_width(&self) -> usize {
        let width = self.term.size().1 as usize;
        width.saturating_sub(2 + 16 + 10 + 8 + 6 + 6 + 12).clamp(12, 40)
    }
}

/// Status badge for product states.
pub fn status_badge(status: ProductStatus) -> String {
    match status {
        ProductStatus::Active => style(status.as_str()).green().to_string(),
        ProductStatus::Inactive => style(status.as_str()).dim().to_string(),
    }
}

/// Format a price with two decimals.
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Format an RFC 3339 instant for humans; unparseable values are shown raw.
pub fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&chrono::Utc)
                .format("%Y-%m-%d %H:%M UTC")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

/// Shorten `s` to at most `max` characters.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
