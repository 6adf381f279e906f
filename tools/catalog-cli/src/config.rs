//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_catalog::search::SearchConfig;

/// Config file names looked up from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["catalog.toml", ".catalog.toml", "catalog.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the catalog snapshot lives.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Ranking and pagination settings.
    #[serde(default)]
    pub search: SearchConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: CliConfig = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config
            .search
            .validate()
            .with_context(|| format!("Invalid search settings in {}", path.display()))?;
        Ok(config)
    }
}

/// Catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to a JSON array of products, relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Generate a default catalog.toml config file.
pub fn generate_default_config(catalog_path: &str) -> String {
    let defaults = SearchConfig::default();
    format!(
        r#"# Catalog search configuration

[catalog]
path = "{catalog_path}"

[search]
# Relative weight of each field in the composite relevance score.
name_weight = {name_weight:?}
description_weight = {description_weight:?}
category_weight = {category_weight:?}

# Fraction of the term length that may be edits.
tolerance = {tolerance:?}
min_match_chars = {min_match_chars}
case_sensitive = {case_sensitive}

default_limit = {default_limit}
max_limit = {max_limit}
"#,
        catalog_path = catalog_path,
        name_weight = defaults.name_weight,
        description_weight = defaults.description_weight,
        category_weight = defaults.category_weight,
        tolerance = defaults.tolerance,
        min_match_chars = defaults.min_match_chars,
        case_sensitive = defaults.case_sensitive,
        default_limit = defaults.default_limit,
        max_limit = defaults.max_limit,
    )
}
