//! CLI command implementations.

pub mod categories;
pub mod config;
pub mod list;
pub mod search;
pub mod show;

use clap::{Args, Subcommand};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search term, matched approximately against name, description and category.
    pub term: Option<String>,

    /// Exact category.
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum price (inclusive).
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price (inclusive).
    #[arg(long)]
    pub max_price: Option<String>,

    /// Minimum discount percentage (inclusive).
    #[arg(long)]
    pub min_discount: Option<String>,

    /// Minimum rating (inclusive).
    #[arg(long)]
    pub min_rating: Option<String>,

    /// Sort field: name, price, createdAt, updatedAt, views, rating, discount.
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction: asc or desc.
    #[arg(long)]
    pub sort_order: Option<String>,

    /// Order by relevance to the term instead of a field.
    #[arg(long, conflicts_with = "sort_by")]
    pub relevance: bool,

    /// Page number (1-indexed).
    #[arg(short, long)]
    pub page: Option<String>,

    /// Items per page.
    #[arg(short, long)]
    pub limit: Option<String>,
}

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Only products in this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Page number (1-indexed).
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Items per page.
    #[arg(short, long)]
    pub limit: Option<u32>,
}

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Catalog snapshot the config points at.
        #[arg(long, default_value = "catalog.json")]
        catalog_path: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
