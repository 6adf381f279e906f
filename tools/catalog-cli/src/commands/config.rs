//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init {
            catalog_path,
            force,
        } => init_config(&catalog_path, force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    // Catalog section
    ctx.output.info("[catalog]");
    match ctx.catalog_path() {
        Ok(path) => ctx.output.kv("path", &path.display().to_string()),
        Err(_) => ctx.output.kv("path", "(not set)"),
    }

    // Search section
    let search = &ctx.config.search;
    ctx.output.info("[search]");
    ctx.output.kv("name_weight", &search.name_weight.to_string());
    ctx.output
        .kv("description_weight", &search.description_weight.to_string());
    ctx.output.kv("category_weight", &search.category_weight.to_string());
    ctx.output.kv("tolerance", &search.tolerance.to_string());
    ctx.output.kv("min_match_chars", &search.min_match_chars.to_string());
    ctx.output.kv("case_sensitive", &search.case_sensitive.to_string());
    ctx.output.kv("default_limit", &search.default_limit.to_string());
    ctx.output.kv("max_limit", &search.max_limit.to_string());

    Ok(())
}

async fn init_config(catalog_path: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config(catalog_path))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));
    if !ctx.cwd.join(catalog_path).exists() {
        ctx.output.warn(&format!(
            "Catalog file {} does not exist yet",
            catalog_path
        ));
    }

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    // Search settings were validated on load; what is left is the catalog.
    let path = ctx.catalog_path()?;
    let engine = ctx.open_engine().await?;
    let count = engine.store().len().await;

    if count == 0 {
        ctx.output
            .warn(&format!("Catalog {} contains no products", path.display()));
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "valid": true,
            "catalog": path.display().to_string(),
            "products": count,
        }));
    } else {
        ctx.output.success(&format!(
            "Configuration is valid ({} products in {})",
            count,
            path.display()
        ));
    }

    Ok(())
}
