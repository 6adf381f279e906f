//! Categories command.

use anyhow::Result;

use crate::context::Context;

/// Run the categories command.
pub async fn run(ctx: &Context) -> Result<()> {
    let engine = ctx.open_engine().await?;
    let categories = engine.categories().await?;

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }

    ctx.output.header("Categories");
    if categories.is_empty() {
        ctx.output.info("No active products.");
        return Ok(());
    }
    for category in &categories {
        ctx.output.list_item(category);
    }

    Ok(())
}
