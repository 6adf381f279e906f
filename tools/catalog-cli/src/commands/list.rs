//! List command.

use anyhow::Result;

use super::ListArgs;
use crate::context::Context;

/// Run the list command.
pub async fn run(args: ListArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.open_engine().await?;
    let limit = args.limit.unwrap_or(ctx.config.search.default_limit);
    let page = engine
        .list_products(args.page, limit, args.category.as_deref())
        .await?;

    match &args.category {
        Some(category) => ctx.output.header(&format!("Products in {}", category)),
        None => ctx.output.header("Products"),
    }
    ctx.output.result_page(&page);

    Ok(())
}
