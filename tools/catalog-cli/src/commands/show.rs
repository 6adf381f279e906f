//! Show command.

use anyhow::Result;
use turbo_catalog::ProductId;

use super::ShowArgs;
use crate::context::Context;

/// Run the show command.
pub async fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.open_engine().await?;
    let product = engine.get_product(&ProductId::new(args.id)).await?;
    ctx.output.product(&product);
    Ok(())
}
