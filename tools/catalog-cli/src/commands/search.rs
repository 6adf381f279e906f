//! Search command.

use anyhow::Result;
use turbo_catalog::search::{SearchParams, SearchQuery};

use super::SearchArgs;
use crate::context::Context;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let relevance = args.relevance;
    let query = build_query(args, ctx)?;
    if relevance && query.term.is_none() {
        ctx.output
            .warn("--relevance has no effect without a search term; ordering by createdAt");
    }

    let engine = ctx.open_engine().await?;
    let page = engine.search(&query).await?;

    if !ctx.output.is_json() {
        let title = match &page.filters.term {
            Some(term) => format!("Results for \"{}\"", term),
            None => "Results".to_string(),
        };
        ctx.output.header(&title);
        ctx.output.kv(
            "sorted by",
            &format!("{} {}", page.filters.sort_by, page.filters.sort_order),
        );
    }
    ctx.output.result_page(&page);

    Ok(())
}

/// Validate the flags the same way a request's parameters are validated.
fn build_query(args: SearchArgs, ctx: &Context) -> Result<SearchQuery> {
    let params = SearchParams {
        q: args.term,
        query: None,
        category: args.category,
        min_price: args.min_price,
        max_price: args.max_price,
        min_discount: args.min_discount,
        min_rating: args.min_rating,
        sort_by: args.sort_by,
        sort_order: args.sort_order,
        page: args.page,
        limit: args.limit,
    };

    let mut query = params.validate_with(&ctx.config.search)?;
    if args.relevance && query.term.is_some() {
        query.sort_by = None;
    }
    Ok(query)
}
