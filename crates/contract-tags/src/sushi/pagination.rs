//! Walks the whole pool collection of a subgraph page by page.
//!
//! Paging is done by the last seen id instead of `skip`, which is what the
//! graph node suggests for large collections:
//! <https://thegraph.com/docs/en/querying/graphql-api/#pagination>
//!
//! Every page is pinned to the same block so that pools created or changed
//! while paginating do not shift pages against each other.

use {
    super::graph_api::{FIRST_CURSOR, PoolData, PoolPageFetching, QUERY_PAGE_SIZE},
    crate::error::Error,
};

/// Fetches every pool as of `block_number`.
///
/// Fails if the subgraph hands out a full page whose last id would not move
/// the cursor forward, which would otherwise loop forever.
pub async fn fetch_all_pools(
    fetcher: &dyn PoolPageFetching,
    block_number: u64,
) -> Result<Vec<PoolData>, Error> {
    let mut pools = Vec::new();
    let mut cursor = FIRST_CURSOR.to_string();
    let mut previous_cursor: Option<String> = None;

    loop {
        let page = fetcher.pool_page(cursor.clone(), block_number).await?;
        tracing::debug!(%cursor, block_number, pools = page.len(), "fetched pool page");

        let no_more_pages = page.len() != QUERY_PAGE_SIZE;
        let next_cursor = page.last().map(|pool| pool.id.clone()).unwrap_or_default();
        pools.extend(page);

        if no_more_pages {
            break;
        }

        // Only the last two cursors are compared. This catches a subgraph
        // that keeps returning the same page or flips between two of them.
        if next_cursor.is_empty()
            || next_cursor == cursor
            || previous_cursor.as_deref() == Some(next_cursor.as_str())
        {
            return Err(Error::PaginationStall {
                cursor,
                next: next_cursor,
            });
        }
        previous_cursor = Some(std::mem::replace(&mut cursor, next_cursor));
    }

    Ok(pools)
}
