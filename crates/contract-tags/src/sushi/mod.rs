//! Liquidity pools of the Sushi subgraphs.

pub mod graph_api;
pub mod pagination;

pub use self::{
    graph_api::{PoolData, PoolPageFetching, SushiSubgraphClient, Token},
    pagination::fetch_all_pools,
};
