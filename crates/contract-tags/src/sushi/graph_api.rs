//! Module containing the Sushi subgraph client used for retrieving liquidity
//! pools and their LP tokens.
//!
//! The subgraph follows the standardized DEX schema where every
//! `LiquidityPool` lists the tokens it holds (`inputTokens`) and, when the
//! pool mints one, its LP token (`outputToken`).

use {
    crate::{error::Error, subgraph::SubgraphClient},
    reqwest::{Client, Url},
    serde::Deserialize,
    std::time::Duration,
};

/// The maximum number of pools the subgraph returns for a single page. A page
/// of exactly this size means there may be more pools to fetch.
pub const QUERY_PAGE_SIZE: usize = 1000;

/// Pagination starts above the lowest possible pool address.
pub const FIRST_CURSOR: &str = "0x0000000000000000000000000000000000000000";

/// The subgraph operations needed for fetching a consistent snapshot of all
/// pools.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PoolPageFetching: Send + Sync {
    /// Returns the latest block the subgraph has indexed.
    async fn block_number(&self) -> Result<u64, Error>;

    /// Returns up to [`QUERY_PAGE_SIZE`] pools with an id strictly greater
    /// than `last_id`, ordered by id, as of `block_number`.
    async fn pool_page(&self, last_id: String, block_number: u64) -> Result<Vec<PoolData>, Error>;
}

/// A client for the Sushi liquidity pool subgraph of a single chain.
pub struct SushiSubgraphClient(SubgraphClient);

impl SushiSubgraphClient {
    pub fn from_subgraph_url(subgraph_url: Url, client: Client, timeout: Duration) -> Self {
        Self(SubgraphClient::new(subgraph_url, client, timeout))
    }
}

#[async_trait::async_trait]
impl PoolPageFetching for SushiSubgraphClient {
    async fn block_number(&self) -> Result<u64, Error> {
        self.0.block_number().await
    }

    async fn pool_page(&self, last_id: String, block_number: u64) -> Result<Vec<PoolData>, Error> {
        use self::pools_query::*;

        let page = self
            .0
            .query::<Data>(
                QUERY,
                Some(json_map! {
                    "lastId" => last_id,
                    "block" => block_number,
                }),
            )
            .await?
            .map(|data| data.liquidity_pools)
            .unwrap_or_default();
        Ok(page)
    }
}

/// Pool data from the subgraph.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoolData {
    pub id: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    #[serde(default)]
    pub input_tokens: Vec<Token>,
    /// The LP token minted by the pool. Not all pools have one.
    pub output_token: Option<Token>,
}

/// Token data for pools.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Token {
    pub id: String,
    pub symbol: Option<String>,
    pub name: Option<String>,
}

mod pools_query {
    use {super::PoolData, serde::Deserialize};

    pub const QUERY: &str = r#"
        query liquidityPools($lastId: ID, $block: Int!) {
            liquidityPools(
                first: 1000
                orderBy: id
                orderDirection: asc
                where: { id_gt: $lastId }
                block: { number: $block }
            ) {
                id
                name
                symbol
                inputTokens {
                    id
                    symbol
                    name
                }
                outputToken {
                    id
                    symbol
                    name
                }
            }
        }
    "#;

    #[derive(Debug, Deserialize, Eq, PartialEq)]
    pub struct Data {
        #[serde(rename = "liquidityPools", default)]
        pub liquidity_pools: Vec<PoolData>,
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        serde_json::json,
        wiremock::{
            Mock,
            MockServer,
            ResponseTemplate,
            matchers::{body_partial_json, method},
        },
    };

    fn client(server: &MockServer) -> SushiSubgraphClient {
        SushiSubgraphClient::from_subgraph_url(
            server.uri().parse().unwrap(),
            Client::new(),
            crate::subgraph::DEFAULT_REQUEST_TIMEOUT,
        )
    }

    #[test]
    fn query_requests_full_pages() {
        assert!(pools_query::QUERY.contains(&format!("first: {QUERY_PAGE_SIZE}")));
    }

    #[test]
    fn decode_pools_data() {
        use pools_query::*;

        assert_eq!(
            serde_json::from_value::<Data>(json!({
                "liquidityPools": [
                    {
                        "id": "0x06da0fd433c1a5d7a4faa01111c044910a184553",
                        "name": "SushiSwap WETH/USDT",
                        "symbol": "SLP",
                        "inputTokens": [
                            {
                                "id": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
                                "symbol": "WETH",
                                "name": "Wrapped Ether",
                            },
                            {
                                "id": "0xdac17f958d2ee523a2206206994597c13d831ec7",
                                "symbol": "USDT",
                                "name": "Tether USD",
                            },
                        ],
                        "outputToken": {
                            "id": "0x06da0fd433c1a5d7a4faa01111c044910a184553",
                            "symbol": "SLP",
                            "name": "SushiSwap LP Token",
                        },
                    },
                    {
                        "id": "0x0c365789dbbb94a29f8720dc465554c587e897db",
                        "name": null,
                        "symbol": null,
                        "inputTokens": [],
                        "outputToken": null,
                    },
                ],
            }))
            .unwrap(),
            Data {
                liquidity_pools: vec![
                    PoolData {
                        id: "0x06da0fd433c1a5d7a4faa01111c044910a184553".to_string(),
                        name: Some("SushiSwap WETH/USDT".to_string()),
                        symbol: Some("SLP".to_string()),
                        input_tokens: vec![
                            Token {
                                id: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".to_string(),
                                symbol: Some("WETH".to_string()),
                                name: Some("Wrapped Ether".to_string()),
                            },
                            Token {
                                id: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
                                symbol: Some("USDT".to_string()),
                                name: Some("Tether USD".to_string()),
                            },
                        ],
                        output_token: Some(Token {
                            id: "0x06da0fd433c1a5d7a4faa01111c044910a184553".to_string(),
                            symbol: Some("SLP".to_string()),
                            name: Some("SushiSwap LP Token".to_string()),
                        }),
                    },
                    PoolData {
                        id: "0x0c365789dbbb94a29f8720dc465554c587e897db".to_string(),
                        ..Default::default()
                    },
                ],
            }
        );
    }

    #[tokio::test]
    async fn pins_page_to_block_and_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "variables": { "lastId": FIRST_CURSOR, "block": 42 },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "liquidityPools": [
                        { "id": "0x01", "name": "a", "symbol": "A", "inputTokens": [] },
                        { "id": "0x02", "name": "b", "symbol": "B", "inputTokens": [] },
                    ],
                },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server)
            .pool_page(FIRST_CURSOR.to_string(), 42)
            .await
            .unwrap();
        let ids = page.iter().map(|pool| pool.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["0x01", "0x02"]);
    }

    #[tokio::test]
    async fn missing_data_is_an_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server)
            .pool_page(FIRST_CURSOR.to_string(), 1)
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn graphql_errors_discard_the_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "liquidityPools": [{ "id": "0x01", "inputTokens": [] }],
                },
                "errors": [
                    { "message": "Failed to decode `block.number` value" },
                    { "message": "store error" },
                ],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server).pool_page(FIRST_CURSOR.to_string(), 1).await;
        assert!(matches!(result, Err(Error::Query(messages)) if messages.len() == 2));
    }

    #[tokio::test]
    async fn malformed_pool_is_a_schema_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "liquidityPools": [{ "name": "no id" }] },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server).pool_page(FIRST_CURSOR.to_string(), 1).await;
        assert!(matches!(result, Err(Error::Schema(_))));
    }
}
