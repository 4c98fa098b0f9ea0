//! A module implementing a client for querying subgraphs.

use {
    crate::error::Error,
    reqwest::{Client, Url},
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    serde_json::{Map, Value},
    std::time::Duration,
};

/// How long a single subgraph request may take before it is cancelled.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A general client for querying subgraphs.
pub struct SubgraphClient {
    client: Client,
    subgraph_url: Url,
    timeout: Duration,
}

impl SubgraphClient {
    /// Creates a new subgraph client from the specified URL. Every request
    /// issued by the client is bounded by `timeout`.
    pub fn new(subgraph_url: Url, client: Client, timeout: Duration) -> Self {
        Self {
            client,
            subgraph_url,
            timeout,
        }
    }

    /// Performs the specified GraphQL query on the current subgraph.
    ///
    /// Returns `None` for a successful response that carries no `data`.
    /// Any GraphQL error message in the response is logged and turns the
    /// whole response into an [`Error::Query`].
    pub async fn query<T>(
        &self,
        query: &str,
        variables: Option<Map<String, Value>>,
    ) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.subgraph_url.clone())
            .json(&Query { query, variables })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| Error::from_reqwest(err, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("HTTP status {status}")));
        }

        response
            .json::<QueryResponse<T>>()
            .await
            .map_err(|err| Error::from_reqwest(err, self.timeout))?
            .into_result()
    }

    /// Retrieves the latest block number indexed by the subgraph. All the
    /// paginated queries of one run are pinned to this block so that every
    /// page is read from the same snapshot.
    pub async fn block_number(&self) -> Result<u64, Error> {
        let data = self
            .query::<Value>(block_number_query::QUERY, None)
            .await?
            .unwrap_or_default();
        let number = data
            .pointer(block_number_query::NUMBER)
            .ok_or_else(|| Error::Schema("missing _meta.block.number".to_string()))?;
        number
            .as_u64()
            .filter(|block| *block > 0)
            .ok_or_else(|| Error::Schema(format!("invalid block number {number}")))
    }
}

/// A GraphQL query.
#[derive(Serialize)]
struct Query<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Map<String, Value>>,
}

/// A GraphQL query response.
///
/// The subgraph answers with HTTP 200 even for failed queries, so errors have
/// to be checked for in the body.
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<QueryError>,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    message: String,
}

impl<T> QueryResponse<T> {
    fn into_result(self) -> Result<Option<T>, Error> {
        if self.errors.is_empty() {
            return Ok(self.data);
        }
        let messages = self
            .errors
            .into_iter()
            .map(|error| {
                tracing::error!(error = %error.message, "subgraph query error");
                error.message
            })
            .collect();
        Err(Error::Query(messages))
    }
}

mod block_number_query {
    pub const QUERY: &str = r#"{
        _meta {
            block {
                number
            }
        }
    }"#;

    /// JSON pointer to the block number inside of the `data` object.
    pub const NUMBER: &str = "/_meta/block/number";
}
