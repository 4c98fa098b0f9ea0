use std::time::Duration;

/// Everything that can go wrong while producing contract tags. None of these
/// are retried: the first failure aborts the whole run and no partial tag
/// collection is returned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad caller input, e.g. a malformed or unsupported chain id.
    #[error("invalid input: {0}")]
    Validation(String),
    /// The chain table has no usable endpoint for the requested chain.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// The request could not be sent or came back with a non-success status.
    #[error("subgraph request failed: {0}")]
    Transport(String),
    #[error("subgraph request timed out after {0:?}")]
    Timeout(Duration),
    /// Application level GraphQL errors returned by the subgraph.
    #[error("subgraph query failed: {}", .0.join("; "))]
    Query(Vec<String>),
    /// A well-formed response did not have the expected shape.
    #[error("unexpected subgraph response: {0}")]
    Schema(String),
    #[error("pagination cursor did not advance: {cursor} -> {next:?}")]
    PaginationStall { cursor: String, next: String },
}

impl Error {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_decode() {
            Self::Schema(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
