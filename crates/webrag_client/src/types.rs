use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invocation sequence number carried through the bridge so the session core
/// can match a settlement to the trigger that issued it.
pub type Seq = u64;

/// Body of `POST /api/crawl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CrawlRequest {
    pub urls: Vec<String>,
    pub clear: bool,
}

/// Success body of `POST /api/crawl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngestResponse {
    pub chunks: u64,
}

/// Body of `POST /api/query`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub question: &'a str,
}

/// Success body of `POST /api/query`. `sources` may be absent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport could not reach the service.
    #[error("network error: {0}")]
    Network(String),
    /// Service reachable, non-success status.
    #[error("service responded with status {status}")]
    Http { status: u16 },
    /// Success status but the body did not parse.
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Settlement event emitted by the bridge back to the session loop.
#[derive(Debug)]
pub enum ClientEvent {
    IngestSettled {
        seq: Seq,
        result: Result<IngestResponse, ApiError>,
    },
    QuerySettled {
        seq: Seq,
        result: Result<QueryResponse, ApiError>,
    },
}
