//! Webrag client: JSON-over-HTTP access to the remote RAG service.
mod bridge;
mod client;
mod types;

pub use bridge::ClientHandle;
pub use client::{ApiClient, ClientSettings, HttpApiClient, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use types::{ApiError, ClientEvent, IngestResponse, QueryResponse, Seq};
