use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use webrag_logging::rag_warn;

use crate::types::{CrawlRequest, QueryRequest};
use crate::{ApiError, IngestResponse, QueryResponse};

/// Environment override for the service base address.
pub const BASE_URL_ENV: &str = "WEBRAG_API_BASE_URL";
/// Loopback default used when no override is set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl ClientSettings {
    /// Resolve the base address once, at construction time: environment
    /// override if present and parseable, else the loopback default.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(raw) = std::env::var(BASE_URL_ENV) {
            match Url::parse(&raw) {
                Ok(url) => settings.base_url = url,
                Err(err) => {
                    rag_warn!("Ignoring invalid {BASE_URL_ENV}={raw:?}: {err}");
                }
            }
        }
        settings
    }
}

/// The two documented operations against the remote RAG service.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    /// Submit a batch of addresses for ingestion. The caller is responsible
    /// for filtering blank entries before invoking this.
    async fn ingest(
        &self,
        urls: &[String],
        clear_existing: bool,
    ) -> Result<IngestResponse, ApiError>;

    /// Submit a non-blank question (caller-enforced).
    async fn query(&self, question: &str) -> Result<QueryResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base_url: settings.base_url,
        })
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| ApiError::Network(err.to_string()))?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl ApiClient for HttpApiClient {
    async fn ingest(
        &self,
        urls: &[String],
        clear_existing: bool,
    ) -> Result<IngestResponse, ApiError> {
        self.post_json(
            "/api/crawl",
            &CrawlRequest {
                urls: urls.to_vec(),
                clear: clear_existing,
            },
        )
        .await
    }

    async fn query(&self, question: &str) -> Result<QueryResponse, ApiError> {
        self.post_json("/api/query", &QueryRequest { question }).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}
