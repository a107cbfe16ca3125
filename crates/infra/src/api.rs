use std::future::Future;

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use opinions_core::domain::filters::FilterMetadata;
use opinions_core::domain::opinion::OpinionDetail;
use opinions_core::domain::search::SearchPage;
use opinions_core::error::FetchError;
use opinions_core::params::search_request_params;
use opinions_core::types::opinion_id::OpinionId;
use opinions_core::types::query_state::QueryState;

/// The three read endpoints the interface depends on. Controllers are
/// generic over this so they can run against an in-process fake.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(&self, state: &QueryState) -> impl Future<Output = Result<SearchPage, FetchError>> + Send;

    fn filters(&self) -> impl Future<Output = Result<FilterMetadata, FetchError>> + Send;

    fn opinion(&self, id: &OpinionId) -> impl Future<Output = Result<OpinionDetail, FetchError>> + Send;
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub engine_loaded: bool,
    #[serde(default)]
    pub engine_name: Option<String>,
    #[serde(default)]
    pub opinions_indexed: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Search,
    Filters,
    Opinion,
    Health,
}

impl Endpoint {
    fn label(self) -> &'static str {
        match self {
            Endpoint::Search => "search",
            Endpoint::Filters => "filters",
            Endpoint::Opinion => "opinion",
            Endpoint::Health => "health",
        }
    }
}

/// reqwest-backed client for the opinions API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base: Url,
}

impl HttpApi {
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let mut base =
            Url::parse(base_url.trim()).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn health(&self) -> Result<HealthStatus, FetchError> {
        let url = self.endpoint("api/health")?;
        let response = self.send(self.http.get(url), Endpoint::Health).await?;
        decode(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|err| FetchError::invalid_response(format!("bad endpoint {path}: {err}")))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: Endpoint,
    ) -> Result<Response, FetchError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(endpoint = endpoint.label(), %status, "api response");
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND && endpoint == Endpoint::Opinion {
            return Err(FetchError::NotFound);
        }
        Err(status_error(status, response).await)
    }
}

impl SearchBackend for HttpApi {
    async fn search(&self, state: &QueryState) -> Result<SearchPage, FetchError> {
        let url = self.endpoint("api/search")?;
        let request = self.http.get(url).query(&search_request_params(state));
        let response = self.send(request, Endpoint::Search).await?;
        decode(response).await
    }

    async fn filters(&self) -> Result<FilterMetadata, FetchError> {
        let url = self.endpoint("api/filters")?;
        let response = self.send(self.http.get(url), Endpoint::Filters).await?;
        decode(response).await
    }

    async fn opinion(&self, id: &OpinionId) -> Result<OpinionDetail, FetchError> {
        let url = self.endpoint(&format!("api/opinions/{id}"))?;
        let response = self.send(self.http.get(url), Endpoint::Opinion).await?;
        decode(response).await
    }
}

/// Failures before a status line arrives, or while streaming the body, are
/// transport problems. A cold backend shows up here.
fn transport_error(err: reqwest::Error) -> FetchError {
    FetchError::Network(err.without_url().to_string())
}

async fn status_error(status: StatusCode, response: Response) -> FetchError {
    let fallback = status
        .canonical_reason()
        .unwrap_or("unexpected status")
        .to_string();
    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or(fallback),
        Err(_) => fallback,
    };
    FetchError::server(status.as_u16(), message)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let body = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&body).map_err(|err| FetchError::invalid_response(err.to_string()))
}
