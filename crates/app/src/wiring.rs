use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::state::AppState;
use opinions_infra::api::{ApiError, HttpApi};
use opinions_infra::filters::FilterMetadataCache;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("api client error: {0}")]
    Api(#[from] ApiError),
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub fn build_state(config: AppConfig) -> Result<AppState, WiringError> {
    let client = Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .build()?;
    let api = HttpApi::new(client, config.api_base.as_str())?;
    debug!(base = %api.base_url(), timeout = ?config.request_timeout, "api client ready");
    Ok(AppState {
        config: Arc::new(config),
        api: Arc::new(api),
        filters: Arc::new(FilterMetadataCache::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_points_at_configured_base() {
        let config = AppConfig::from_lookup(|key| {
            (key == "OPINIONS_API_BASE").then(|| "https://opinions.example/backend".to_string())
        })
        .unwrap();
        let state = build_state(config).unwrap();
        assert_eq!(state.api.base_url().as_str(), "https://opinions.example/backend/");
        assert!(state.filters.get().is_none());
    }
}
