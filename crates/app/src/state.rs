use std::sync::Arc;

use crate::config::AppConfig;
use opinions_infra::api::HttpApi;
use opinions_infra::filters::FilterMetadataCache;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: Arc<HttpApi>,
    pub filters: Arc<FilterMetadataCache>,
}
