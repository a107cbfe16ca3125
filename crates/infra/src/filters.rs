use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::api::SearchBackend;
use opinions_core::domain::filters::FilterMetadata;
use opinions_core::error::FetchError;

/// Topic/statute vocabularies and corpus size, fetched at most once per
/// session. Not being loaded yet is a normal state; a failed load leaves
/// the cache empty so a later call may try again.
#[derive(Debug, Default)]
pub struct FilterMetadataCache {
    cell: OnceCell<FilterMetadata>,
}

impl FilterMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&FilterMetadata> {
        self.cell.get()
    }

    /// Returns the cached metadata, fetching it first if needed. Concurrent
    /// callers share a single fetch.
    pub async fn load<B: SearchBackend>(&self, backend: &B) -> Option<&FilterMetadata> {
        let result = self
            .cell
            .get_or_try_init(|| async {
                let metadata = backend.filters().await?;
                info!(
                    topics = metadata.topics.len(),
                    statutes = metadata.statutes.len(),
                    total_opinions = metadata.total_opinions,
                    "filter metadata loaded"
                );
                Ok::<_, FetchError>(metadata)
            })
            .await;
        match result {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                warn!(error = %err, "filter metadata unavailable");
                None
            }
        }
    }
}
