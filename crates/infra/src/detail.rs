use std::sync::Arc;

use tracing::{info, warn};

use crate::api::SearchBackend;
use crate::latest::{LatestOnly, RequestToken};
use opinions_core::domain::opinion::OpinionDetail;
use opinions_core::error::FetchError;
use opinions_core::types::opinion_id::OpinionId;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading(OpinionId),
    Found(Box<OpinionDetail>),
    NotFound(OpinionId),
    Failed { id: OpinionId, error: FetchError },
}

impl DetailState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DetailState::Loading(_))
    }
}

/// Fetch-by-id for the single-opinion view. A new id always restarts at
/// `Loading` and cancels the fetch for the previous id.
pub struct DetailFetcher<B> {
    backend: Arc<B>,
    current: Option<OpinionId>,
    state: DetailState,
    slot: LatestOnly<(OpinionId, Result<OpinionDetail, FetchError>)>,
}

impl<B: SearchBackend> DetailFetcher<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            current: None,
            state: DetailState::Idle,
            slot: LatestOnly::new(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn load(&mut self, id: OpinionId) -> RequestToken {
        info!(opinion = %id, "loading opinion");
        self.current = Some(id.clone());
        self.state = DetailState::Loading(id.clone());
        let backend = self.backend.clone();
        self.slot.start(async move {
            let result = backend.opinion(&id).await;
            (id, result)
        })
    }

    /// Re-fetches the current id after a failure. `None` when there is
    /// nothing to retry.
    pub fn retry(&mut self) -> Option<RequestToken> {
        match &self.state {
            DetailState::Failed { id, .. } => {
                let id = id.clone();
                Some(self.load(id))
            }
            _ => None,
        }
    }

    /// Tears down the view: cancels any fetch and returns to `Idle`.
    pub fn reset(&mut self) {
        self.slot.cancel();
        self.current = None;
        self.state = DetailState::Idle;
    }

    /// Waits for the in-flight fetch and folds it into the state.
    pub async fn settle(&mut self) -> &DetailState {
        loop {
            let (id, result) = self.slot.next().await;
            if self.current.as_ref() != Some(&id) {
                continue;
            }
            self.state = match result {
                Ok(detail) => DetailState::Found(Box::new(detail)),
                Err(FetchError::NotFound) => DetailState::NotFound(id),
                Err(FetchError::Cancelled) => continue,
                Err(error) => {
                    warn!(opinion = %id, error = %error, "opinion fetch failed");
                    DetailState::Failed { id, error }
                }
            };
            return &self.state;
        }
    }
}
