use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::SearchBackend;
use crate::latest::{LatestOnly, RequestToken};
use opinions_core::domain::search::SearchPage;
use opinions_core::error::FetchError;
use opinions_core::types::query_state::QueryState;

/// Result of one search, tagged with the state that asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub state: QueryState,
    pub result: Result<SearchPage, FetchError>,
}

#[derive(Debug, Clone)]
pub enum Submission {
    /// Empty text: results were cleared and no request was made.
    Landing,
    Issued(RequestToken),
}

/// Keeps at most one search request outstanding.
///
/// Every `submit` cancels the previous request before issuing the next
/// one, and [`RequestController::next_outcome`] only ever yields the
/// outcome of the newest request. Dropping the controller cancels whatever
/// is in flight.
pub struct RequestController<B> {
    backend: Arc<B>,
    slot: LatestOnly<SearchOutcome>,
}

impl<B: SearchBackend> RequestController<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            slot: LatestOnly::new(),
        }
    }

    pub fn submit(&mut self, state: QueryState) -> Submission {
        self.slot.cancel();
        if state.is_landing() {
            debug!("landing state; no search issued");
            return Submission::Landing;
        }
        info!(
            query = %state.text(),
            page = state.page(),
            topics = state.topics().len(),
            statute = state.statute().unwrap_or_default(),
            "issuing search"
        );
        let backend = self.backend.clone();
        let token = self.slot.start(async move {
            let result = backend.search(&state).await;
            SearchOutcome { state, result }
        });
        Submission::Issued(token)
    }

    pub fn cancel(&mut self) {
        self.slot.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }

    /// Next outcome of the newest request. Cancelled requests never
    /// produce one; pends while nothing is outstanding.
    pub async fn next_outcome(&mut self) -> SearchOutcome {
        loop {
            let outcome = self.slot.next().await;
            match &outcome.result {
                Err(FetchError::Cancelled) => continue,
                Err(err) => warn!(query = %outcome.state.text(), error = %err, "search failed"),
                Ok(page) => debug!(
                    query = %outcome.state.text(),
                    total = page.total_results,
                    returned = page.results.len(),
                    "search completed"
                ),
            }
            return outcome;
        }
    }
}
