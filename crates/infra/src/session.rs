use std::sync::Arc;

use tracing::debug;

use crate::api::SearchBackend;
use crate::controller::RequestController;
use opinions_core::params::Location;
use opinions_core::reconcile::{ResultsView, Transition};
use opinions_core::types::query_state::QueryState;

/// Search page controller: the address is the source of truth, the state
/// is re-derived from it on every change, and the results view follows
/// the request controller.
pub struct SearchSession<B> {
    location: Location,
    controller: RequestController<B>,
    view: ResultsView,
}

impl<B: SearchBackend> SearchSession<B> {
    /// Starts a session at `location` and issues its search, if any.
    pub fn open(backend: Arc<B>, location: Location) -> Self {
        let mut session = Self {
            location,
            controller: RequestController::new(backend),
            view: ResultsView::default(),
        };
        session.sync();
        session
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Current state, decoded from the address.
    pub fn state(&self) -> QueryState {
        self.location.state()
    }

    pub fn view(&self) -> &ResultsView {
        &self.view
    }

    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    /// Writes `next` into the address, then reconciles against it.
    pub fn navigate(&mut self, next: &QueryState) -> Transition {
        if self.location.apply(next) {
            debug!(href = %self.location.href(), "address updated");
        }
        self.sync()
    }

    /// Replaces the whole address, as when a link is followed.
    pub fn visit(&mut self, location: Location) -> Transition {
        self.location = location;
        self.sync()
    }

    /// Re-issues the current search after an error. Returns `false` when
    /// there is no error to recover from.
    pub fn retry(&mut self) -> bool {
        if self.view.error.is_none() {
            return false;
        }
        let state = self.location.state();
        self.view.retry(&state);
        self.controller.submit(state);
        true
    }

    /// Waits for the outstanding search and folds it into the view.
    /// Returns whether the view changed.
    pub async fn next_update(&mut self) -> bool {
        let outcome = self.controller.next_outcome().await;
        let applied = self.view.resolve(&outcome.state, outcome.result);
        if !applied {
            debug!(query = %outcome.state.text(), "discarding response for superseded state");
        }
        applied
    }

    fn sync(&mut self) -> Transition {
        let state = self.location.state();
        let transition = self.view.begin(&state);
        match transition {
            Transition::Landing | Transition::NewQuery | Transition::Refinement => {
                self.controller.submit(state);
            }
            Transition::Unchanged => {}
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::controller::tests::FakeBackend;
    use opinions_core::error::FetchError;
    use opinions_core::types::year_range::YearRange;

    fn open(backend: &Arc<FakeBackend>, query: &str) -> SearchSession<FakeBackend> {
        SearchSession::open(backend.clone(), Location::parse(query))
    }

    #[tokio::test]
    async fn landing_address_fetches_nothing() {
        let backend = Arc::new(FakeBackend::default());
        let session = open(&backend, "");
        tokio::task::yield_now().await;
        assert_eq!(backend.call_count(), 0);
        assert!(session.view().results.is_none());
        assert!(!session.view().loading);
    }

    #[tokio::test]
    async fn refinement_shows_stale_results_until_resolved() {
        let backend = Arc::new(FakeBackend::default());
        let mut session = open(&backend, "?q=gifts");
        assert!(session.view().loading);
        assert!(session.next_update().await);
        assert_eq!(session.view().total_results(), 100);

        let gate = backend.hold(2);
        let next = session.state().with_page(2);
        assert_eq!(session.navigate(&next), Transition::Refinement);
        assert_eq!(session.location().query(), "q=gifts&page=2");
        assert!(session.view().stale);
        assert_eq!(session.view().total_results(), 100);

        gate.notify_one();
        assert!(session.next_update().await);
        assert!(!session.view().stale);
        assert_eq!(session.view().total_results(), 200);
    }

    #[tokio::test]
    async fn superseded_response_never_reaches_the_view() {
        let backend = Arc::new(FakeBackend::default());
        let mut session = open(&backend, "?q=gifts");
        session.next_update().await;

        let slow = backend.hold(2);
        session.navigate(&session.state().with_page(2));
        tokio::task::yield_now().await;
        session.navigate(&session.state().with_page(3));
        slow.notify_one();

        assert!(session.next_update().await);
        assert_eq!(session.view().total_results(), 300);
        assert_eq!(session.view().rendered().map(QueryState::page), Some(3));
        let extra = tokio::time::timeout(Duration::from_millis(50), session.next_update()).await;
        assert!(extra.is_err());
    }

    #[tokio::test]
    async fn new_text_clears_results_immediately() {
        let backend = Arc::new(FakeBackend::default());
        let mut session = open(&backend, "?q=gifts");
        session.next_update().await;
        let next = session.state().with_text("travel");
        assert_eq!(session.navigate(&next), Transition::NewQuery);
        assert!(session.view().results.is_none());
        assert!(session.view().loading);
    }

    #[tokio::test]
    async fn repeated_navigation_is_deduplicated() {
        let backend = Arc::new(FakeBackend::default());
        let mut session = open(&backend, "?q=gifts");
        session.next_update().await;
        let same = session.state();
        assert_eq!(session.navigate(&same), Transition::Unchanged);
        tokio::task::yield_now().await;
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn error_then_retry_recovers() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail(1, FetchError::Network("connection refused".to_string()));
        let mut session = open(&backend, "?q=gifts");
        session.next_update().await;
        assert!(matches!(session.view().error, Some(FetchError::Network(_))));

        backend.failures.lock().unwrap().clear();
        assert!(session.retry());
        assert!(session.view().loading);
        assert!(session.next_update().await);
        assert!(session.view().error.is_none());
        assert_eq!(session.view().total_results(), 100);
        assert!(!session.retry());
    }

    #[tokio::test]
    async fn clearing_filters_keeps_query_and_resets_page() {
        let backend = Arc::new(FakeBackend::default());
        let mut session = open(
            &backend,
            "?q=ethics&page=4&topic=A&topic=B&statute=S&year_start=1990",
        );
        session.next_update().await;
        let cleared = session.state().clear_filters();
        session.navigate(&cleared);
        assert_eq!(session.location().query(), "q=ethics");
        let state = session.state();
        assert_eq!(state.years(), YearRange::UNBOUNDED);
        assert_eq!(state.page(), 1);
    }

    #[tokio::test]
    async fn returning_to_landing_cancels_search() {
        let backend = Arc::new(FakeBackend::default());
        let gate = backend.hold(1);
        let mut session = open(&backend, "?q=gifts");
        tokio::task::yield_now().await;
        assert_eq!(session.visit(Location::default()), Transition::Landing);
        gate.notify_one();
        assert!(!session.is_pending());
        assert!(session.view().results.is_none());
        let waited = tokio::time::timeout(Duration::from_millis(50), session.next_update()).await;
        assert!(waited.is_err());
    }
}
