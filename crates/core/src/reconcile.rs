//! Display policy for search results across state transitions.
//!
//! Changing the text is a new query: old results are dropped and a full
//! loading view is shown. Changing only filters or page is a refinement:
//! old results stay on screen, marked stale, until the new page lands.

use crate::domain::search::SearchPage;
use crate::error::FetchError;
use crate::types::query_state::QueryState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Empty text. Nothing is fetched.
    Landing,
    /// Text differs from the last rendered state.
    NewQuery,
    /// Same text, different filters or page.
    Refinement,
    /// Same state as the one already shown or in flight.
    Unchanged,
}

/// Decides how to move from what was last rendered (and what is currently
/// pending, if anything) to `next`.
pub fn plan(rendered: Option<&QueryState>, pending: Option<&QueryState>, next: &QueryState) -> Transition {
    if next.is_landing() {
        return Transition::Landing;
    }
    if pending == Some(next) || (pending.is_none() && rendered == Some(next)) {
        return Transition::Unchanged;
    }
    match rendered {
        Some(previous) if previous.text() == next.text() => Transition::Refinement,
        _ => Transition::NewQuery,
    }
}

/// What the results area shows at a given instant.
///
/// `results == None` means no fetch has completed for the current text,
/// which is different from a completed fetch with zero matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsView {
    pub results: Option<SearchPage>,
    pub loading: bool,
    pub stale: bool,
    pub error: Option<FetchError>,
    rendered: Option<QueryState>,
    pending: Option<QueryState>,
}

impl ResultsView {
    pub fn total_results(&self) -> u64 {
        self.results.as_ref().map_or(0, |page| page.total_results)
    }

    /// State whose response is awaited, if any.
    pub fn pending(&self) -> Option<&QueryState> {
        self.pending.as_ref()
    }

    /// State the current results (or error) belong to.
    pub fn rendered(&self) -> Option<&QueryState> {
        self.rendered.as_ref()
    }

    pub fn plan(&self, next: &QueryState) -> Transition {
        let transition = plan(self.rendered.as_ref(), self.pending.as_ref(), next);
        if transition == Transition::Unchanged && self.pending.is_none() && self.error.is_some() {
            return Transition::Refinement;
        }
        transition
    }

    /// Moves the view into the state implied by `next` and returns the
    /// transition taken. Anything but `Unchanged` and `Landing` expects a
    /// request for `next` to be issued.
    pub fn begin(&mut self, next: &QueryState) -> Transition {
        let transition = self.plan(next);
        match transition {
            Transition::Landing => {
                self.results = None;
                self.loading = false;
                self.stale = false;
                self.error = None;
                self.pending = None;
                self.rendered = Some(next.clone());
            }
            Transition::NewQuery => {
                self.results = None;
                self.loading = true;
                self.stale = false;
                self.error = None;
                self.pending = Some(next.clone());
            }
            Transition::Refinement => self.refetch(next),
            Transition::Unchanged => {}
        }
        transition
    }

    /// Re-requests `state` regardless of what is shown, keeping content.
    pub fn retry(&mut self, state: &QueryState) {
        self.refetch(state);
    }

    fn refetch(&mut self, state: &QueryState) {
        self.loading = true;
        self.stale = self.results.is_some();
        self.error = None;
        self.pending = Some(state.clone());
    }

    /// Applies a response. Returns `false`, leaving the view untouched, when
    /// `state` is not the one currently awaited.
    pub fn resolve(&mut self, state: &QueryState, result: Result<SearchPage, FetchError>) -> bool {
        if self.pending.as_ref() != Some(state) {
            return false;
        }
        if let Err(FetchError::Cancelled) = result {
            return false;
        }
        self.pending = None;
        self.loading = false;
        self.stale = false;
        self.rendered = Some(state.clone());
        match result {
            Ok(page) => {
                self.results = Some(page);
                self.error = None;
            }
            Err(error) => {
                self.results = None;
                self.error = Some(error);
            }
        }
        true
    }

    /// Drops any pending request without rendering it.
    pub fn abandon(&mut self) {
        self.pending = None;
        self.loading = false;
        self.stale = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::FiltersApplied;

    fn page(total: u64) -> SearchPage {
        SearchPage {
            results: Vec::new(),
            total_results: total,
            query: None,
            page: None,
            per_page: None,
            filters_applied: FiltersApplied::default(),
        }
    }

    fn state(text: &str) -> QueryState {
        QueryState::default().with_text(text)
    }

    fn rendered_view(current: &QueryState, total: u64) -> ResultsView {
        let mut view = ResultsView::default();
        view.begin(current);
        assert!(view.resolve(current, Ok(page(total))));
        view
    }

    #[test]
    fn plan_is_a_pure_function_of_states() {
        let gifts = state("gifts");
        assert_eq!(plan(None, None, &QueryState::default()), Transition::Landing);
        assert_eq!(plan(None, None, &gifts), Transition::NewQuery);
        assert_eq!(plan(Some(&gifts), None, &gifts.toggle_topic("t")), Transition::Refinement);
        assert_eq!(plan(Some(&gifts), None, &gifts.with_page(2)), Transition::Refinement);
        assert_eq!(plan(Some(&gifts), None, &state("travel")), Transition::NewQuery);
        assert_eq!(plan(Some(&gifts), None, &gifts), Transition::Unchanged);
        assert_eq!(plan(Some(&gifts), Some(&gifts.with_page(2)), &gifts.with_page(2)), Transition::Unchanged);
    }

    #[test]
    fn new_query_clears_results_before_response() {
        let gifts = state("gifts");
        let mut view = rendered_view(&gifts, 40);
        let travel = state("travel");
        assert_eq!(view.begin(&travel), Transition::NewQuery);
        assert!(view.results.is_none());
        assert!(view.loading);
        assert!(!view.stale);
    }

    #[test]
    fn refinement_keeps_results_marked_stale() {
        let gifts = state("gifts");
        let mut view = rendered_view(&gifts, 40);
        let next = gifts.with_page(2);
        assert_eq!(view.begin(&next), Transition::Refinement);
        assert_eq!(view.total_results(), 40);
        assert!(view.stale);
        assert!(view.loading);

        assert!(view.resolve(&next, Ok(page(41))));
        assert!(!view.stale);
        assert!(!view.loading);
        assert_eq!(view.total_results(), 41);
        assert_eq!(view.rendered(), Some(&next));
    }

    #[test]
    fn superseded_response_is_discarded() {
        let gifts = state("gifts");
        let mut view = rendered_view(&gifts, 40);
        let second = gifts.with_page(2);
        let third = gifts.with_page(3);
        view.begin(&second);
        view.begin(&third);
        assert!(!view.resolve(&second, Ok(page(999))));
        assert_eq!(view.total_results(), 40);
        assert!(view.stale);
        assert!(view.resolve(&third, Ok(page(41))));
        assert_eq!(view.total_results(), 41);
    }

    #[test]
    fn landing_clears_without_loading() {
        let gifts = state("gifts");
        let mut view = rendered_view(&gifts, 40);
        assert_eq!(view.begin(&QueryState::default()), Transition::Landing);
        assert!(view.results.is_none());
        assert!(!view.loading);
        assert_eq!(view.total_results(), 0);
        assert!(view.pending().is_none());
    }

    #[test]
    fn error_replaces_results_and_allows_resubmit() {
        let gifts = state("gifts");
        let mut view = rendered_view(&gifts, 40);
        let next = gifts.with_statute(Some("87100"));
        view.begin(&next);
        assert!(view.resolve(&next, Err(FetchError::Network("refused".to_string()))));
        assert!(view.results.is_none());
        assert!(matches!(view.error, Some(FetchError::Network(_))));
        assert_eq!(view.begin(&next), Transition::Refinement);
        assert!(view.error.is_none());
        assert!(view.loading);
    }

    #[test]
    fn cancellation_never_resolves() {
        let gifts = state("gifts");
        let mut view = ResultsView::default();
        view.begin(&gifts);
        assert!(!view.resolve(&gifts, Err(FetchError::Cancelled)));
        assert!(view.loading);
    }

    #[test]
    fn empty_page_is_distinct_from_no_fetch() {
        let gifts = state("gifts");
        let view = rendered_view(&gifts, 0);
        assert_eq!(view.results.as_ref().map(|page| page.results.len()), Some(0));
        assert!(ResultsView::default().results.is_none());
    }
}
