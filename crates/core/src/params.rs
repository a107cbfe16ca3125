//! Mapping between [`QueryState`] and flat query parameters.
//!
//! The address bar is the only place search state is persisted, so the
//! encoding is canonical: neutral values are omitted, `topic` repeats once
//! per selected topic, and decoding never fails.

use url::form_urlencoded;

use crate::PER_PAGE;
use crate::types::query_state::QueryState;
use crate::types::year_range::YearRange;

pub const PARAM_QUERY: &str = "q";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_PER_PAGE: &str = "per_page";
pub const PARAM_TOPIC: &str = "topic";
pub const PARAM_STATUTE: &str = "statute";
pub const PARAM_YEAR_START: &str = "year_start";
pub const PARAM_YEAR_END: &str = "year_end";

/// Reads a state out of raw pairs. Unknown keys are ignored; malformed
/// numbers fall back to their neutral value; for single-valued keys the
/// first occurrence wins.
pub fn decode<I, K, V>(pairs: I) -> QueryState
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut text: Option<String> = None;
    let mut topics = Vec::new();
    let mut statute: Option<String> = None;
    let mut year_start: Option<Option<i32>> = None;
    let mut year_end: Option<Option<i32>> = None;
    let mut page: Option<u32> = None;

    for (key, value) in pairs {
        let value = value.as_ref();
        match key.as_ref() {
            PARAM_QUERY => {
                text.get_or_insert_with(|| value.to_string());
            }
            PARAM_TOPIC => topics.push(value.to_string()),
            PARAM_STATUTE => {
                statute.get_or_insert_with(|| value.to_string());
            }
            PARAM_YEAR_START => {
                year_start.get_or_insert_with(|| parse_year(value));
            }
            PARAM_YEAR_END => {
                year_end.get_or_insert_with(|| parse_year(value));
            }
            PARAM_PAGE => {
                page.get_or_insert_with(|| parse_page(value));
            }
            _ => {}
        }
    }

    QueryState::from_parts(
        text.as_deref().unwrap_or_default(),
        topics,
        statute.as_deref(),
        YearRange::new(year_start.flatten(), year_end.flatten()),
        page.unwrap_or(1),
    )
}

/// Canonical parameters for the address bar, neutral values omitted.
pub fn encode(state: &QueryState) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if !state.text().is_empty() {
        pairs.push((PARAM_QUERY, state.text().to_string()));
    }
    if state.page() > 1 {
        pairs.push((PARAM_PAGE, state.page().to_string()));
    }
    push_filters(&mut pairs, state);
    pairs
}

/// Parameters for `GET /api/search`. Unlike [`encode`], page and page size
/// are always sent.
pub fn search_request_params(state: &QueryState) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        (PARAM_QUERY, state.text().to_string()),
        (PARAM_PAGE, state.page().to_string()),
        (PARAM_PER_PAGE, PER_PAGE.to_string()),
    ];
    push_filters(&mut pairs, state);
    pairs
}

fn push_filters(pairs: &mut Vec<(&'static str, String)>, state: &QueryState) {
    for topic in state.topics() {
        pairs.push((PARAM_TOPIC, topic.clone()));
    }
    if let Some(statute) = state.statute() {
        pairs.push((PARAM_STATUTE, statute.to_string()));
    }
    if let Some(start) = state.year_start() {
        pairs.push((PARAM_YEAR_START, start.to_string()));
    }
    if let Some(end) = state.year_end() {
        pairs.push((PARAM_YEAR_END, end.to_string()));
    }
}

/// `application/x-www-form-urlencoded` form of [`encode`], without a
/// leading `?`. Empty for the landing state.
pub fn to_query_string(state: &QueryState) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(encode(state))
        .finish()
}

/// Accepts a query string with or without its leading `?`.
pub fn from_query_string(input: &str) -> QueryState {
    let input = input.trim();
    let input = input.strip_prefix('?').unwrap_or(input);
    decode(form_urlencoded::parse(input.as_bytes()))
}

fn parse_year(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

fn parse_page(value: &str) -> u32 {
    match value.trim().parse::<i64>() {
        Ok(page) if page >= 1 => u32::try_from(page).unwrap_or(u32::MAX),
        _ => 1,
    }
}

/// The navigable address: the single source of truth for search state.
///
/// Callers never hold on to a [`QueryState`]; they apply one here and
/// derive the current state back with [`Location::state`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    query: String,
}

impl Location {
    pub fn parse(input: &str) -> Self {
        Location {
            query: to_query_string(&from_query_string(input)),
        }
    }

    pub fn state(&self) -> QueryState {
        from_query_string(&self.query)
    }

    /// Replaces the address with the canonical encoding of `state`.
    /// Returns whether the address changed.
    pub fn apply(&mut self, state: &QueryState) -> bool {
        let next = to_query_string(state);
        if next == self.query {
            return false;
        }
        self.query = next;
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Address as shown to the user: `/` on landing, `/?q=...` otherwise.
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            "/".to_string()
        } else {
            format!("/?{}", self.query)
        }
    }
}
