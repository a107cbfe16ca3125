use std::collections::HashSet;

use crate::types::year_range::{YearEdit, YearRange};

/// Snapshot of what the user is searching for.
///
/// A value is rebuilt from the address on every change and has no identity
/// of its own. Topics keep insertion order (it drives the order of repeated
/// `topic` parameters) but compare as a set.
#[derive(Debug, Clone)]
pub struct QueryState {
    text: String,
    topics: Vec<String>,
    statute: Option<String>,
    years: YearRange,
    page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        QueryState {
            text: String::new(),
            topics: Vec::new(),
            statute: None,
            years: YearRange::UNBOUNDED,
            page: 1,
        }
    }
}

impl PartialEq for QueryState {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.statute == other.statute
            && self.years == other.years
            && self.page == other.page
            && same_topics(&self.topics, &other.topics)
    }
}

impl Eq for QueryState {}

fn same_topics(left: &[String], right: &[String]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let left: HashSet<&str> = left.iter().map(String::as_str).collect();
    right.iter().all(|topic| left.contains(topic.as_str()))
}

impl QueryState {
    /// Builds a normalized state from raw parts: text trimmed, blank and
    /// repeated topics dropped, blank statute treated as unset, page clamped
    /// to at least 1.
    pub fn from_parts(
        text: &str,
        topics: impl IntoIterator<Item = impl AsRef<str>>,
        statute: Option<&str>,
        years: YearRange,
        page: u32,
    ) -> Self {
        let mut state = QueryState {
            text: text.trim().to_string(),
            topics: Vec::new(),
            statute: normalize_value(statute),
            years,
            page: page.max(1),
        };
        for topic in topics {
            state.push_topic(topic.as_ref());
        }
        state
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn statute(&self) -> Option<&str> {
        self.statute.as_deref()
    }

    pub fn years(&self) -> YearRange {
        self.years
    }

    pub fn year_start(&self) -> Option<i32> {
        self.years.start()
    }

    pub fn year_end(&self) -> Option<i32> {
        self.years.end()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Empty text: nothing is fetched and the landing copy is shown.
    pub fn is_landing(&self) -> bool {
        self.text.is_empty()
    }

    pub fn has_filters(&self) -> bool {
        !self.topics.is_empty() || self.statute.is_some() || !self.years.is_unbounded()
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|existing| existing == topic)
    }

    /// New search text. Blank input is ignored and returns the state as is.
    pub fn with_text(&self, text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.clone();
        }
        QueryState {
            text: trimmed.to_string(),
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_topics(&self, topics: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let mut next = QueryState {
            topics: Vec::new(),
            page: 1,
            ..self.clone()
        };
        for topic in topics {
            next.push_topic(topic.as_ref());
        }
        next
    }

    /// Adds the topic if absent, removes it if present.
    pub fn toggle_topic(&self, topic: &str) -> Self {
        let mut next = QueryState {
            page: 1,
            ..self.clone()
        };
        if next.has_topic(topic) {
            next.topics.retain(|existing| existing != topic);
        } else {
            next.push_topic(topic);
        }
        next
    }

    pub fn with_statute(&self, statute: Option<&str>) -> Self {
        QueryState {
            statute: normalize_value(statute),
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_date_range(&self, edit: YearEdit) -> Self {
        QueryState {
            years: self.years.apply(edit),
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_years(&self, years: YearRange) -> Self {
        QueryState {
            years,
            page: 1,
            ..self.clone()
        }
    }

    /// The only mutation that keeps the rest of the state, page included.
    pub fn with_page(&self, page: u32) -> Self {
        QueryState {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Drops topics, statute and years and returns to page 1; text stays.
    pub fn clear_filters(&self) -> Self {
        QueryState {
            text: self.text.clone(),
            ..QueryState::default()
        }
    }

    fn push_topic(&mut self, topic: &str) {
        let topic = topic.trim();
        if topic.is_empty() || self.has_topic(topic) {
            return;
        }
        self.topics.push(topic.to_string());
    }
}

fn normalize_value(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
