use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::domain::format::format_count;

/// Upper bound on statute autocomplete suggestions.
pub const STATUTE_SUGGESTION_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub count: u64,
}

/// Body of `GET /api/filters`: vocabularies and corpus bounds, loaded once
/// per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterMetadata {
    pub topics: Vec<FilterOption>,
    pub statutes: Vec<FilterOption>,
    pub year_min: i32,
    pub year_max: i32,
    pub total_opinions: u64,
}

impl FilterMetadata {
    pub fn years(&self) -> RangeInclusive<i32> {
        self.year_min..=self.year_max
    }

    pub fn topic(&self, value: &str) -> Option<&FilterOption> {
        self.topics.iter().find(|option| option.value == value)
    }

    pub fn statute(&self, value: &str) -> Option<&FilterOption> {
        self.statutes.iter().find(|option| option.value == value)
    }

    pub fn topic_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.topic(value).map_or(value, |option| option.label.as_str())
    }

    /// Statutes whose value or label contains `input`, case-insensitively,
    /// in vocabulary order.
    pub fn suggest_statutes(&self, input: &str) -> Vec<&FilterOption> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.statutes
            .iter()
            .filter(|option| {
                option.value.to_lowercase().contains(&needle)
                    || option.label.to_lowercase().contains(&needle)
            })
            .take(STATUTE_SUGGESTION_LIMIT)
            .collect()
    }
}

impl FilterOption {
    /// `Gifts (1,204)`.
    pub fn display(&self) -> String {
        format!("{} ({})", self.label, format_count(self.count))
    }
}

pub const EXAMPLE_QUERIES: [&str; 2] = [
    "Section 87100 conflict of interest",
    "can a city council member vote on a project near their home",
];

/// Landing blurb. Falls back to generic wording until metadata arrives.
pub fn landing_copy(metadata: Option<&FilterMetadata>) -> String {
    let corpus = match metadata {
        Some(metadata) if metadata.total_opinions > 0 => {
            format!("{} advisory", format_count(metadata.total_opinions))
        }
        _ => "thousands of advisory".to_string(),
    };
    format!(
        "Search {corpus} opinion letters from the California Fair Political Practices Commission, spanning 1975 to 2025."
    )
}
