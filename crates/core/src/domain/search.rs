use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::format::{format_date, format_statute, format_topic};

/// Statute tags shown on a result card before collapsing into `+N more`.
pub const STATUTE_DISPLAY_CAP: usize = 3;

/// One ranked hit from `GET /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub opinion_id: String,
    pub opinion_number: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub statutes: Vec<String>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub document_type: Option<String>,
}

impl ResultItem {
    /// Headline text: the question, or the conclusion when there is none.
    pub fn primary_text(&self) -> Option<&str> {
        non_empty(self.question.as_deref()).or_else(|| non_empty(self.conclusion.as_deref()))
    }

    /// Shown under the headline only when the headline is the question.
    pub fn secondary_text(&self) -> Option<&str> {
        non_empty(self.question.as_deref())?;
        non_empty(self.conclusion.as_deref())
    }

    pub fn visible_statutes(&self) -> &[String] {
        &self.statutes[..self.statutes.len().min(STATUTE_DISPLAY_CAP)]
    }

    pub fn hidden_statute_count(&self) -> usize {
        self.statutes.len().saturating_sub(STATUTE_DISPLAY_CAP)
    }

    pub fn card(&self) -> ResultCard {
        let mut tags: Vec<String> = self.topics.iter().map(|topic| format_topic(topic)).collect();
        tags.extend(self.visible_statutes().iter().map(|statute| format_statute(statute)));
        let hidden = self.hidden_statute_count();
        ResultCard {
            opinion_id: self.opinion_id.clone(),
            heading: match self.date.as_deref().and_then(format_date) {
                Some(date) => format!("{} · {}", self.opinion_number, date),
                None => self.opinion_number.clone(),
            },
            primary: self.primary_text().map(str::to_string),
            secondary: self.secondary_text().map(str::to_string),
            tags,
            more_statutes: (hidden > 0).then(|| format!("+{hidden} more")),
        }
    }
}

/// Display-ready projection of a [`ResultItem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub opinion_id: String,
    pub heading: String,
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub tags: Vec<String>,
    pub more_statutes: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Body of a successful `GET /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<ResultItem>,
    pub total_results: u64,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub filters_applied: FiltersApplied,
}

/// Echo of the filters the backend applied; values are strings or integers
/// depending on the filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiltersApplied(pub BTreeMap<String, FilterValue>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(i64),
    Text(String),
    List(Vec<String>),
}

/// Copy for a completed search that matched nothing.
pub fn empty_results_message(query: &str, has_filters: bool) -> (String, &'static str) {
    let mut headline = format!("No results found for \u{201c}{query}\u{201d}");
    if has_filters {
        headline.push_str(" with the current filters");
    }
    let hint = if has_filters {
        "Try broadening your search or removing some filters."
    } else {
        "Try different keywords, a statute number (e.g. \u{201c}Section 87100\u{201d}), or a broader search term."
    };
    (headline, hint)
}
