use serde::{Deserialize, Serialize};

use crate::domain::format::paragraphs;

pub const FORMAT_CAVEAT: &str =
    "This opinion was extracted from a non-standard format and may contain formatting artifacts.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitedOpinion {
    pub opinion_number: String,
    pub exists_in_corpus: bool,
}

/// Body of `GET /api/opinions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionDetail {
    pub id: String,
    pub opinion_number: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub requestor_name: Option<String>,
    #[serde(default)]
    pub requestor_title: Option<String>,
    #[serde(default)]
    pub requestor_city: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub facts: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub topic_primary: Option<String>,
    #[serde(default)]
    pub topic_secondary: Option<String>,
    #[serde(default)]
    pub topic_tags: Vec<String>,
    #[serde(default)]
    pub government_code_sections: Vec<String>,
    #[serde(default)]
    pub regulations: Vec<String>,
    #[serde(default)]
    pub prior_opinions: Vec<CitedOpinion>,
    #[serde(default)]
    pub cited_by: Vec<CitedOpinion>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub has_standard_format: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpinionSection {
    pub label: &'static str,
    pub paragraphs: Vec<String>,
}

impl OpinionDetail {
    /// Primary, then secondary, then tags, without repeats.
    pub fn topics(&self) -> Vec<&str> {
        let mut topics: Vec<&str> = Vec::new();
        let candidates = self
            .topic_primary
            .iter()
            .chain(self.topic_secondary.iter())
            .chain(self.topic_tags.iter());
        for topic in candidates {
            if !topics.contains(&topic.as_str()) {
                topics.push(topic);
            }
        }
        topics
    }

    pub fn statutes(&self) -> Vec<&str> {
        self.government_code_sections
            .iter()
            .chain(self.regulations.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn requestor_line(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.requestor_name, &self.requestor_title, &self.requestor_city]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Question, Facts, Analysis, Conclusion; absent sections are skipped.
    pub fn sections(&self) -> Vec<OpinionSection> {
        [
            ("Question", &self.question),
            ("Facts", &self.facts),
            ("Analysis", &self.analysis),
            ("Conclusion", &self.conclusion),
        ]
        .into_iter()
        .filter_map(|(label, text)| {
            let paragraphs = paragraphs(text.as_deref()?);
            (!paragraphs.is_empty()).then_some(OpinionSection { label, paragraphs })
        })
        .collect()
    }

    /// Only an explicit `false` earns the caveat; unknown format does not.
    pub fn needs_format_caveat(&self) -> bool {
        self.has_standard_format == Some(false)
    }

    pub fn has_citations(&self) -> bool {
        !self.prior_opinions.is_empty() || !self.cited_by.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> OpinionDetail {
        serde_json::from_value(serde_json::json!({
            "id": "A-24-001",
            "opinion_number": "A-24-001",
            "year": 2024,
            "requestor_name": "Jane Doe",
            "requestor_title": null,
            "requestor_city": "Sacramento",
            "question": "May she vote?",
            "facts": "She owns land.\n\nThe project is nearby.",
            "conclusion": "No.",
            "topic_primary": "conflicts_of_interest",
            "topic_secondary": "conflicts_of_interest",
            "topic_tags": ["voting", "conflicts_of_interest"],
            "government_code_sections": ["87100"],
            "regulations": ["18702"],
            "prior_opinions": [{"opinion_number": "A-20-010", "exists_in_corpus": true}],
            "has_standard_format": false
        }))
        .unwrap()
    }

    #[test]
    fn topics_are_deduplicated_in_order() {
        assert_eq!(detail().topics(), vec!["conflicts_of_interest", "voting"]);
    }

    #[test]
    fn statutes_join_code_and_regulations() {
        assert_eq!(detail().statutes(), vec!["87100", "18702"]);
    }

    #[test]
    fn requestor_line_skips_missing_parts() {
        assert_eq!(detail().requestor_line().as_deref(), Some("Jane Doe, Sacramento"));
    }

    #[test]
    fn sections_follow_fixed_order() {
        let sections = detail().sections();
        let labels: Vec<&str> = sections.iter().map(|section| section.label).collect();
        assert_eq!(labels, vec!["Question", "Facts", "Conclusion"]);
        assert_eq!(sections[1].paragraphs.len(), 2);
    }

    #[test]
    fn caveat_only_for_explicit_nonstandard() {
        let mut detail = detail();
        assert!(detail.needs_format_caveat());
        detail.has_standard_format = None;
        assert!(!detail.needs_format_caveat());
        assert!(detail.has_citations());
    }
}
