//! Plain-text views. Everything here is a pure function of display state
//! so the browse loop and the one-shot commands print the same thing.

use opinions_core::PER_PAGE;
use opinions_core::domain::filters::{EXAMPLE_QUERIES, FilterMetadata, FilterOption, landing_copy};
use opinions_core::domain::format::{format_count, format_date, format_statute, format_topic};
use opinions_core::domain::opinion::{CitedOpinion, FORMAT_CAVEAT, OpinionDetail};
use opinions_core::domain::search::{ResultCard, empty_results_message};
use opinions_core::error::FetchError;
use opinions_core::pagination::{PageItem, Pager, result_count_label};
use opinions_core::reconcile::ResultsView;
use opinions_core::types::query_state::QueryState;
use opinions_core::types::year_range::YearRange;
use opinions_infra::api::HealthStatus;
use opinions_infra::detail::DetailState;

const SKELETON_ROWS: usize = 3;

pub fn landing(metadata: Option<&FilterMetadata>) -> String {
    let mut lines = vec![landing_copy(metadata), String::new(), "Try:".to_string()];
    lines.extend(
        EXAMPLE_QUERIES
            .iter()
            .enumerate()
            .map(|(index, query)| format!("  {}. {query}", index + 1)),
    );
    lines.join("\n")
}

/// The results area for `state`, as `view` currently has it.
pub fn results(view: &ResultsView, state: &QueryState, metadata: Option<&FilterMetadata>) -> String {
    if state.is_landing() {
        return landing(metadata);
    }
    let mut lines = Vec::new();
    if let Some(summary) = filter_summary(state, metadata) {
        lines.push(summary);
    }

    if let Some(error) = &view.error {
        lines.push(search_error(error));
        return lines.join("\n");
    }

    let Some(page) = &view.results else {
        if view.loading {
            lines.push(format!("Searching for \u{201c}{}\u{201d}\u{2026}", state.text()));
            lines.extend((0..SKELETON_ROWS).map(|_| format!("  {}", "\u{2591}".repeat(24))));
        }
        return lines.join("\n");
    };

    let mut header = result_count_label(page.total_results);
    if view.stale {
        header.push_str(" \u{00b7} updating\u{2026}");
    }
    lines.insert(0, header);

    if page.results.is_empty() {
        let (headline, hint) = empty_results_message(state.text(), state.has_filters());
        lines.push(String::new());
        lines.push(headline);
        lines.push(hint.to_string());
        return lines.join("\n");
    }

    for item in &page.results {
        lines.push(String::new());
        lines.push(card(&item.card()));
    }
    if let Some(pager) = Pager::new(state.page(), page.total_results, PER_PAGE) {
        lines.push(String::new());
        lines.push(pager_line(&pager));
    }
    lines.join("\n")
}

pub fn search_error(error: &FetchError) -> String {
    error.search_message().to_string()
}

fn card(card: &ResultCard) -> String {
    let mut lines = vec![format!("{}  [open {}]", card.heading, card.opinion_id)];
    if let Some(primary) = &card.primary {
        lines.push(format!("  {primary}"));
    }
    if let Some(secondary) = &card.secondary {
        lines.push(format!("  \u{2192} {secondary}"));
    }
    if !card.tags.is_empty() || card.more_statutes.is_some() {
        let mut tags = card.tags.join(" \u{00b7} ");
        if let Some(more) = &card.more_statutes {
            tags.push(' ');
            tags.push_str(more);
        }
        lines.push(format!("  {tags}"));
    }
    lines.join("\n")
}

/// `‹ prev  1 … 4 [5] 6 … 10  next ›`; a disabled direction is drawn as `-`.
pub fn pager_line(pager: &Pager) -> String {
    let strip: Vec<String> = pager
        .items
        .iter()
        .map(|item| match item {
            PageItem::Page(page) if *page == pager.page => format!("[{page}]"),
            other => other.to_string(),
        })
        .collect();
    let prev = if pager.has_prev() { "\u{2039} prev" } else { "-" };
    let next = if pager.has_next() { "next \u{203a}" } else { "-" };
    format!("{prev}  {}  {next}", strip.join(" "))
}

/// Active filter chips. `None` when nothing is filtered, which also hides
/// the clear action.
pub fn filter_summary(state: &QueryState, metadata: Option<&FilterMetadata>) -> Option<String> {
    if !state.has_filters() {
        return None;
    }
    let mut chips: Vec<String> = state
        .topics()
        .iter()
        .map(|topic| match metadata {
            Some(metadata) => metadata.topic_label(topic).to_string(),
            None => format_topic(topic),
        })
        .collect();
    if let Some(statute) = state.statute() {
        chips.push(format_statute(statute));
    }
    if let Some(years) = year_label(state.years()) {
        chips.push(years);
    }
    Some(format!(
        "Filters: {}  (clear to remove)",
        chips.join(" \u{00b7} ")
    ))
}

fn year_label(years: YearRange) -> Option<String> {
    match (years.start(), years.end()) {
        (Some(start), Some(end)) if start == end => Some(start.to_string()),
        (Some(start), Some(end)) => Some(format!("{start}\u{2013}{end}")),
        (Some(start), None) => Some(format!("from {start}")),
        (None, Some(end)) => Some(format!("through {end}")),
        (None, None) => None,
    }
}

pub fn detail_state(state: &DetailState) -> String {
    match state {
        DetailState::Idle => String::new(),
        DetailState::Loading(id) => format!("Loading opinion {id}\u{2026}"),
        DetailState::Found(found) => detail(found),
        DetailState::NotFound(_) => FetchError::NotFound.detail_message().to_string(),
        DetailState::Failed { error, .. } => error.detail_message().to_string(),
    }
}

pub fn detail(detail: &OpinionDetail) -> String {
    let mut lines = vec![format!("Opinion {}", detail.opinion_number)];

    let mut meta = Vec::new();
    match detail.date.as_deref().and_then(format_date) {
        Some(date) => meta.push(date),
        None => meta.extend(detail.year.map(|year| year.to_string())),
    }
    meta.extend(detail.document_type.clone());
    if !meta.is_empty() {
        lines.push(meta.join(" \u{00b7} "));
    }
    if let Some(requestor) = detail.requestor_line() {
        lines.push(format!("Requested by: {requestor}"));
    }
    let topics = detail.topics();
    if !topics.is_empty() {
        let labels: Vec<String> = topics.into_iter().map(format_topic).collect();
        lines.push(format!("Topics: {}", labels.join(", ")));
    }
    let statutes = detail.statutes();
    if !statutes.is_empty() {
        let labels: Vec<String> = statutes.into_iter().map(format_statute).collect();
        lines.push(format!("Statutes: {}", labels.join(", ")));
    }

    if detail.needs_format_caveat() {
        lines.push(String::new());
        lines.push(format!("Note: {FORMAT_CAVEAT}"));
    }

    for section in detail.sections() {
        lines.push(String::new());
        lines.push(section.label.to_uppercase());
        for (index, paragraph) in section.paragraphs.iter().enumerate() {
            if index > 0 {
                lines.push(String::new());
            }
            lines.push(paragraph.clone());
        }
    }

    if detail.has_citations() {
        lines.push(String::new());
        if !detail.prior_opinions.is_empty() {
            lines.push(format!("Cites: {}", citations(&detail.prior_opinions)));
        }
        if !detail.cited_by.is_empty() {
            lines.push(format!("Cited by: {}", citations(&detail.cited_by)));
        }
    }

    let mut facts = Vec::new();
    if let Some(pages) = detail.page_count {
        facts.push(format!("{} pages", format_count(u64::from(pages))));
    }
    if let Some(words) = detail.word_count {
        facts.push(format!("{} words", format_count(words)));
    }
    if !facts.is_empty() || detail.pdf_url.is_some() {
        lines.push(String::new());
    }
    if !facts.is_empty() {
        lines.push(facts.join(" \u{00b7} "));
    }
    if let Some(pdf) = &detail.pdf_url {
        lines.push(format!("PDF: {pdf}"));
    }
    lines.join("\n")
}

/// Opinions in the collection get an `open` hint; the rest are plain text.
fn citations(cited: &[CitedOpinion]) -> String {
    cited
        .iter()
        .map(|entry| {
            if entry.exists_in_corpus {
                format!("{} [open]", entry.opinion_number)
            } else {
                entry.opinion_number.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn filters(metadata: &FilterMetadata) -> String {
    let mut lines = vec![format!(
        "{} opinions, {}\u{2013}{}",
        format_count(metadata.total_opinions),
        metadata.year_min,
        metadata.year_max
    )];
    lines.push(String::new());
    lines.push("Topics:".to_string());
    lines.extend(metadata.topics.iter().map(option_line));
    lines.push(String::new());
    lines.push("Statutes:".to_string());
    lines.extend(metadata.statutes.iter().map(option_line));
    lines.join("\n")
}

fn option_line(option: &FilterOption) -> String {
    format!("  {}  [{}]", option.display(), option.value)
}

pub fn suggestions(input: &str, options: &[&FilterOption]) -> String {
    if options.is_empty() {
        return format!("No statutes match \u{201c}{}\u{201d}.", input.trim());
    }
    options
        .iter()
        .map(|option| option_line(option))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn health(status: &HealthStatus, base: &str) -> String {
    let engine = match (&status.engine_name, status.engine_loaded) {
        (Some(name), true) => format!("{name} loaded"),
        (Some(name), false) => format!("{name} not loaded"),
        (None, true) => "loaded".to_string(),
        (None, false) => "not loaded".to_string(),
    };
    format!(
        "{base}: {} \u{00b7} engine {engine} \u{00b7} {} opinions indexed",
        status.status,
        format_count(status.opinions_indexed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use opinions_core::domain::search::{FiltersApplied, ResultItem, SearchPage};

    fn item(id: &str, statutes: &[&str]) -> ResultItem {
        ResultItem {
            opinion_id: id.to_string(),
            opinion_number: id.to_string(),
            date: Some("2024-01-15".to_string()),
            year: Some(2024),
            question: Some("May the official vote?".to_string()),
            conclusion: Some("No.".to_string()),
            topics: vec!["conflicts_of_interest".to_string()],
            statutes: statutes.iter().map(|s| s.to_string()).collect(),
            rank: Some(1),
            document_type: None,
        }
    }

    fn page(results: Vec<ResultItem>, total: u64) -> SearchPage {
        SearchPage {
            results,
            total_results: total,
            query: None,
            page: None,
            per_page: None,
            filters_applied: FiltersApplied::default(),
        }
    }

    fn metadata() -> FilterMetadata {
        FilterMetadata {
            topics: vec![FilterOption {
                value: "gifts".to_string(),
                label: "Gifts".to_string(),
                count: 1204,
            }],
            statutes: Vec::new(),
            year_min: 1975,
            year_max: 2025,
            total_opinions: 14100,
        }
    }

    fn ethics() -> QueryState {
        QueryState::default().with_text("ethics")
    }

    #[test]
    fn landing_names_corpus_size_once_known() {
        assert!(landing(Some(&metadata())).contains("14,100 advisory opinion letters"));
        let fallback = landing(None);
        assert!(fallback.contains("thousands of advisory opinion letters"));
        assert!(fallback.contains("1. Section 87100 conflict of interest"));
    }

    #[test]
    fn empty_results_quote_the_query() {
        let mut view = ResultsView::default();
        view.results = Some(page(Vec::new(), 0));
        let text = results(&view, &ethics(), None);
        assert!(text.starts_with("0 results"));
        assert!(text.contains("No results found for \u{201c}ethics\u{201d}"));
        assert!(!text.contains("with the current filters"));

        let filtered = ethics().toggle_topic("gifts");
        let text = results(&view, &filtered, Some(&metadata()));
        assert!(text.contains("with the current filters"));
        assert!(text.contains("Filters: Gifts"));
    }

    #[test]
    fn stale_results_stay_visible_with_marker() {
        let mut view = ResultsView::default();
        view.results = Some(page(vec![item("A-24-001", &["87100"])], 45));
        view.loading = true;
        view.stale = true;
        let text = results(&view, &ethics().with_page(2), None);
        assert!(text.starts_with("45 results \u{00b7} updating"));
        assert!(text.contains("A-24-001 \u{00b7} January 15, 2024  [open A-24-001]"));
        assert!(text.contains("\u{2039} prev  1 [2] 3  next \u{203a}"));
    }

    #[test]
    fn fresh_query_shows_skeleton() {
        let mut view = ResultsView::default();
        view.loading = true;
        let text = results(&view, &ethics(), None);
        assert!(text.starts_with("Searching for \u{201c}ethics\u{201d}"));
        assert_eq!(text.lines().count(), 1 + SKELETON_ROWS);
    }

    #[test]
    fn error_replaces_results() {
        let mut view = ResultsView::default();
        view.error = Some(FetchError::Network("refused".to_string()));
        let text = results(&view, &ethics(), None);
        assert!(text.contains("Could not reach the search service"));
    }

    #[test]
    fn card_caps_statutes() {
        let text = card(&item("A-1", &["1", "2", "3", "4", "5"]).card());
        assert!(text.contains("Conflicts Of Interest \u{00b7} \u{00a7}1 \u{00b7} \u{00a7}2 \u{00b7} \u{00a7}3 +2 more"));
        assert!(text.contains("  \u{2192} No."));
    }

    #[test]
    fn pager_marks_disabled_ends() {
        let first = Pager::new(1, 200, PER_PAGE).unwrap();
        assert_eq!(pager_line(&first), "-  [1] 2 \u{2026} 10  next \u{203a}");
        let last = Pager::new(10, 200, PER_PAGE).unwrap();
        assert!(pager_line(&last).ends_with("[10]  -"));
        assert!(Pager::new(1, 20, PER_PAGE).is_none());
    }

    #[test]
    fn single_year_filter_label() {
        let state = ethics().with_years(YearRange::new(Some(2004), Some(2004)));
        assert_eq!(
            filter_summary(&state, None).unwrap(),
            "Filters: 2004  (clear to remove)"
        );
        assert!(filter_summary(&ethics(), None).is_none());
    }

    #[test]
    fn detail_shows_caveat_sections_and_citations() {
        let detail: OpinionDetail = serde_json::from_value(serde_json::json!({
            "id": "A-24-001",
            "opinion_number": "A-24-001",
            "date": "2024-01-15",
            "requestor_name": "Jane Doe",
            "requestor_city": "Sacramento",
            "question": "May she vote?",
            "facts": "First.\n\nSecond\nline.",
            "topic_primary": "gifts",
            "government_code_sections": ["87100"],
            "prior_opinions": [
                {"opinion_number": "A-20-010", "exists_in_corpus": true},
                {"opinion_number": "B-99-1", "exists_in_corpus": false}
            ],
            "word_count": 1234,
            "has_standard_format": false
        }))
        .unwrap();
        let text = super::detail(&detail);
        assert!(text.contains("January 15, 2024"));
        assert!(text.contains("Requested by: Jane Doe, Sacramento"));
        assert!(text.contains(FORMAT_CAVEAT));
        assert!(text.contains("FACTS\nFirst.\n\nSecond line."));
        assert!(text.contains("Cites: A-20-010 [open], B-99-1"));
        assert!(text.contains("1,234 words"));
        assert!(!text.contains("CONCLUSION"));
    }
}
