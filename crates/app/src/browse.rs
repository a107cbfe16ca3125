use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::AppError;
use crate::render;
use crate::state::AppState;
use opinions_core::PER_PAGE;
use opinions_core::domain::filters::{EXAMPLE_QUERIES, FilterMetadata};
use opinions_core::pagination::total_pages;
use opinions_core::params::Location;
use opinions_core::reconcile::ResultsView;
use opinions_core::types::opinion_id::OpinionId;
use opinions_core::types::query_state::QueryState;
use opinions_core::types::year_range::YearEdit;
use opinions_infra::api::HttpApi;
use opinions_infra::detail::{DetailFetcher, DetailState};
use opinions_infra::session::SearchSession;

const HELP: &str = "\
search TEXT      new search (blank input is ignored)
topic NAME       add or remove a topic filter
untopic NAME     remove a topic filter
statute [S]      set the statute filter; no argument clears it
from [YEAR]      lower year bound; no argument clears it
to [YEAR]        upper year bound; no argument clears it
page N | next | prev
clear            drop all filters
retry            re-run a failed search or opinion load
open ID          show an opinion
back             return to the results
example N        run one of the example queries
suggest TEXT     statute suggestions
help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Topic(String),
    Untopic(String),
    Statute(Option<String>),
    From(Option<i32>),
    To(Option<i32>),
    Page(u32),
    Next,
    Prev,
    Clear,
    Retry,
    Open(String),
    Back,
    Example(usize),
    Suggest(String),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a number")]
    InvalidNumber(String),
}

/// Parses one input line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<BrowseCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());
    let required = |name: &'static str| arg.clone().ok_or(CommandError::MissingArgument(name));

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" => BrowseCommand::Search(rest.to_string()),
        "topic" => BrowseCommand::Topic(required("topic")?),
        "untopic" => BrowseCommand::Untopic(required("untopic")?),
        "statute" => BrowseCommand::Statute(arg.clone()),
        "from" => BrowseCommand::From(optional_year(rest)?),
        "to" => BrowseCommand::To(optional_year(rest)?),
        "page" => BrowseCommand::Page(number(&required("page")?)?),
        "next" | "n" => BrowseCommand::Next,
        "prev" | "p" => BrowseCommand::Prev,
        "clear" => BrowseCommand::Clear,
        "retry" => BrowseCommand::Retry,
        "open" | "o" => BrowseCommand::Open(required("open")?),
        "back" | "b" => BrowseCommand::Back,
        "example" => BrowseCommand::Example(number(&required("example")?)?),
        "suggest" => BrowseCommand::Suggest(required("suggest")?),
        "help" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(raw: &str) -> Result<T, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidNumber(raw.to_string()))
}

/// Blank or `any` clears the bound.
fn optional_year(raw: &str) -> Result<Option<i32>, CommandError> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("any") {
        return Ok(None);
    }
    number(raw).map(Some)
}

/// The state a search-side command moves to, or `None` when the command
/// does not touch the search state (or has nowhere to go).
pub fn next_state(command: &BrowseCommand, state: &QueryState, view: &ResultsView) -> Option<QueryState> {
    let last_page = view
        .results
        .as_ref()
        .map(|page| total_pages(page.total_results, PER_PAGE));
    match command {
        BrowseCommand::Search(text) => Some(state.with_text(text)),
        BrowseCommand::Topic(topic) => Some(state.toggle_topic(topic)),
        BrowseCommand::Untopic(topic) if state.has_topic(topic) => Some(state.toggle_topic(topic)),
        BrowseCommand::Statute(statute) => Some(state.with_statute(statute.as_deref())),
        BrowseCommand::From(year) => Some(state.with_date_range(YearEdit::From(*year))),
        BrowseCommand::To(year) => Some(state.with_date_range(YearEdit::To(*year))),
        BrowseCommand::Page(page) => Some(state.with_page(*page)),
        BrowseCommand::Next => match last_page {
            Some(last) if state.page() < last => Some(state.with_page(state.page() + 1)),
            _ => None,
        },
        BrowseCommand::Prev if state.page() > 1 => Some(state.with_page(state.page() - 1)),
        BrowseCommand::Clear if state.has_filters() => Some(state.clear_filters()),
        BrowseCommand::Example(index) => EXAMPLE_QUERIES
            .get(index.checked_sub(1)?)
            .map(|query| state.with_text(query)),
        _ => None,
    }
}

enum Screen {
    Results,
    Detail,
}

struct Browser {
    state: AppState,
    session: SearchSession<HttpApi>,
    detail: DetailFetcher<HttpApi>,
    screen: Screen,
    metadata: Option<FilterMetadata>,
}

impl Browser {
    fn show_results(&self) {
        let state = self.session.state();
        println!("\n{}", self.session.location().href());
        println!("{}", render::results(self.session.view(), &state, self.metadata.as_ref()));
        if self.session.view().error.as_ref().is_some_and(|err| err.offers_retry()) {
            println!("Type `retry` to try again.");
        }
    }

    fn show_detail(&self) {
        println!("\n{}", render::detail_state(self.detail.state()));
        if matches!(self.detail.state(), DetailState::Failed { .. }) {
            println!("Type `retry` to try again, or `back` for the results.");
        }
    }

    /// Returns `false` when the loop should stop.
    async fn handle(&mut self, command: BrowseCommand) -> bool {
        match command {
            BrowseCommand::Quit => return false,
            BrowseCommand::Help => println!("{HELP}"),
            BrowseCommand::Open(raw) => match OpinionId::try_from(raw.as_str()) {
                Ok(id) => {
                    self.screen = Screen::Detail;
                    self.detail.load(id);
                    self.show_detail();
                }
                Err(err) => println!("{err}"),
            },
            BrowseCommand::Back => {
                self.detail.reset();
                self.screen = Screen::Results;
                self.show_results();
            }
            BrowseCommand::Retry => match self.screen {
                Screen::Detail => {
                    if self.detail.retry().is_some() {
                        self.show_detail();
                    }
                }
                Screen::Results => {
                    if self.session.retry() {
                        self.show_results();
                    }
                }
            },
            BrowseCommand::Suggest(input) => self.suggest(&input).await,
            command => {
                let current = self.session.state();
                match next_state(&command, &current, self.session.view()) {
                    Some(next) => {
                        self.detail.reset();
                        self.screen = Screen::Results;
                        let transition = self.session.navigate(&next);
                        debug!(?transition, "navigated");
                        self.show_results();
                    }
                    None => println!("Nothing to do."),
                }
            }
        }
        true
    }

    async fn suggest(&mut self, input: &str) {
        if self.session.state().statute().is_some() {
            println!("A statute filter is already set; `statute` with no argument clears it.");
            return;
        }
        if self.metadata.is_none() {
            self.metadata = self.state.filters.load(self.state.api.as_ref()).await.cloned();
        }
        match &self.metadata {
            Some(metadata) => println!("{}", render::suggestions(input, &metadata.suggest_statutes(input))),
            None => println!("Filter metadata is unavailable right now."),
        }
    }
}

async fn settle(detail: &mut DetailFetcher<HttpApi>) {
    detail.settle().await;
}

pub async fn run(state: AppState, location: Location) -> Result<(), AppError> {
    let api = Arc::clone(&state.api);
    let metadata = state.filters.load(api.as_ref()).await.cloned();
    info!(href = %location.href(), "browse session starting");
    let mut browser = Browser {
        session: SearchSession::open(Arc::clone(&api), location),
        detail: DetailFetcher::new(api),
        screen: Screen::Results,
        metadata,
        state,
    };
    browser.show_results();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let viewing_detail = matches!(browser.screen, Screen::Detail);
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if !browser.handle(command).await {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => println!("{err}"),
                }
            }
            changed = browser.session.next_update() => {
                if changed && !viewing_detail {
                    browser.show_results();
                }
            }
            _ = settle(&mut browser.detail), if viewing_detail => {
                browser.show_detail();
            }
        }
    }
    info!("browse session finished");
    Ok(())
}
