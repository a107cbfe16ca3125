use clap::{Args, Parser, Subcommand};

use opinions_core::params::Location;
use opinions_core::types::query_state::QueryState;
use opinions_core::types::year_range::{YearEdit, YearRange};

#[derive(Debug, Parser)]
#[command(author, version, about = "Search advisory opinion letters from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one search and print the results page.
    Search(SearchArgs),
    /// Show a single opinion.
    Open {
        id: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List topics, statutes and the year span.
    Filters {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Probe the backend.
    Health,
    /// Interactive session; type `help` once inside.
    Browse {
        /// Starting address, e.g. `q=gifts&topic=gifts`.
        #[arg(long)]
        location: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct SearchArgs {
    /// Free text. Multiple words are joined with spaces.
    pub text: Vec<String>,
    #[arg(long = "topic")]
    pub topics: Vec<String>,
    #[arg(long)]
    pub statute: Option<String>,
    /// `1990~2000`, `1990~`, `~2000` or a single year.
    #[arg(long, value_parser = YearRange::parse)]
    pub years: Option<YearRange>,
    #[arg(long)]
    pub from: Option<i32>,
    #[arg(long)]
    pub to: Option<i32>,
    #[arg(long)]
    pub page: Option<u32>,
    /// Seed the state from a query string; flags are applied on top.
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl SearchArgs {
    /// Folds the flags into a state, starting from `--location` when given.
    /// Every flag goes through the same mutators an interactive edit would,
    /// so the page resets to 1 unless `--page` is passed.
    pub fn to_state(&self) -> QueryState {
        let mut state = self
            .location
            .as_deref()
            .map(|query| Location::parse(query).state())
            .unwrap_or_default();
        let text = self.text.join(" ");
        state = state.with_text(&text);
        if !self.topics.is_empty() {
            state = state.with_topics(&self.topics);
        }
        if let Some(statute) = &self.statute {
            state = state.with_statute(Some(statute));
        }
        if let Some(years) = self.years {
            state = state.with_years(years);
        }
        if self.from.is_some() {
            state = state.with_date_range(YearEdit::From(self.from));
        }
        if self.to.is_some() {
            state = state.with_date_range(YearEdit::To(self.to));
        }
        if let Some(page) = self.page {
            state = state.with_page(page);
        }
        state
    }
}
