use std::sync::Arc;

use tracing::info;

use crate::AppError;
use crate::cli::SearchArgs;
use crate::render;
use crate::state::AppState;
use opinions_core::error::FetchError;
use opinions_core::params::Location;
use opinions_core::types::opinion_id::OpinionId;
use opinions_infra::detail::{DetailFetcher, DetailState};
use opinions_infra::session::SearchSession;

pub async fn search(state: &AppState, args: &SearchArgs) -> Result<(), AppError> {
    let query = args.to_state();
    let mut location = Location::default();
    location.apply(&query);

    let metadata = if query.is_landing() || query.has_filters() {
        state.filters.load(state.api.as_ref()).await.cloned()
    } else {
        None
    };

    let mut session = SearchSession::open(Arc::clone(&state.api), location);
    if !query.is_landing() {
        session.next_update().await;
    }
    let view = session.view();
    if let Some(error) = &view.error {
        println!("{}", render::search_error(error));
        return Err(AppError::Fetch(error.clone()));
    }

    if args.json {
        let body = serde_json::json!({
            "location": session.location().href(),
            "page": view.results,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", session.location().href());
        println!("{}", render::results(view, &session.state(), metadata.as_ref()));
    }
    Ok(())
}

pub async fn open(state: &AppState, raw_id: &str, json: bool) -> Result<(), AppError> {
    let id = OpinionId::try_from(raw_id)?;
    let mut fetcher = DetailFetcher::new(Arc::clone(&state.api));
    fetcher.load(id);
    let settled = fetcher.settle().await;
    match settled {
        DetailState::Found(detail) if json => {
            println!("{}", serde_json::to_string_pretty(detail)?);
            Ok(())
        }
        DetailState::Found(detail) => {
            println!("{}", render::detail(detail));
            Ok(())
        }
        DetailState::NotFound(_) => {
            println!("{}", render::detail_state(settled));
            Err(AppError::Fetch(FetchError::NotFound))
        }
        DetailState::Failed { error, .. } => {
            println!("{}", render::detail_state(settled));
            Err(AppError::Fetch(error.clone()))
        }
        DetailState::Idle | DetailState::Loading(_) => Ok(()),
    }
}

pub async fn filters(state: &AppState, json: bool) -> Result<(), AppError> {
    let Some(metadata) = state.filters.load(state.api.as_ref()).await else {
        return Err(AppError::Unavailable("filter metadata"));
    };
    if json {
        println!("{}", serde_json::to_string_pretty(metadata)?);
    } else {
        println!("{}", render::filters(metadata));
    }
    Ok(())
}

pub async fn health(state: &AppState) -> Result<(), AppError> {
    let status = state.api.health().await?;
    info!(status = %status.status, engine_loaded = status.engine_loaded, "health probe");
    println!("{}", render::health(&status, state.config.api_base.as_str()));
    Ok(())
}
