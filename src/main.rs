mod api;
mod config;
mod error;
mod models;

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
    response::Json,
};
use std::error::Error;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::api::RankService;
use crate::config::Config;
use crate::error::RankError;
use crate::models::PlayerRank;

async fn handle_player_rank(
    State(rank_service): State<RankService>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerRank>, RankError> {
    tracing::info!(%player_id, "Rank requested");

    if player_id.trim().is_empty() {
        return Err(missing_player_id());
    }

    match rank_service.get_player_rank(&player_id).await {
        Ok(rank) => {
            tracing::info!(%player_id, "Rank fetched");
            Ok(Json(rank))
        }
        Err(e) => {
            tracing::warn!(%player_id, error = %e, "Failed to fetch rank");
            Err(e)
        }
    }
}

async fn handle_empty_player_id() -> RankError {
    missing_player_id()
}

fn missing_player_id() -> RankError {
    tracing::warn!("Rejected rank request without a player ID");
    RankError::InvalidRequest
}

async fn health() -> &'static str {
    "OK"
}

fn app(rank_service: RankService) -> Router {
    let router = Router::new()
        .route("/rank/:player_id", get(handle_player_rank))
        .route("/rank/", get(handle_empty_player_id))
        .route("/rl/rank/:player_id", get(handle_player_rank))
        .route("/rl/rank/", get(handle_empty_player_id))
        .route("/health", get(health))
        .with_state(rank_service);

    with_middleware(router)
}

/// Access log per request, and handler panics become a 500 instead of a dropped connection.
fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let rank_service = RankService::new(&config)?;
    let address = config.bind_address()?;

    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(%address, "Rank service listening");
    axum::serve(listener, app(rank_service)).await?;

    Ok(())
}
