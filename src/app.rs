use crate::catalog::{CatalogApi, CatalogClient, CatalogSnapshot};
use crate::details::{
    self, DetailsPage, DetailsView, EpisodeSource, PlaceholderEpisodes, SeasonPicker,
};
use crate::hero;
use crate::models::{Catalog, ContentItem, DisplayRecord};
use crate::playback::{report_playback_failure, PlaybackFailure};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

const DEFAULT_PORT: u16 = 3146;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogApi>,
    pub episodes: Arc<dyn EpisodeSource>,
}

pub async fn run_server() -> Result<()> {
    let catalog: Arc<dyn CatalogApi> = Arc::new(CatalogClient::from_env()?);
    let state = AppState {
        catalog,
        episodes: Arc::new(PlaceholderEpisodes),
    };

    let port = match env::var("PORT") {
        Ok(raw) => raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("PORT is not a valid port: {raw}"))?,
        Err(_) => DEFAULT_PORT,
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/hero", get(hero_handler))
        .route("/details/:id", get(details_handler))
        .route("/details/:id/play", get(play_handler))
        .route("/playback/failure", post(playback_failure_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HeroResponse {
    pub hero: DisplayRecord,
    pub play_path: String,
    pub more_info_path: String,
}

async fn hero_handler(State(state): State<AppState>) -> Response {
    // Without a catalog (loading or unreachable) the hero shows the welcome card.
    let snapshot = state.catalog.snapshot().await.unwrap_or_else(|e| {
        warn!("Catalog unavailable for hero: {:?}", e);
        CatalogSnapshot::default()
    });
    let record = match snapshot.catalog.as_deref() {
        Some(catalog) => hero::select_hero(catalog),
        None => hero::placeholder(),
    };
    let body = HeroResponse {
        play_path: hero::play_intent(&record).path(),
        more_info_path: hero::more_info_intent(&record).path(),
        hero: record,
    };
    Json(body).into_response()
}

#[derive(Debug, Default, Deserialize)]
struct DetailsQuery {
    season: Option<usize>,
    #[serde(default)]
    open: bool,
}

async fn details_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailsQuery>,
) -> Response {
    let snapshot = match load_snapshot(&state).await {
        Ok(s) => s,
        Err(res) => return res,
    };

    let item = match lookup(&snapshot, &id) {
        Ok(item) => item,
        Err(res) => return res,
    };
    let picker = SeasonPicker {
        selected: query.season.unwrap_or(1),
        open: query.open,
    };
    Json(DetailsPage::build(item, &picker, state.episodes.as_ref())).into_response()
}

#[derive(Debug, Default, Deserialize)]
struct PlayQuery {
    episode: Option<String>,
}

async fn play_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PlayQuery>,
) -> Response {
    let snapshot = match load_snapshot(&state).await {
        Ok(s) => s,
        Err(res) => return res,
    };

    let item = match lookup(&snapshot, &id) {
        Ok(item) => item,
        Err(res) => return res,
    };
    match details::play_intent(item, query.episode.as_deref()) {
        Some(intent) => Json(json!({ "path": intent.path() })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "status": "error",
                "message": "Choose an episode to play"
            })),
        )
            .into_response(),
    }
}

async fn playback_failure_handler(Json(failure): Json<PlaybackFailure>) -> StatusCode {
    report_playback_failure(&failure);
    StatusCode::NO_CONTENT
}

async fn load_snapshot(state: &AppState) -> Result<CatalogSnapshot, Response> {
    state.catalog.snapshot().await.map_err(|e| {
        error!("Failed to load catalog: {:?}", e);
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "status": "error", "message": format!("Failed to load catalog: {}", e) })),
        )
            .into_response()
    })
}

/// Catalog lookup for routes addressed by id. No navigated record is ever
/// passed here, so only a catalog hit counts as found.
fn lookup<'a>(snapshot: &'a CatalogSnapshot, id: &str) -> Result<&'a ContentItem, Response> {
    match details::resolve_view(snapshot, Some(id), None) {
        DetailsView::Found(item) => Ok(item),
        DetailsView::Loading => Err(loading_response()),
        DetailsView::NotFound { .. } | DetailsView::Navigated(_) => {
            let available = snapshot.catalog.as_deref().map_or(0, Catalog::len);
            Err(not_found_response(id, available))
        }
    }
}

fn loading_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "status": "loading" })),
    )
        .into_response()
}

fn not_found_response(id: &str, available: usize) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "not_found",
            "id": id,
            "available_items": available
        })),
    )
        .into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
