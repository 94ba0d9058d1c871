use anyhow::Result;
use axum::{extract::{Query, State}, routing::get, Json, Router};
use search_core::{EngineConfig, FileIndexSource, QueryEngine, SearchOutcome};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Path of the page issuing the query; decides how result links are prefixed.
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub state: &'static str,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueryEngine>,
}

pub async fn build_app(site_dir: impl Into<PathBuf>) -> Result<Router> {
    let site_root: PathBuf = site_dir.into();
    // Load the index at startup; a failed load still serves the site.
    let engine = Arc::new(QueryEngine::new(EngineConfig::default()));
    let state = engine.load(&FileIndexSource::new(&site_root)).await;
    tracing::info!(site = %site_root.display(), ?state, "search engine initialised");
    let app_state = AppState { engine };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .fallback_service(ServeDir::new(&site_root))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    // Links are made relative to the requesting page; the index itself is shared.
    let config = params.page.as_deref().map(EngineConfig::for_page).unwrap_or_default();

    let (label, results): (&'static str, Vec<SearchHit>) = match state.engine.search(&params.q) {
        SearchOutcome::Placeholder => ("placeholder", vec![]),
        SearchOutcome::NotLoaded => ("loading", vec![]),
        SearchOutcome::Matches(hits) if hits.is_empty() => ("no_results", vec![]),
        SearchOutcome::Matches(hits) => (
            "results",
            hits.into_iter()
                .map(|r| SearchHit {
                    href: config.link_for(r),
                    title: r.title.clone(),
                    excerpt: r.excerpt.clone(),
                    tags: r.tags.clone(),
                })
                .collect(),
        ),
    };

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, state: label, took_s: elapsed.as_secs_f64(), total_hits: results.len(), results })
}
