use anyhow::Result;
use axum::{
    extract::{Path as UrlPath, Query, State},
    routing::get,
    Json, Router,
};
use gramdex_core::persist::{self, IndexPaths};
use gramdex_core::{DocId, QueryEngine};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    /// Missing or empty query is a soft miss, not an error.
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize {
    20
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: i64,
    pub url: Option<String>,
}

/// Read-only after startup; queries share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueryEngine>,
    pub urls: Arc<BTreeMap<DocId, String>>,
}

pub fn build_app(index_dir: String, bookkeeping: String) -> Result<Router> {
    // Load the persisted index and the corpus URL map at startup; either
    // one missing means retrieval cannot proceed.
    let paths = IndexPaths::new(&index_dir);
    let engine = QueryEngine::open(&paths.index())?;
    let urls = persist::load_bookkeeping(Path::new(&bookkeeping))?;
    if let Ok(meta) = persist::load_meta(&paths) {
        tracing::info!(total_docs = meta.total_docs, created_at = %meta.created_at, "index loaded");
    }
    let app_state = AppState { engine: Arc::new(engine), urls: Arc::new(urls) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
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
        .route("/doc/:folder/:file", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let start = std::time::Instant::now();

    let terms: Vec<String> = params.q.to_lowercase().split_whitespace().map(String::from).collect();
    let matches = state.engine.search(&terms);
    let total_hits = matches.len();

    let k = params.k.clamp(1, 100);
    let results: Vec<SearchHit> = matches
        .into_iter()
        .take(k)
        .map(|m| {
            let url = state.urls.get(&m.doc_id).cloned();
            SearchHit { doc_id: m.doc_id, score: m.score, url }
        })
        .collect();

    let took_s = start.elapsed().as_secs_f64();
    Json(SearchResponse { query: params.q, took_s, total_hits, results })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    UrlPath((folder, file)): UrlPath<(String, String)>,
) -> Json<serde_json::Value> {
    let doc_id = format!("{folder}/{file}");
    match state.urls.get(&doc_id) {
        Some(url) => Json(serde_json::json!({
            "doc_id": doc_id,
            "url": url,
            "anchor_words": state.engine.anchor_words(&doc_id).unwrap_or(&[]),
        })),
        None => Json(serde_json::json!({ "error": "not found" })),
    }
}
