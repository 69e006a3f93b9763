use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::core::models::{Category, Item};
use crate::core::registry::{Registry, RegistryError};
use crate::infra::covers::{CoverError, CoverFetcher};
use crate::infra::json_store::JsonFileStore;

// ── App state ────────────────────────────────────────────────

/// Combined state passed to handlers via the axum State extractor.
#[derive(Clone)]
struct AppState {
    registry: Arc<Mutex<Registry<JsonFileStore>>>,
    covers: Arc<CoverFetcher>,
}

// ── Server bootstrap ─────────────────────────────────────────

/// Build the cover fetcher. Must be called **outside** an async context
/// because reqwest::blocking::Client spawns its own Tokio runtime internally.
pub fn build_cover_fetcher() -> CoverFetcher {
    CoverFetcher::new()
}

pub async fn start_server(registry: Registry<JsonFileStore>, port: u16, covers: CoverFetcher) {
    let state = AppState {
        registry: Arc::new(Mutex::new(registry)),
        covers: Arc::new(covers),
    };

    let api = Router::new()
        .route(
            "/api/items",
            get(list_items)
                .post(create_item)
                .put(update_item)
                .delete(delete_item),
        )
        .route("/api/search", get(search_items))
        .route("/api/stats", get(get_stats))
        .route("/api/cover", get(get_cover))
        .with_state(state);

    // CORS for development (frontend dev server on another port).
    let app = api
        .fallback(landing_page)
        .layer(tower_http::cors::CorsLayer::permissive());

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    info!(%addr, "trove API listening");
    println!("trove — personal media catalog");
    println!("  API: http://localhost:{port}/api/items");

    axum::serve(listener, app).await.unwrap();
}

fn registry_error(err: RegistryError) -> Response {
    let status = match &err {
        RegistryError::ItemNotFound { .. } => StatusCode::NOT_FOUND,
        RegistryError::CategoryMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string()).into_response()
}

// ── GET /api/items[?category=] ───────────────────────────────

#[derive(Deserialize)]
struct ListQuery {
    category: Option<Category>,
}

async fn list_items(State(state): State<AppState>, Query(params): Query<ListQuery>) -> Response {
    let registry = state.registry.lock().await;
    match params.category {
        Some(category) => Json(registry.items(category)).into_response(),
        None => Json(registry.library()).into_response(),
    }
}

// ── POST /api/items ──────────────────────────────────────────

/// Items have no stable identifier, so mutation payloads carry the full
/// item(s); remove/update match by structural equality.
#[derive(Deserialize)]
struct ItemPayload {
    category: Category,
    item: Item,
}

async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemPayload>,
) -> Response {
    let mut registry = state.registry.lock().await;
    let item = payload.item.clone();
    match registry.add(payload.category, payload.item) {
        Ok(()) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => registry_error(e),
    }
}

// ── PUT /api/items ───────────────────────────────────────────

#[derive(Deserialize)]
struct UpdatePayload {
    category: Category,
    old: Item,
    new: Item,
}

async fn update_item(
    State(state): State<AppState>,
    Json(payload): Json<UpdatePayload>,
) -> Response {
    let mut registry = state.registry.lock().await;
    let new = payload.new.clone();
    match registry.update(payload.category, &payload.old, payload.new) {
        Ok(()) => Json(new).into_response(),
        Err(e) => registry_error(e),
    }
}

// ── DELETE /api/items ────────────────────────────────────────

async fn delete_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemPayload>,
) -> Response {
    let mut registry = state.registry.lock().await;
    match registry.remove(payload.category, &payload.item) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => registry_error(e),
    }
}

// ── GET /api/search?q=... ────────────────────────────────────

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn search_items(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    // An empty term matches everything; that is the search contract.
    let term = params.q.unwrap_or_default();
    let registry = state.registry.lock().await;
    Json(registry.search(&term)).into_response()
}

// ── GET /api/stats ───────────────────────────────────────────

async fn get_stats(State(state): State<AppState>) -> Response {
    let registry = state.registry.lock().await;
    Json(registry.stats()).into_response()
}

// ── GET /api/cover?url=... ───────────────────────────────────

#[derive(Deserialize)]
struct CoverQuery {
    url: Option<String>,
}

async fn get_cover(State(state): State<AppState>, Query(params): Query<CoverQuery>) -> Response {
    let Some(url) = params.url.filter(|u| !u.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing 'url' parameter").into_response();
    };

    // The fetcher is blocking; run it on a dedicated thread so it never
    // stalls the async runtime (or a user interface sitting on top of it).
    let covers = Arc::clone(&state.covers);
    let result = tokio::task::spawn_blocking(move || covers.fetch(&url)).await;

    match result {
        Ok(Ok(cover)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, cover.content_type)],
            cover.bytes,
        )
            .into_response(),
        Ok(Err(e @ CoverError::NotAnImage(_))) => {
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string()).into_response()
        }
        Ok(Err(e)) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

// ── Fallback page ────────────────────────────────────────────

async fn landing_page() -> Response {
    Html(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>trove</title></head>
<body style="font-family:system-ui;background:#0f1117;color:#e5e7eb;display:flex;align-items:center;justify-content:center;height:100vh;margin:0">
<div style="text-align:center">
<h1>trove</h1>
<p>Personal media catalog — movies, games, books.</p>
<p style="color:#6b7280">API is available at <code>/api/items</code></p>
</div>
</body></html>"#,
    )
    .into_response()
}
