//! Axum HTTP routes for the storage boundary.

use crate::error::ServerError;
use crate::shard::ShardCatalog;
use crate::store::StorageGateway;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

/// Shared application state
pub struct AppState {
    pub gateway: Mutex<StorageGateway>,
}

// ─── Route builder ───────────────────────────────────────────────

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/words", get(get_words).post(post_words))
        .route("/documents", post(post_document))
        .route("/documents/by-ids", get(documents_by_ids))
        .route("/documents/by-word-ids", get(documents_by_word_ids))
        .route("/occurrences", post(post_occurrences))
        .route("/schema", post(recreate_schema).delete(drop_schema))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─── Handlers ────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "wordshard",
    }))
}

/// Full word dictionary: text -> id
async fn get_words(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let mut gateway = state.gateway.lock().await;
    let words = gateway.all_words()?;
    Ok(Json(words))
}

/// Persist a batch of new words (body: text -> id)
async fn post_words(
    State(state): State<Arc<AppState>>,
    Json(words): Json<HashMap<String, i32>>,
) -> Result<impl IntoResponse, ServerError> {
    let mut gateway = state.gateway.lock().await;
    gateway.insert_words(&words)?;
    Ok(Json(serde_json::json!({ "inserted": words.len() })))
}

#[derive(serde::Deserialize)]
struct DocumentParams {
    id: i32,
    location: String,
}

/// Persist one document
async fn post_document(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DocumentParams>,
) -> Result<impl IntoResponse, ServerError> {
    let mut gateway = state.gateway.lock().await;
    gateway.insert_document(params.id, &params.location)?;
    Ok(Json(serde_json::json!({ "id": params.id })))
}

#[derive(serde::Deserialize)]
struct IdsParams {
    /// Comma-separated document ids
    ids: String,
}

/// Resolve document ids to location strings
async fn documents_by_ids(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdsParams>,
) -> Result<impl IntoResponse, ServerError> {
    let ids = parse_id_list("ids", &params.ids)?;
    let mut gateway = state.gateway.lock().await;
    let locations: Vec<String> = gateway
        .document_locations(&ids)?
        .into_iter()
        .map(|(_, location)| location)
        .collect();
    Ok(Json(locations))
}

#[derive(serde::Deserialize)]
struct WordIdsParams {
    /// Comma-separated word ids
    #[serde(rename = "wordIds")]
    word_ids: String,
}

/// Rank documents by match count for the given word ids
async fn documents_by_word_ids(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WordIdsParams>,
) -> Result<impl IntoResponse, ServerError> {
    let word_ids = parse_id_list("wordIds", &params.word_ids)?;
    let mut gateway = state.gateway.lock().await;
    let ranked: Vec<serde_json::Value> = gateway
        .rank_documents(&word_ids)?
        .into_iter()
        .map(|(doc_id, matches)| serde_json::json!({ "docId": doc_id, "matches": matches }))
        .collect();
    Ok(Json(ranked))
}

#[derive(serde::Deserialize)]
struct OccurrenceParams {
    #[serde(rename = "docId")]
    doc_id: i32,
}

/// Persist all occurrence edges for one document (body: array of word ids)
async fn post_occurrences(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OccurrenceParams>,
    Json(word_ids): Json<HashSet<i32>>,
) -> Result<impl IntoResponse, ServerError> {
    let mut gateway = state.gateway.lock().await;
    gateway.insert_occurrences(params.doc_id, &word_ids)?;
    Ok(Json(serde_json::json!({ "inserted": word_ids.len() })))
}

async fn recreate_schema(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let mut gateway = state.gateway.lock().await;
    gateway.recreate_schema()?;
    Ok(Json(serde_json::json!({ "status": "recreated" })))
}

async fn drop_schema(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let mut gateway = state.gateway.lock().await;
    gateway.reset_schema()?;
    Ok(Json(serde_json::json!({ "status": "dropped" })))
}

/// Parse a comma-separated id list
fn parse_id_list(name: &str, raw: &str) -> Result<Vec<i32>, ServerError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>()
                .map_err(|e| ServerError::InvalidParameter {
                    name: name.to_string(),
                    reason: format!("'{}': {}", part, e),
                })
        })
        .collect()
}

// ─── Server startup ──────────────────────────────────────────────

/// Start the storage facade
pub async fn serve(catalog: ShardCatalog, bind: &str, port: u16) -> Result<(), ServerError> {
    let state = Arc::new(AppState {
        gateway: Mutex::new(StorageGateway::new(catalog)),
    });

    let router = build_router(state);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| ServerError::Other(format!("Invalid bind address: {}", e)))?;

    eprintln!("wordshard storage facade listening on http://{}", addr);
    eprintln!("API endpoints:");
    eprintln!("  GET    /health");
    eprintln!("  GET    /words");
    eprintln!("  POST   /words");
    eprintln!("  POST   /documents?id=&location=");
    eprintln!("  GET    /documents/by-ids?ids=1,2");
    eprintln!("  GET    /documents/by-word-ids?wordIds=1,2");
    eprintln!("  POST   /occurrences?docId=");
    eprintln!("  POST   /schema");
    eprintln!("  DELETE /schema");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Io)?;

    eprintln!("\nServer shut down.");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C handler");
    eprintln!("\nShutting down gracefully...");
}
