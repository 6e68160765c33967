use super::AppState;
use crate::aggregate;
use crate::prelude::*;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use zotproxy_core::collection::{Collection, CollectionMap};

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/collections", get(list_collections))
        .route("/collections/{id}", get(collection_tree))
        .route("/collections/{id}/collections", get(collection_descendants))
        .route("/collections/{id}/items", get(collection_items))
        .route("/collections/{id}/bib", get(collection_bib))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_collections(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Collection>>> {
    log::info!("GET /collections");
    Ok(Json(state.client.fetch_all_collections().await?))
}

async fn collection_tree(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CollectionMap>> {
    log::info!("GET /collections/{id}");
    Ok(Json(aggregate::collection_tree(&state.client, &id).await?))
}

async fn collection_descendants(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Collection>>> {
    log::info!("GET /collections/{id}/collections");
    Ok(Json(
        aggregate::collection_descendants(&state.client, &id).await?,
    ))
}

async fn collection_items(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<serde_json::Value>>> {
    log::info!("GET /collections/{id}/items");
    Ok(Json(
        aggregate::items_in_collection(&state.client, &id, state.concurrency).await?,
    ))
}

/// Responds with `text/plain`
async fn collection_bib(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    log::info!("GET /collections/{id}/bib");
    aggregate::bib_in_collection(&state.client, &id, state.concurrency).await
}
