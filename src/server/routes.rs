//! Axum route handlers.
//!
//! The transport is deliberately thin: it resolves the session context,
//! hands the message to the engine, and serializes the reply. All dialogue
//! behavior lives in [`crate::dialogue::engine`].

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::dialogue::context::SessionStore;
use crate::dialogue::engine::Engine;
use crate::dialogue::reply::Reply;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// One conversation turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation identifier; turns sharing it share context.
    pub session_id: String,
    /// The user's message text.
    pub message: String,
}

/// External "view product" action from the product detail page.
#[derive(Debug, Deserialize)]
pub struct ActiveProductRequest {
    pub session_id: String,
    pub product_id: u32,
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/active-product", post(active_product_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "outfitter",
    }))
}

/// POST /chat — process one message in its session's context.
async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<Reply> {
    let handle = state.sessions.context(&request.session_id);
    let mut ctx = handle.lock();
    Json(state.engine.reply(&mut ctx, &request.message))
}

/// POST /active-product — focus follow-up questions on a product.
async fn active_product_handler(
    State(state): State<AppState>,
    Json(request): Json<ActiveProductRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(product) = state.engine.catalog().by_id(request.product_id) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": format!("unknown product id {}", request.product_id),
            })),
        ));
    };

    let handle = state.sessions.context(&request.session_id);
    handle.lock().set_active_product(product.id, &product.name);
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
