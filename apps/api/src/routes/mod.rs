pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::audit::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Audit API
        .route("/api/v1/audit", post(handlers::handle_audit))
        .route("/api/v1/audit/reconcile", post(handlers::handle_reconcile))
        .route("/api/v1/audit/score", post(handlers::handle_score))
        // Chat API
        .route(
            "/api/v1/chat",
            get(handlers::handle_chat_greeting).post(handlers::handle_chat),
        )
        .with_state(state)
}
