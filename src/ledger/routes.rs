use crate::ledger::handlers;
use axum::{
    routing::{get, post},
    Router,
};

pub fn ledger_routes() -> Router {
    Router::new()
        .route("/api/clips", post(handlers::submit_clip))
        .route("/api/users/:user_id", get(handlers::get_user))
}
