use crate::verification::handlers;
use axum::{routing::post, Router};

pub fn verification_routes() -> Router {
    Router::new()
        .route("/api/verification", post(handlers::request_verification))
        .route(
            "/api/verification/:user_id/confirm",
            post(handlers::confirm_verification),
        )
        .route(
            "/api/verification/:user_id/cancel",
            post(handlers::cancel_verification),
        )
}
