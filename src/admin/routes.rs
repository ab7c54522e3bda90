use crate::admin::handlers;
use axum::{
    routing::{get, post},
    Router,
};

pub fn admin_routes() -> Router {
    Router::new()
        .route("/api/admin/payouts/summary", get(handlers::payout_summary))
        .route("/api/admin/payouts", post(handlers::mark_payout))
}
