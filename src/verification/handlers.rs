// src/verification/handlers.rs

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{FlowEventRequest, FlowResult, VerifyRequest, VerifyResponse};
use super::validators::VerifyRequestValidator;
use crate::common::{ApiError, AppState, Validator};
use crate::ledger::models::Platform;

/// POST /api/verification - Request a verification code for a social account
pub async fn request_verification(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = VerifyRequestValidator.validate(&req);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let platform = Platform::from_str(&req.platform).map_err(ApiError::ValidationError)?;
    let pending = state
        .verification
        .request(req.user_id, platform, req.username.trim())
        .await;

    Ok(Json(VerifyResponse {
        code: pending.code,
        expires_at: pending.expires_at,
    }))
}

/// POST /api/verification/:user_id/confirm - Confirm the pending verification
pub async fn confirm_verification(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(user_id): Path<i64>,
    Json(event): Json<FlowEventRequest>,
) -> Result<Json<FlowResult>, ApiError> {
    let state = state_lock.read().await.clone();
    let result = state.verification.confirm(user_id, event.caller_id).await?;
    Ok(Json(result))
}

/// POST /api/verification/:user_id/cancel - Cancel the pending verification
pub async fn cancel_verification(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(user_id): Path<i64>,
    Json(event): Json<FlowEventRequest>,
) -> Result<Json<FlowResult>, ApiError> {
    let state = state_lock.read().await.clone();
    let result = state.verification.cancel(user_id, event.caller_id).await?;
    Ok(Json(result))
}
