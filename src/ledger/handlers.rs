// src/ledger/handlers.rs

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::earnings::earnings;
use super::models::{Clip, Platform, SubmitClipRequest, User};
use super::validators::ClipValidator;
use crate::common::helpers::utc_timestamp;
use crate::common::{ApiError, AppState, Validator};

/// POST /api/clips - Submit a clip for view tracking
pub async fn submit_clip(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(req): Json<SubmitClipRequest>,
) -> Result<Json<Clip>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = ClipValidator.validate(&req);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let platform = Platform::from_str(&req.platform).map_err(ApiError::ValidationError)?;
    let clip = Clip {
        discord_id: req.user_id,
        platform,
        video_url: req.video_url,
        views: req.views,
        earnings: earnings(req.views, state.config.payout_rate),
        submitted_at: utc_timestamp(),
    };

    let clip = state.store.record_clip(clip).await?;

    info!(
        user_id = clip.discord_id,
        platform = %clip.platform,
        views = clip.views,
        earnings = clip.earnings,
        "Clip recorded"
    );

    Ok(Json(clip))
}

/// GET /api/users/:user_id - Fetch a verified user and their totals
pub async fn get_user(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();
    let user = state.store.get_user(user_id).await?;
    Ok(Json(user))
}
