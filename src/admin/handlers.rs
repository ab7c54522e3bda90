// src/admin/handlers.rs

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{MarkPayoutRequest, PayoutSummaryResponse, SummaryParams, TopPerformer};
use crate::common::{ApiError, AppState};
use crate::ledger::export::{export_csv, CsvRow};
use crate::ledger::models::{PayoutPeriod, PayoutRecord};

/// GET /api/admin/payouts/summary - Aggregate payout totals for a period,
/// as JSON or a CSV attachment
pub async fn payout_summary(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<SummaryParams>,
) -> Result<Response, ApiError> {
    let state = state_lock.read().await.clone();

    let period_raw = params.period.unwrap_or_else(|| "all".to_string());
    let period = PayoutPeriod::from_str(&period_raw).map_err(ApiError::BadRequest)?;

    let mut rows = state.store.payout_summary(period).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No payout data for period: {}",
            period.as_str()
        )));
    }

    rows.sort_by(|a, b| {
        b.total_earnings
            .partial_cmp(&a.total_earnings)
            .unwrap_or(Ordering::Equal)
    });

    if params.export.unwrap_or(false) {
        let mut csv_rows = Vec::with_capacity(rows.len());
        for row in &rows {
            let username = state
                .gateway
                .resolve_display_name(row.discord_id)
                .await
                .unwrap_or_else(|| format!("User {}", row.discord_id));
            csv_rows.push(CsvRow {
                discord_id: row.discord_id,
                username,
                total_views: row.total_views,
                total_earnings: row.total_earnings,
            });
        }
        let csv_content = export_csv(&csv_rows);

        info!(
            period = period.as_str(),
            record_count = csv_rows.len(),
            "Payout summary exported"
        );

        let filename = format!("attachment; filename=\"payouts_{}.csv\"", period.as_str());
        return Ok((
            StatusCode::OK,
            [
                ("Content-Type", "text/csv".to_string()),
                ("Content-Disposition", filename),
            ],
            csv_content,
        )
            .into_response());
    }

    let total_earnings: f64 = rows.iter().map(|r| r.total_earnings).sum();

    let mut top_performers = Vec::new();
    for (i, row) in rows.iter().take(5).enumerate() {
        let display_name = state
            .gateway
            .resolve_display_name(row.discord_id)
            .await
            .unwrap_or_else(|| format!("User {}", row.discord_id));
        top_performers.push(TopPerformer {
            rank: i + 1,
            discord_id: row.discord_id,
            display_name,
            total_views: row.total_views,
            total_earnings: row.total_earnings,
        });
    }

    Ok(Json(PayoutSummaryResponse {
        period: period.as_str().to_string(),
        total_earnings,
        top_performers,
        rows,
    })
    .into_response())
}

/// POST /api/admin/payouts - Mark a payout as sent
pub async fn mark_payout(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(req): Json<MarkPayoutRequest>,
) -> Result<Json<PayoutRecord>, ApiError> {
    let state = state_lock.read().await.clone();

    let record = state.store.record_payout(req.user_id, req.admin_id).await?;

    info!(
        user_id = record.discord_id,
        admin_id = record.admin_id,
        "Payout marked as sent"
    );

    Ok(Json(record))
}
