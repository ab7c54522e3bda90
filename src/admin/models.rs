// src/admin/models.rs

use serde::{Deserialize, Serialize};

use crate::ledger::models::AggregateRow;

#[derive(Deserialize)]
pub struct SummaryParams {
    pub period: Option<String>,
    pub export: Option<bool>,
}

#[derive(Serialize)]
pub struct PayoutSummaryResponse {
    pub period: String,
    pub total_earnings: f64,
    pub top_performers: Vec<TopPerformer>,
    pub rows: Vec<AggregateRow>,
}

#[derive(Serialize)]
pub struct TopPerformer {
    pub rank: usize,
    pub discord_id: i64,
    pub display_name: String,
    pub total_views: i64,
    pub total_earnings: f64,
}

#[derive(Deserialize)]
pub struct MarkPayoutRequest {
    pub user_id: i64,
    pub admin_id: i64,
}
