// src/ledger/models.rs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Platform
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Platform {
    Tiktok,
    Instagram,
    Youtube,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" => Ok(Platform::Instagram),
            "youtube" => Ok(Platform::Youtube),
            other => Err(format!("invalid platform: {}", other)),
        }
    }
}

// ============================================================================
// Ledger Records
// ============================================================================

/// A verified clipper. Created on first successful verification, never deleted.
/// Totals are lifetime accumulators; payouts never reset them.
#[derive(FromRow, Serialize, Deserialize, Clone, Debug)]
pub struct User {
    pub discord_id: i64,
    pub platform: Platform,
    pub username: String,
    pub verified_at: String,
    pub total_views: i64,
    pub total_earnings: f64,
}

/// An accepted clip submission. Immutable once stored.
#[derive(FromRow, Serialize, Deserialize, Clone, Debug)]
pub struct Clip {
    pub discord_id: i64,
    pub platform: Platform,
    pub video_url: String,
    pub views: i64,
    pub earnings: f64,
    pub submitted_at: String,
}

/// Record of an admin marking a payout as sent. Informational only.
#[derive(FromRow, Serialize, Deserialize, Clone, Debug)]
pub struct PayoutRecord {
    pub discord_id: i64,
    pub admin_id: i64,
    pub recorded_at: String,
}

/// Periodic snapshot of ledger-wide totals.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AnalyticsSnapshot {
    pub generated_at: String,
    pub total_users: i64,
    pub total_clips: i64,
    pub total_views: i64,
    pub total_earnings: f64,
}

/// Per-user summed totals over a summary window.
#[derive(FromRow, Serialize, Clone, Debug)]
pub struct AggregateRow {
    pub discord_id: i64,
    pub total_views: i64,
    pub total_earnings: f64,
    pub clip_count: i64,
}

// ============================================================================
// Payout Period
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutPeriod {
    All,
    Week,
    Month,
}

impl PayoutPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutPeriod::All => "all",
            PayoutPeriod::Week => "week",
            PayoutPeriod::Month => "month",
        }
    }

    /// Earliest `submitted_at` that falls inside the window, or None for `all`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            PayoutPeriod::All => None,
            PayoutPeriod::Week => Some(now - Duration::days(7)),
            PayoutPeriod::Month => Some(now - Duration::days(30)),
        }
    }
}

impl FromStr for PayoutPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(PayoutPeriod::All),
            "week" => Ok(PayoutPeriod::Week),
            "month" => Ok(PayoutPeriod::Month),
            other => Err(format!("invalid period: {}", other)),
        }
    }
}

// ============================================================================
// Request Models
// ============================================================================

#[derive(Deserialize)]
pub struct SubmitClipRequest {
    pub user_id: i64,
    pub platform: String,
    pub video_url: String,
    pub views: i64,
}
