// src/verification/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::models::Platform;

// ============================================================================
// Pending Verification
// ============================================================================

/// One outstanding verification attempt. At most one exists per user; a new
/// request for the same user overwrites the old entry.
#[derive(Debug, Clone, Serialize)]
pub struct PendingVerification {
    pub code: String,
    pub platform: Platform,
    pub username: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
}

// ============================================================================
// Flow Results
// ============================================================================

/// Outcome of a confirm or cancel event delivered to a verification flow.
///
/// Exhausted attempts and expiry are expected outcomes, not errors; only an
/// identity mismatch is reported as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FlowResult {
    Verified,
    RetryAllowed { attempts_remaining: u32 },
    FailedMaxAttempts,
    Cancelled,
    Expired,
}

// ============================================================================
// Request / Response Models
// ============================================================================

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub user_id: i64,
    pub platform: String,
    pub username: String,
}

#[derive(Deserialize)]
pub struct FlowEventRequest {
    pub caller_id: i64,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}
