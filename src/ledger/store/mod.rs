//! Ledger persistence behind a single storage interface.
//!
//! Two interchangeable backends implement [`LedgerStore`]: a SQL store and a
//! flat-file JSON store. The backend is selected once at startup; callers
//! never branch on which one they got.

pub mod file;
pub mod sqlite;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::common::BotConfig;
use crate::ledger::models::{AggregateRow, Clip, PayoutPeriod, PayoutRecord, Platform, User};

pub use file::FileLedgerStore;
pub use sqlite::SqliteLedgerStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Storage interface for users, clips, payouts, and analytics.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Create or re-verify a user.
    ///
    /// On first creation the accumulated totals start at zero. On
    /// re-verification only platform, username, and the verified-at timestamp
    /// are replaced; accumulated views and earnings are preserved.
    async fn upsert_verified_user(
        &self,
        discord_id: i64,
        platform: Platform,
        username: &str,
    ) -> Result<User, StoreError>;

    /// Append a clip and atomically add its views and earnings to the owning
    /// user's totals. Fails with `NotFound` if the user is not verified; a
    /// clip never creates a user implicitly.
    async fn record_clip(&self, clip: Clip) -> Result<Clip, StoreError>;

    async fn get_user(&self, discord_id: i64) -> Result<User, StoreError>;

    /// Per-user view/earnings totals over the period's window, one row per
    /// user with at least one clip in range. Row order is unspecified.
    async fn payout_summary(&self, period: PayoutPeriod) -> Result<Vec<AggregateRow>, StoreError>;

    /// Append an immutable payout record. Does not touch the user's totals.
    async fn record_payout(&self, discord_id: i64, admin_id: i64)
        -> Result<PayoutRecord, StoreError>;

    /// Append a snapshot of ledger-wide totals.
    async fn generate_analytics(&self) -> Result<(), StoreError>;
}

/// Select and open the ledger backend.
///
/// The SQL backend is used when `DATABASE_URL` is configured and reachable;
/// any failure there degrades to the flat-file store rather than aborting
/// startup.
pub async fn connect(config: &BotConfig) -> anyhow::Result<Arc<dyn LedgerStore>> {
    if let Some(url) = &config.database_url {
        match SqliteLedgerStore::connect(url).await {
            Ok(store) => {
                info!(url = %url, "Ledger store backed by database");
                return Ok(Arc::new(store));
            }
            Err(e) => {
                warn!(
                    url = %url,
                    error = %e,
                    "Database unreachable, falling back to file storage"
                );
            }
        }
    }

    let store = FileLedgerStore::open(&config.data_file).await?;
    info!(path = %config.data_file, "Ledger store backed by flat file");
    Ok(Arc::new(store))
}
