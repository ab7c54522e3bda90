// Background housekeeping tasks

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::ledger::store::LedgerStore;
use crate::verification::registry::VerificationRegistry;

/// Periodically drop expired verification codes from the registry.
pub fn start_sweep_task(registry: VerificationRegistry, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let removed = registry.sweep(Utc::now()).await;
            if removed > 0 {
                info!(removed, "Cleaned up expired verification codes");
            }
        }
    });
}

/// Periodically record an analytics snapshot of ledger totals.
pub fn start_analytics_task(store: Arc<dyn LedgerStore>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = store.generate_analytics().await {
                error!(error = %e, "Analytics generation failed");
            }
        }
    });
}
