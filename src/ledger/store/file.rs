// Flat-file backend for the ledger store
//
// The whole ledger lives in one JSON document with four top-level
// collections, rewritten on every mutating operation. Writes go to a temp
// file in the same directory and are renamed into place, so a failed write
// never leaves a torn document on disk.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::{LedgerStore, StoreError};
use crate::common::helpers::{format_timestamp, utc_timestamp};
use crate::ledger::models::{
    AggregateRow, AnalyticsSnapshot, Clip, PayoutPeriod, PayoutRecord, Platform, User,
};

#[derive(Default, Clone, Serialize, Deserialize)]
struct LedgerDocument {
    users: HashMap<String, User>,
    clips: Vec<Clip>,
    payouts: Vec<PayoutRecord>,
    analytics: Vec<AnalyticsSnapshot>,
}

pub struct FileLedgerStore {
    path: PathBuf,
    doc: RwLock<LedgerDocument>,
}

impl FileLedgerStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let doc = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Persistence(format!("corrupt ledger file: {}", e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LedgerDocument::default(),
            Err(e) => return Err(StoreError::Persistence(e.to_string())),
        };
        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    async fn persist(&self, doc: &LedgerDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(|e| StoreError::Persistence(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for FileLedgerStore {
    async fn upsert_verified_user(
        &self,
        discord_id: i64,
        platform: Platform,
        username: &str,
    ) -> Result<User, StoreError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let key = discord_id.to_string();
        let user = match next.users.get_mut(&key) {
            // Re-verification: identity fields only, totals preserved
            Some(existing) => {
                existing.platform = platform;
                existing.username = username.to_string();
                existing.verified_at = utc_timestamp();
                existing.clone()
            }
            None => {
                let user = User {
                    discord_id,
                    platform,
                    username: username.to_string(),
                    verified_at: utc_timestamp(),
                    total_views: 0,
                    total_earnings: 0.0,
                };
                next.users.insert(key, user.clone());
                user
            }
        };

        self.persist(&next).await?;
        *doc = next;
        Ok(user)
    }

    async fn record_clip(&self, clip: Clip) -> Result<Clip, StoreError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let key = clip.discord_id.to_string();
        let user = next.users.get_mut(&key).ok_or_else(|| {
            StoreError::NotFound(format!("user {} is not verified", clip.discord_id))
        })?;
        user.total_views += clip.views;
        user.total_earnings += clip.earnings;
        next.clips.push(clip.clone());

        self.persist(&next).await?;
        *doc = next;
        Ok(clip)
    }

    async fn get_user(&self, discord_id: i64) -> Result<User, StoreError> {
        self.doc
            .read()
            .await
            .users
            .get(&discord_id.to_string())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {} not found", discord_id)))
    }

    async fn payout_summary(&self, period: PayoutPeriod) -> Result<Vec<AggregateRow>, StoreError> {
        let cutoff = period.cutoff(Utc::now()).map(format_timestamp);
        let doc = self.doc.read().await;

        let mut rows: BTreeMap<i64, AggregateRow> = BTreeMap::new();
        for clip in &doc.clips {
            if let Some(cutoff) = &cutoff {
                if clip.submitted_at.as_str() < cutoff.as_str() {
                    continue;
                }
            }
            let row = rows.entry(clip.discord_id).or_insert(AggregateRow {
                discord_id: clip.discord_id,
                total_views: 0,
                total_earnings: 0.0,
                clip_count: 0,
            });
            row.total_views += clip.views;
            row.total_earnings += clip.earnings;
            row.clip_count += 1;
        }

        Ok(rows.into_values().collect())
    }

    async fn record_payout(
        &self,
        discord_id: i64,
        admin_id: i64,
    ) -> Result<PayoutRecord, StoreError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let record = PayoutRecord {
            discord_id,
            admin_id,
            recorded_at: utc_timestamp(),
        };
        next.payouts.push(record.clone());

        self.persist(&next).await?;
        *doc = next;
        Ok(record)
    }

    async fn generate_analytics(&self) -> Result<(), StoreError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let snapshot = AnalyticsSnapshot {
            generated_at: utc_timestamp(),
            total_users: next.users.len() as i64,
            total_clips: next.clips.len() as i64,
            total_views: next.clips.iter().map(|c| c.views).sum(),
            total_earnings: next.clips.iter().map(|c| c.earnings).sum(),
        };
        next.analytics.push(snapshot);

        self.persist(&next).await?;
        *doc = next;
        Ok(())
    }
}
