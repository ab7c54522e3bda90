// SQL backend for the ledger store

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

use super::{LedgerStore, StoreError};
use crate::common::helpers::{format_timestamp, utc_timestamp};
use crate::ledger::models::{AggregateRow, Clip, PayoutPeriod, PayoutRecord, Platform, User};

pub struct SqliteLedgerStore {
    pool: SqlitePool,
}

impl SqliteLedgerStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self { pool };
        store.setup_schema().await?;
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn setup_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                discord_id INTEGER PRIMARY KEY,
                platform TEXT NOT NULL,
                username TEXT NOT NULL,
                verified_at TEXT NOT NULL,
                total_views INTEGER NOT NULL DEFAULT 0,
                total_earnings REAL NOT NULL DEFAULT 0.0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clips (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                discord_id INTEGER NOT NULL,
                platform TEXT NOT NULL,
                video_url TEXT NOT NULL,
                views INTEGER NOT NULL,
                earnings REAL NOT NULL,
                submitted_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                discord_id INTEGER NOT NULL,
                admin_id INTEGER NOT NULL,
                recorded_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analytics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                generated_at TEXT NOT NULL,
                total_users INTEGER NOT NULL,
                total_clips INTEGER NOT NULL,
                total_views INTEGER NOT NULL,
                total_earnings REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_clips_discord_id ON clips(discord_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_clips_submitted_at ON clips(submitted_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl LedgerStore for SqliteLedgerStore {
    async fn upsert_verified_user(
        &self,
        discord_id: i64,
        platform: Platform,
        username: &str,
    ) -> Result<User, StoreError> {
        // Re-verification replaces identity fields only; accumulated totals
        // survive.
        sqlx::query(
            r#"
            INSERT INTO users (discord_id, platform, username, verified_at, total_views, total_earnings)
            VALUES (?, ?, ?, ?, 0, 0.0)
            ON CONFLICT(discord_id) DO UPDATE SET
                platform = excluded.platform,
                username = excluded.username,
                verified_at = excluded.verified_at
            "#,
        )
        .bind(discord_id)
        .bind(platform)
        .bind(username)
        .bind(utc_timestamp())
        .execute(&self.pool)
        .await?;

        self.get_user(discord_id).await
    }

    async fn record_clip(&self, clip: Clip) -> Result<Clip, StoreError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT discord_id FROM users WHERE discord_id = ?")
                .bind(clip.discord_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(StoreError::NotFound(format!(
                "user {} is not verified",
                clip.discord_id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO clips (discord_id, platform, video_url, views, earnings, submitted_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(clip.discord_id)
        .bind(clip.platform)
        .bind(&clip.video_url)
        .bind(clip.views)
        .bind(clip.earnings)
        .bind(&clip.submitted_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET total_views = total_views + ?,
                total_earnings = total_earnings + ?
            WHERE discord_id = ?
            "#,
        )
        .bind(clip.views)
        .bind(clip.earnings)
        .bind(clip.discord_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(clip)
    }

    async fn get_user(&self, discord_id: i64) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT discord_id, platform, username, verified_at, total_views, total_earnings FROM users WHERE discord_id = ?",
        )
        .bind(discord_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("user {} not found", discord_id)))
    }

    async fn payout_summary(&self, period: PayoutPeriod) -> Result<Vec<AggregateRow>, StoreError> {
        let rows = match period.cutoff(Utc::now()) {
            Some(cutoff) => {
                sqlx::query_as::<_, AggregateRow>(
                    r#"
                    SELECT discord_id,
                           SUM(views) AS total_views,
                           SUM(earnings) AS total_earnings,
                           COUNT(*) AS clip_count
                    FROM clips
                    WHERE submitted_at >= ?
                    GROUP BY discord_id
                    "#,
                )
                .bind(format_timestamp(cutoff))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AggregateRow>(
                    r#"
                    SELECT discord_id,
                           SUM(views) AS total_views,
                           SUM(earnings) AS total_earnings,
                           COUNT(*) AS clip_count
                    FROM clips
                    GROUP BY discord_id
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    async fn record_payout(
        &self,
        discord_id: i64,
        admin_id: i64,
    ) -> Result<PayoutRecord, StoreError> {
        let record = PayoutRecord {
            discord_id,
            admin_id,
            recorded_at: utc_timestamp(),
        };

        sqlx::query("INSERT INTO payouts (discord_id, admin_id, recorded_at) VALUES (?, ?, ?)")
            .bind(record.discord_id)
            .bind(record.admin_id)
            .bind(&record.recorded_at)
            .execute(&self.pool)
            .await?;

        Ok(record)
    }

    async fn generate_analytics(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO analytics (generated_at, total_users, total_clips, total_views, total_earnings)
            SELECT ?,
                   (SELECT COUNT(*) FROM users),
                   COUNT(*),
                   COALESCE(SUM(views), 0),
                   COALESCE(SUM(earnings), 0.0)
            FROM clips
            "#,
        )
        .bind(utc_timestamp())
        .execute(&self.pool)
        .await?;

        info!("Analytics snapshot recorded");
        Ok(())
    }
}
