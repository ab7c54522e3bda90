// In-memory registry of pending verification attempts
//
// Keyed by user id with last-write-wins overwrite semantics: re-requesting
// verification restarts the flow, it is not a race to prevent. The clock is
// passed in explicitly so expiry is testable.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::PendingVerification;
use crate::ledger::models::Platform;

#[derive(Clone)]
pub struct VerificationRegistry {
    pending: Arc<RwLock<HashMap<i64, PendingVerification>>>,
}

impl VerificationRegistry {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Issue a fresh code for a user, overwriting any pending entry.
    ///
    /// Codes are unique per issuance event only; with 26^6 * 10^5 possible
    /// codes there is no cross-check against outstanding ones.
    pub async fn issue(
        &self,
        user_id: i64,
        platform: Platform,
        username: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> PendingVerification {
        let entry = PendingVerification {
            code: generate_code(),
            platform,
            username: username.to_string(),
            expires_at: now + ttl,
            attempts: 0,
        };
        self.pending.write().await.insert(user_id, entry.clone());
        entry
    }

    pub async fn get(&self, user_id: i64) -> Option<PendingVerification> {
        self.pending.read().await.get(&user_id).cloned()
    }

    /// Idempotent delete.
    pub async fn remove(&self, user_id: i64) {
        self.pending.write().await.remove(&user_id);
    }

    /// Increment the attempt counter and return the updated entry, so the
    /// caller checks the code the attempt was charged against even if a
    /// re-issue overwrote the entry since its last lookup. None if the entry
    /// disappeared (expired or already terminal).
    pub async fn record_attempt(&self, user_id: i64) -> Option<PendingVerification> {
        let mut pending = self.pending.write().await;
        let entry = pending.get_mut(&user_id)?;
        entry.attempts += 1;
        Some(entry.clone())
    }

    /// Drop every entry that expired strictly before `now`. Returns the
    /// number removed, for logging.
    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut pending = self.pending.write().await;
        let before = pending.len();
        pending.retain(|_, entry| entry.expires_at >= now);
        before - pending.len()
    }

    pub async fn len(&self) -> usize {
        self.pending.read().await.len()
    }
}

impl Default for VerificationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Verification code format: 6 uppercase letters, a dash, 5 digits.
fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    let letters: String = (0..6).map(|_| rng.gen_range(b'A'..=b'Z') as char).collect();
    let digits: String = (0..5).map(|_| rng.gen_range(0..=9u8).to_string()).collect();
    format!("{}-{}", letters, digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_code_format() {
        let re = Regex::new(r"^[A-Z]{6}-[0-9]{5}$").unwrap();
        for _ in 0..100 {
            let code = generate_code();
            assert!(re.is_match(&code), "bad code: {}", code);
        }
    }

    #[tokio::test]
    async fn test_issue_overwrites_existing_entry() {
        let registry = VerificationRegistry::new();
        let now = Utc::now();

        let first = registry
            .issue(42, Platform::Tiktok, "alice", Duration::minutes(15), now)
            .await;
        let second = registry
            .issue(42, Platform::Youtube, "alice2", Duration::minutes(15), now)
            .await;

        assert_eq!(registry.len().await, 1);
        let current = registry.get(42).await.unwrap();
        assert_eq!(current.code, second.code);
        assert_ne!(current.code, first.code);
        assert_eq!(current.platform, Platform::Youtube);
        assert_eq!(current.attempts, 0);
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let registry = VerificationRegistry::new();
        let now = Utc::now();

        registry
            .issue(1, Platform::Tiktok, "a", Duration::minutes(10), now)
            .await;
        registry
            .issue(2, Platform::Instagram, "b", Duration::minutes(20), now)
            .await;

        let later = now + Duration::minutes(15);
        assert_eq!(registry.sweep(later).await, 1);
        assert_eq!(registry.sweep(later).await, 0);
        assert!(registry.get(1).await.is_none());
        assert!(registry.get(2).await.is_some());
    }

    #[tokio::test]
    async fn test_sweep_keeps_entry_expiring_exactly_now() {
        let registry = VerificationRegistry::new();
        let now = Utc::now();

        registry
            .issue(1, Platform::Tiktok, "a", Duration::minutes(10), now)
            .await;

        // Removal requires expires_at strictly before now
        assert_eq!(registry.sweep(now + Duration::minutes(10)).await, 0);
        assert_eq!(registry.sweep(now + Duration::minutes(10) + Duration::seconds(1)).await, 1);
    }

    #[tokio::test]
    async fn test_record_attempt_counts_and_respects_removal() {
        let registry = VerificationRegistry::new();
        let now = Utc::now();

        registry
            .issue(7, Platform::Youtube, "carol", Duration::minutes(5), now)
            .await;

        assert_eq!(registry.record_attempt(7).await.unwrap().attempts, 1);
        assert_eq!(registry.record_attempt(7).await.unwrap().attempts, 2);

        registry.remove(7).await;
        assert!(registry.record_attempt(7).await.is_none());

        // remove is idempotent
        registry.remove(7).await;
    }

    #[tokio::test]
    async fn test_record_attempt_returns_current_issuance() {
        let registry = VerificationRegistry::new();
        let now = Utc::now();

        let first = registry
            .issue(7, Platform::Youtube, "carol", Duration::minutes(5), now)
            .await;
        assert_eq!(registry.record_attempt(7).await.unwrap().code, first.code);

        // A re-issue between lookup and attempt charges the new entry, and
        // the returned snapshot carries the new code
        let second = registry
            .issue(7, Platform::Tiktok, "carol2", Duration::minutes(5), now)
            .await;
        let entry = registry.record_attempt(7).await.unwrap();
        assert_eq!(entry.code, second.code);
        assert_eq!(entry.username, "carol2");
        assert_eq!(entry.attempts, 1);
    }
}
