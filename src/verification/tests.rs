// Verification flow tests

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;

use super::flow::VerificationService;
use super::models::FlowResult;
use super::registry::VerificationRegistry;
use crate::common::ApiError;
use crate::ledger::models::Platform;
use crate::ledger::store::{FileLedgerStore, LedgerStore};
use crate::services::ownership::{OwnershipVerifier, RoleGateway};

// ============================================================================
// Test doubles
// ============================================================================

/// Answers ownership checks from a scripted sequence, then always fails.
/// Records every code it was asked to check.
struct SequenceVerifier {
    outcomes: Mutex<VecDeque<bool>>,
    checked_codes: Mutex<Vec<String>>,
}

impl SequenceVerifier {
    fn new(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            checked_codes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OwnershipVerifier for SequenceVerifier {
    async fn check(&self, _platform: Platform, _username: &str, code: &str) -> bool {
        self.checked_codes.lock().await.push(code.to_string());
        self.outcomes.lock().await.pop_front().unwrap_or(false)
    }
}

struct CountingGateway {
    grants: AtomicUsize,
}

impl CountingGateway {
    fn new() -> Self {
        Self {
            grants: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RoleGateway for CountingGateway {
    async fn grant_clipper_role(&self, _user_id: i64) -> Result<(), String> {
        self.grants.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn resolve_display_name(&self, _user_id: i64) -> Option<String> {
        None
    }
}

struct Harness {
    _dir: TempDir,
    store: Arc<dyn LedgerStore>,
    registry: VerificationRegistry,
    verifier: Arc<SequenceVerifier>,
    gateway: Arc<CountingGateway>,
    service: VerificationService,
}

async fn harness(outcomes: impl IntoIterator<Item = bool>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn LedgerStore> = Arc::new(
        FileLedgerStore::open(dir.path().join("data.json"))
            .await
            .unwrap(),
    );
    let registry = VerificationRegistry::new();
    let verifier = Arc::new(SequenceVerifier::new(outcomes));
    let gateway = Arc::new(CountingGateway::new());
    let service = VerificationService::new(
        registry.clone(),
        store.clone(),
        verifier.clone(),
        gateway.clone(),
        Duration::minutes(15),
        3,
    );
    Harness {
        _dir: dir,
        store,
        registry,
        verifier,
        gateway,
        service,
    }
}

// ============================================================================
// Flow scenarios
// ============================================================================

#[tokio::test]
async fn test_confirm_succeeds_on_third_attempt() {
    let h = harness([false, false, true]).await;
    h.service.request(42, Platform::Tiktok, "alice").await;

    assert_eq!(
        h.service.confirm(42, 42).await.unwrap(),
        FlowResult::RetryAllowed {
            attempts_remaining: 2
        }
    );
    assert_eq!(
        h.service.confirm(42, 42).await.unwrap(),
        FlowResult::RetryAllowed {
            attempts_remaining: 1
        }
    );
    assert_eq!(h.service.confirm(42, 42).await.unwrap(), FlowResult::Verified);

    // The verified user lands in the store with zeroed totals and the
    // registry entry is gone
    let user = h.store.get_user(42).await.unwrap();
    assert_eq!(user.platform, Platform::Tiktok);
    assert_eq!(user.username, "alice");
    assert_eq!(user.total_views, 0);
    assert_eq!(user.total_earnings, 0.0);
    assert!(h.registry.get(42).await.is_none());
    assert_eq!(h.gateway.grants.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_identity_mismatch_consumes_nothing() {
    let h = harness([true]).await;
    h.service.request(42, Platform::Tiktok, "alice").await;

    let err = h.service.confirm(42, 99).await.unwrap_err();
    assert!(matches!(err, ApiError::IdentityMismatch(_)));

    let err = h.service.cancel(42, 99).await.unwrap_err();
    assert!(matches!(err, ApiError::IdentityMismatch(_)));

    // No attempt consumed, no state change
    let pending = h.registry.get(42).await.unwrap();
    assert_eq!(pending.attempts, 0);
    assert!(h.store.get_user(42).await.is_err());
}

#[tokio::test]
async fn test_max_attempts_exhaustion_removes_entry() {
    let h = harness([false, false, false]).await;
    h.service.request(42, Platform::Youtube, "bob").await;

    assert_eq!(
        h.service.confirm(42, 42).await.unwrap(),
        FlowResult::RetryAllowed {
            attempts_remaining: 2
        }
    );
    assert_eq!(
        h.service.confirm(42, 42).await.unwrap(),
        FlowResult::RetryAllowed {
            attempts_remaining: 1
        }
    );
    assert_eq!(
        h.service.confirm(42, 42).await.unwrap(),
        FlowResult::FailedMaxAttempts
    );

    assert!(h.registry.get(42).await.is_none());
    // A later confirm reports the flow as expired
    assert_eq!(h.service.confirm(42, 42).await.unwrap(), FlowResult::Expired);
    assert_eq!(h.gateway.grants.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancel_is_terminal() {
    let h = harness([true]).await;
    h.service.request(42, Platform::Instagram, "carol").await;

    assert_eq!(h.service.cancel(42, 42).await.unwrap(), FlowResult::Cancelled);
    assert!(h.registry.get(42).await.is_none());

    // Events after a terminal state are idempotent no-ops
    assert_eq!(h.service.cancel(42, 42).await.unwrap(), FlowResult::Expired);
    assert_eq!(h.service.confirm(42, 42).await.unwrap(), FlowResult::Expired);
}

#[tokio::test]
async fn test_confirm_after_sweep_reports_expired() {
    let h = harness([true]).await;
    let pending = h.service.request(42, Platform::Tiktok, "alice").await;

    let removed = h
        .registry
        .sweep(pending.expires_at + Duration::seconds(1))
        .await;
    assert_eq!(removed, 1);

    assert_eq!(h.service.confirm(42, 42).await.unwrap(), FlowResult::Expired);
    assert!(h.store.get_user(42).await.is_err());
}

#[tokio::test]
async fn test_new_request_restarts_flow() {
    let h = harness([false, true]).await;
    let first = h.service.request(42, Platform::Tiktok, "alice").await;

    assert_eq!(
        h.service.confirm(42, 42).await.unwrap(),
        FlowResult::RetryAllowed {
            attempts_remaining: 2
        }
    );

    // Re-requesting overwrites the entry and resets the attempt counter
    let second = h.service.request(42, Platform::Tiktok, "alice").await;
    assert_ne!(first.code, second.code);
    assert_eq!(h.registry.get(42).await.unwrap().attempts, 0);

    assert_eq!(h.service.confirm(42, 42).await.unwrap(), FlowResult::Verified);

    // Each attempt was checked against the code of the issuance it was
    // charged to, not a stale snapshot
    let checked = h.verifier.checked_codes.lock().await.clone();
    assert_eq!(checked, vec![first.code, second.code]);
}

#[tokio::test]
async fn test_reverification_preserves_earnings() {
    let h = harness([true, true]).await;

    h.service.request(42, Platform::Tiktok, "alice").await;
    assert_eq!(h.service.confirm(42, 42).await.unwrap(), FlowResult::Verified);

    let now = Utc::now();
    h.store
        .record_clip(crate::ledger::models::Clip {
            discord_id: 42,
            platform: Platform::Tiktok,
            video_url: "https://www.tiktok.com/@alice/video/1".to_string(),
            views: 250_000,
            earnings: 50.0,
            submitted_at: crate::common::helpers::format_timestamp(now),
        })
        .await
        .unwrap();

    // Verify again on another platform; the second flow's store write must
    // not reset accumulated totals
    h.service.request(42, Platform::Youtube, "alice_yt").await;
    assert_eq!(h.service.confirm(42, 42).await.unwrap(), FlowResult::Verified);

    let user = h.store.get_user(42).await.unwrap();
    assert_eq!(user.platform, Platform::Youtube);
    assert_eq!(user.total_views, 250_000);
    assert_eq!(user.total_earnings, 50.0);
}
