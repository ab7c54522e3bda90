// Verification flow state machine
//
// Each issued code backs one flow: AWAITING_CONFIRMATION until a confirm
// succeeds (VERIFIED), the user cancels (CANCELLED), attempts run out
// (FAILED_MAX_ATTEMPTS), or the sweep expires the entry (EXPIRED). All
// terminal outcomes remove the registry entry; a later event on a missing
// entry reports Expired without side effects.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::models::{FlowResult, PendingVerification};
use super::registry::VerificationRegistry;
use crate::common::ApiError;
use crate::ledger::models::Platform;
use crate::ledger::store::LedgerStore;
use crate::services::ownership::{OwnershipVerifier, RoleGateway};

pub struct VerificationService {
    registry: VerificationRegistry,
    store: Arc<dyn LedgerStore>,
    verifier: Arc<dyn OwnershipVerifier>,
    gateway: Arc<dyn RoleGateway>,
    ttl: Duration,
    max_attempts: u32,
}

impl VerificationService {
    pub fn new(
        registry: VerificationRegistry,
        store: Arc<dyn LedgerStore>,
        verifier: Arc<dyn OwnershipVerifier>,
        gateway: Arc<dyn RoleGateway>,
        ttl: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            registry,
            store,
            verifier,
            gateway,
            ttl,
            max_attempts,
        }
    }

    /// Start (or restart) a verification flow for a user.
    pub async fn request(
        &self,
        user_id: i64,
        platform: Platform,
        username: &str,
    ) -> PendingVerification {
        let pending = self
            .registry
            .issue(user_id, platform, username, self.ttl, Utc::now())
            .await;

        info!(
            user_id,
            platform = %platform,
            username,
            expires_at = %pending.expires_at,
            "Verification code issued"
        );
        pending
    }

    /// Deliver a confirm event to the flow owned by `user_id`.
    pub async fn confirm(&self, user_id: i64, caller_id: i64) -> Result<FlowResult, ApiError> {
        if self.registry.get(user_id).await.is_none() {
            debug!(user_id, "Confirm for unknown or expired verification");
            return Ok(FlowResult::Expired);
        }

        if caller_id != user_id {
            warn!(
                user_id,
                caller_id, "Confirm rejected: caller does not own this verification"
            );
            return Err(ApiError::IdentityMismatch(
                "Only the verifying user can confirm".to_string(),
            ));
        }

        // Increment and snapshot in one step: the attempt is always charged
        // against the same issuance whose code gets checked, even if a new
        // request overwrote the entry after the lookup above.
        let Some(pending) = self.registry.record_attempt(user_id).await else {
            // Swept between lookup and attempt
            return Ok(FlowResult::Expired);
        };
        let attempts = pending.attempts;

        // The ownership check may take a while; nothing is locked across it,
        // other users' flows proceed independently.
        let verified = self
            .verifier
            .check(pending.platform, &pending.username, &pending.code)
            .await;

        if verified {
            // Store write strictly before registry removal: a crash between
            // the two only leaves a re-issuable pending entry behind, never a
            // verified user the ledger forgot.
            self.store
                .upsert_verified_user(user_id, pending.platform, &pending.username)
                .await?;
            self.registry.remove(user_id).await;

            if let Err(e) = self.gateway.grant_clipper_role(user_id).await {
                warn!(user_id, error = %e, "Role grant failed after verification");
            }

            info!(
                user_id,
                platform = %pending.platform,
                username = %pending.username,
                "Account verified"
            );
            Ok(FlowResult::Verified)
        } else if attempts >= self.max_attempts {
            self.registry.remove(user_id).await;
            info!(user_id, attempts, "Verification failed: maximum attempts reached");
            Ok(FlowResult::FailedMaxAttempts)
        } else {
            let attempts_remaining = self.max_attempts - attempts;
            debug!(user_id, attempts, attempts_remaining, "Verification check failed");
            Ok(FlowResult::RetryAllowed { attempts_remaining })
        }
    }

    /// Deliver a cancel event to the flow owned by `user_id`.
    pub async fn cancel(&self, user_id: i64, caller_id: i64) -> Result<FlowResult, ApiError> {
        if self.registry.get(user_id).await.is_none() {
            debug!(user_id, "Cancel for unknown or expired verification");
            return Ok(FlowResult::Expired);
        }

        if caller_id != user_id {
            warn!(
                user_id,
                caller_id, "Cancel rejected: caller does not own this verification"
            );
            return Err(ApiError::IdentityMismatch(
                "Only the verifying user can cancel".to_string(),
            ));
        }

        self.registry.remove(user_id).await;
        info!(user_id, "Verification cancelled");
        Ok(FlowResult::Cancelled)
    }
}
