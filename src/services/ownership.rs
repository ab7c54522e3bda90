// External collaborator seams: the ownership check and the chat gateway
//
// Real social-media verification is out of scope; the stub sleeps to mimic
// API latency and answers randomly, the way the original behaved before an
// API integration existed.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::info;

use crate::ledger::models::Platform;

/// Checks that a user's external profile carries the issued code.
#[async_trait]
pub trait OwnershipVerifier: Send + Sync {
    async fn check(&self, platform: Platform, username: &str, code: &str) -> bool;
}

pub struct StubOwnershipVerifier {
    delay: Duration,
    success_rate: f64,
}

impl StubOwnershipVerifier {
    pub fn new(delay: Duration, success_rate: f64) -> Self {
        Self {
            delay,
            success_rate,
        }
    }
}

impl Default for StubOwnershipVerifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 0.7)
    }
}

#[async_trait]
impl OwnershipVerifier for StubOwnershipVerifier {
    async fn check(&self, _platform: Platform, _username: &str, _code: &str) -> bool {
        tokio::time::sleep(self.delay).await;
        rand::thread_rng().gen_bool(self.success_rate)
    }
}

/// Outbound calls into the chat platform. Both operations are best-effort;
/// a failure never rolls back a ledger write.
#[async_trait]
pub trait RoleGateway: Send + Sync {
    async fn grant_clipper_role(&self, user_id: i64) -> Result<(), String>;

    async fn resolve_display_name(&self, user_id: i64) -> Option<String>;
}

/// Gateway used when no chat platform is wired up; grants are logged only.
pub struct LoggingRoleGateway;

#[async_trait]
impl RoleGateway for LoggingRoleGateway {
    async fn grant_clipper_role(&self, user_id: i64) -> Result<(), String> {
        info!(user_id, "Clipper role granted");
        Ok(())
    }

    async fn resolve_display_name(&self, _user_id: i64) -> Option<String> {
        None
    }
}
