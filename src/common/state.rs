// Application state shared across all modules

use std::sync::Arc;

use crate::common::BotConfig;
use crate::ledger::store::LedgerStore;
use crate::services::ownership::RoleGateway;
use crate::verification::flow::VerificationService;

/// Application state containing the ledger store, verification services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
    pub verification: Arc<VerificationService>,
    pub gateway: Arc<dyn RoleGateway>,
    pub config: BotConfig,
}
