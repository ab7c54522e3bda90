// Common module - shared types and utilities across all modules

pub mod config;
pub mod error;
pub mod helpers;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::BotConfig;
pub use error::ApiError;
pub use state::AppState;
pub use validation::{ValidationResult, Validator};
