// Ledger module - users, clips, payouts, and the dual-backend store

pub mod earnings;
pub mod export;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod validators;


pub use routes::ledger_routes;
