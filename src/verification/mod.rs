// Verification module - code issuance, expiry, and the confirm/cancel flow

pub mod flow;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::verification_routes;
