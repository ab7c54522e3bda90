// Services module - external collaborator seams and background tasks

pub mod ownership;
pub mod scheduler;

pub use ownership::{LoggingRoleGateway, OwnershipVerifier, RoleGateway, StubOwnershipVerifier};
