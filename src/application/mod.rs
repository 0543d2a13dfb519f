//! Application layer: the link creation pipeline.
//!
//! Services consume repository and gate traits and provide a clean API for
//! HTTP handlers.
//!
//! - [`schema`] - Tiered field validation per caller class
//! - [`security_gate::SecurityGate`] - Public-link and reputation checks
//! - [`services::link_service::LinkService`] - Validate, screen and store links
//! - [`services::auth_service::AuthService`] - Owner resolution from API tokens

pub mod schema;
pub mod security_gate;
pub mod services;
