//! Admin Crate
//!
//! Operator-facing surface: platform overview, account directory, role
//! mutation, partner registration, and API key lifecycle, plus the
//! bearer-authenticated partner self-service endpoint.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use error::{AdminError, AdminResult};
pub use infra::PgAdminRepository;
pub use presentation::{admin_router, partner_router};
