//! Identity Crate
//!
//! Phone-based account identity: registration, login, server-side
//! sessions, and role assignments. Layered as domain / application /
//! infra / presentation; the HTTP surface mounts via
//! [`presentation::router::auth_router`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::{CurrentAccount, IdentityConfig};
pub use error::{IdentityError, IdentityResult};
pub use infra::PgIdentityRepository;
pub use presentation::{auth_router, auth_router_generic};
