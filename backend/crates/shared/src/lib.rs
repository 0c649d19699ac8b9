//! Shared Kernel - Domain-crossing minimal core
//!
//! The smallest core of vocabulary shared by every backend crate:
//! - Unified error types ([`error::app_error::AppError`]) with stable
//!   machine-readable codes
//! - Typed ID wrappers ([`id::Id`])
//!
//! **Design Principle**: only things that are "hard to change" and mean
//! the same thing in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
