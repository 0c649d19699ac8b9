pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use middleware::{GuardState, require_roles, require_session};
pub use router::{auth_router, auth_router_generic};
