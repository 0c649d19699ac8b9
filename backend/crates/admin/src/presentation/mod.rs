pub mod dto;
pub mod handlers;
pub mod router;

pub use router::{admin_router, partner_router};
