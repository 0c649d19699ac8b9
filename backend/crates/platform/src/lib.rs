//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the postaHUB backend:
//! - Cryptographic utilities (SHA-256, random tokens, Base64)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie management
//! - Client identification (IP / User-Agent) for audit logging

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
