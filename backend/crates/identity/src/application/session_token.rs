//! Signed Session Tokens
//!
//! The session cookie carries `<session_id>.<signature>` where the
//! signature is HMAC-SHA256 over the session id string, base64url-encoded
//! without padding. The server verifies the signature before ever touching
//! the database, so forged or truncated cookies are rejected cheaply.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use kernel::id::SessionId;
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Generate a signed token for a session id
pub fn generate(session_id: SessionId, secret: &[u8]) -> String {
    let session_id = session_id.to_string();

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!("{}.{}", session_id, URL_SAFE_NO_PAD.encode(signature))
}

/// Parse and verify a signed token, returning the session id
///
/// Returns `None` for malformed tokens, bad signatures, or non-UUID ids.
pub fn parse(token: &str, secret: &[u8]) -> Option<SessionId> {
    let (session_id_str, signature_b64) = token.split_once('.')?;

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;
    mac.verify_slice(&signature).ok()?;

    let uuid: Uuid = session_id_str.parse().ok()?;
    Some(SessionId::from_uuid(uuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::Id;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_round_trip() {
        let session_id: SessionId = Id::new();
        let token = generate(session_id, SECRET);
        assert_eq!(parse(&token, SECRET), Some(session_id));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let session_id: SessionId = Id::new();
        let token = generate(session_id, SECRET);
        assert_eq!(parse(&token, b"another-secret-another-secret-xx"), None);
    }

    #[test]
    fn test_tampered_id_rejected() {
        let session_id: SessionId = Id::new();
        let token = generate(session_id, SECRET);

        let other: SessionId = Id::new();
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", other, sig);
        assert_eq!(parse(&forged, SECRET), None);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let session_id: SessionId = Id::new();
        let mut token = generate(session_id, SECRET);
        token.push('x');
        assert_eq!(parse(&token, SECRET), None);
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert_eq!(parse("", SECRET), None);
        assert_eq!(parse("no-dot-here", SECRET), None);
        assert_eq!(parse("not-a-uuid.c2ln", SECRET), None);
        assert_eq!(parse(".", SECRET), None);
    }
}
