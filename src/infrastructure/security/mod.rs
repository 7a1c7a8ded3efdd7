// src/infrastructure/security/mod.rs
pub mod claims;
pub mod redis_session_store;
pub mod session_store;
pub mod token;

use sha2::{Digest, Sha256};

/// Session tokens are never stored verbatim; stores key on their SHA-256.
pub(crate) fn session_key(session_token: &str) -> String {
    let digest = Sha256::digest(session_token.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
