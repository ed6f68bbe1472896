//! Subject identity resolution.
//!
//! User identifiers are never stored or transmitted raw: an explicit id is
//! reduced to a SHA-256 hex digest at resolution time, and unidentified
//! sessions get a digest of a freshly generated random string. Either way
//! the resolved identity is a fixed-length, one-way token.

use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::info;

/// Length of the random string generated for anonymous sessions.
pub const ANONYMOUS_ID_LENGTH: usize = 10;

/// Hash a user identifier into the subject id carried by envelopes.
///
/// SHA-256 over the UTF-8 bytes, rendered as 64 lowercase hex characters.
#[must_use]
pub fn hash_user_id(user_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    let hashed = hex::encode(hasher.finalize());
    info!("Resolved user identity {hashed}");
    hashed
}

/// Generate a random identifier for a session with no explicit user id.
///
/// Characters are drawn uniformly from printable ASCII (0x21..=0x7E). The
/// result is fed through [`hash_user_id`] like any explicit identifier.
#[must_use]
pub fn anonymous_user_id() -> String {
    let mut rng = rand::rng();
    (0..ANONYMOUS_ID_LENGTH)
        .map(|_| rng.random_range(0x21u8..=0x7E) as char)
        .collect()
}
