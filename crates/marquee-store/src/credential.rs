//! Guest credential and name generation.

use rand::RngCore;

/// Number of random bytes in an access token (64 hex characters).
const TOKEN_BYTES: usize = 32;

/// Generates a new opaque access token.
///
/// 32 bytes from the OS CSPRNG, hex-encoded. Collisions are statistically
/// impossible; the store's unique constraint is the backstop.
#[must_use]
pub fn generate_access_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generates a display name for a new guest.
#[must_use]
pub fn generate_guest_name() -> String {
    format!("Guest_{}", chrono::Utc::now().timestamp_millis())
}
