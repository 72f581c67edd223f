//! Guest identity.
//!
//! Marquee has no accounts or passwords. Every end-user is an anonymous
//! [`GuestIdentity`], provisioned on first contact and recognized afterwards
//! by an opaque bearer credential.

use serde::{Deserialize, Serialize};

/// An anonymous end-user record.
///
/// Created by the store when the identity stage provisions a new visitor;
/// never mutated and never deleted afterwards.
///
/// # Example
///
/// ```
/// use marquee_core::GuestIdentity;
///
/// let guest = GuestIdentity {
///     id: 7,
///     name: "Guest_1730000000000".to_string(),
///     access_token: "1f".repeat(32),
/// };
/// assert_eq!(guest.log_id(), "guest:7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestIdentity {
    /// Store-assigned numeric identifier, unique across guests.
    pub id: i64,
    /// Generated display name, not user-chosen.
    pub name: String,
    /// Opaque bearer credential, unique across all identities.
    pub access_token: String,
}

impl GuestIdentity {
    /// Returns an identifier suitable for logging.
    ///
    /// Never includes the credential.
    #[must_use]
    pub fn log_id(&self) -> String {
        format!("guest:{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest() -> GuestIdentity {
        GuestIdentity {
            id: 42,
            name: "Guest_1730000000000".to_string(),
            access_token: "ab".repeat(32),
        }
    }

    #[test]
    fn test_log_id_omits_credential() {
        let g = guest();
        assert_eq!(g.log_id(), "guest:42");
        assert!(!g.log_id().contains(&g.access_token));
    }

    #[test]
    fn test_serialization_round_trip() {
        let g = guest();
        let json = serde_json::to_string(&g).expect("serialize");
        assert!(json.contains("\"id\":42"));
        let parsed: GuestIdentity = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(g, parsed);
    }
}
