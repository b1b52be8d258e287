use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents an authenticated session, as resolved by the auth middleware.
///
/// Session issuance itself belongs to the external auth collaborator; the
/// vault only ever sees the resolved user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The opaque identifier of the user this session belongs to.
    pub user_id: String,
    /// The user's email address.
    pub email: String,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has passed its expiry timestamp.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
