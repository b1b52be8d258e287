use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted per-user envelope: profile fields plus the optional
/// encrypted payload and its metadata.
///
/// `encrypted_payload` and `encryption_metadata` are either both present or
/// both absent; the service layer maintains that invariant on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUserRecord {
    /// Stable primary key, immutable after creation.
    pub user_id: String,
    /// The user's email address.
    pub email: String,
    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Optional avatar reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Set once, on the first write.
    pub created_at: DateTime<Utc>,
    /// Set on every write.
    pub updated_at: DateTime<Utc>,
    /// The `iv:ciphertext:tag` token holding the encrypted record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_payload: Option<String>,
    /// Metadata about the encrypted payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_metadata: Option<EncryptionMetadata>,
}

/// Metadata written alongside the encrypted payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionMetadata {
    /// When the payload was last written.
    pub last_updated: DateTime<Utc>,
    /// Cipher version tag. Written on every save; never branched on at
    /// read time.
    pub version: String,
}

impl StoredUserRecord {
    /// Whether the envelope currently carries an encrypted payload.
    pub fn has_payload(&self) -> bool {
        self.encrypted_payload.is_some()
    }
}
