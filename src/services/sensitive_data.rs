use chrono::Utc;
use serde_json::{Map, Value};

use crate::crypto::cipher::Cipher;
use crate::error::{AppError, Result};
use crate::models::envelope::{EncryptionMetadata, StoredUserRecord};
use crate::models::record::SensitiveRecord;
use crate::models::session::Session;
use crate::repositories::envelope::EnvelopeStore;

/// The version tag written with every encrypted payload. Carried in the
/// envelope but never branched on at read time.
pub const ENCRYPTION_VERSION: &str = "1.0";

/// Encrypts and stores a user's record, replacing any previous payload.
///
/// Profile fields and `created_at` are inherited from the existing envelope
/// when there is one; `updated_at` and the encryption metadata are set to
/// now.
pub fn save_record(
    store: &dyn EnvelopeStore,
    cipher: &Cipher,
    session: &Session,
    record: &SensitiveRecord,
) -> Result<()> {
    let existing = store.get(&session.user_id)?;

    let plaintext = serde_json::to_string(record)?;
    let token = cipher.encrypt(&plaintext)?;

    let now = Utc::now();
    let envelope = StoredUserRecord {
        user_id: session.user_id.clone(),
        email: session.email.clone(),
        display_name: existing.as_ref().and_then(|e| e.display_name.clone()),
        avatar_url: existing.as_ref().and_then(|e| e.avatar_url.clone()),
        created_at: existing.as_ref().map(|e| e.created_at).unwrap_or(now),
        updated_at: now,
        encrypted_payload: Some(token),
        encryption_metadata: Some(EncryptionMetadata {
            last_updated: now,
            version: ENCRYPTION_VERSION.to_string(),
        }),
    };

    store.put(&session.user_id, &envelope)?;
    tracing::debug!("Sensitive data saved for user {}", session.user_id);
    Ok(())
}

/// Loads and decrypts a user's record.
///
/// Returns `None` when no envelope exists or the envelope carries no
/// payload — absence is a valid terminal state, not an error. Cipher
/// failures propagate.
pub fn load_record(
    store: &dyn EnvelopeStore,
    cipher: &Cipher,
    user_id: &str,
) -> Result<Option<SensitiveRecord>> {
    let Some(envelope) = store.get(user_id)? else {
        return Ok(None);
    };
    let Some(token) = envelope.encrypted_payload else {
        return Ok(None);
    };

    let plaintext = cipher.decrypt(&token)?;
    let record = serde_json::from_str(&plaintext)?;
    Ok(Some(record))
}

/// Shallow-merges a partial update over the stored record and saves the
/// result.
///
/// Top-level fields present in the partial win (explicit nulls clear);
/// fields not present survive unchanged. An absent stored record merges
/// against the empty record. The read-merge-write cycle is not atomic:
/// concurrent updates for the same user resolve as last-writer-wins.
pub fn update_record(
    store: &dyn EnvelopeStore,
    cipher: &Cipher,
    session: &Session,
    partial: Map<String, Value>,
) -> Result<()> {
    let current = load_record(store, cipher, &session.user_id)?.unwrap_or_default();

    let mut merged = match serde_json::to_value(&current)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in partial {
        merged.insert(key, value);
    }

    let record: SensitiveRecord = serde_json::from_value(Value::Object(merged))
        .map_err(|e| AppError::Validation(format!("Invalid sensitive data payload: {}", e)))?;

    save_record(store, cipher, session, &record)
}

/// Clears a user's encrypted payload while keeping the envelope.
///
/// Profile fields and `created_at` survive; `updated_at` is refreshed. A
/// missing envelope makes this a no-op.
pub fn delete_record(store: &dyn EnvelopeStore, user_id: &str) -> Result<()> {
    let Some(mut envelope) = store.get(user_id)? else {
        tracing::debug!("Delete for user {} with no stored envelope", user_id);
        return Ok(());
    };

    envelope.encrypted_payload = None;
    envelope.encryption_metadata = None;
    envelope.updated_at = Utc::now();

    store.put(user_id, &envelope)?;
    tracing::debug!("Sensitive data cleared for user {}", user_id);
    Ok(())
}
