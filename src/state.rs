use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::crypto::cipher::{Cipher, SecureKey};
use crate::error::Result;
use crate::models::session::Session;
use crate::repositories::envelope::{EnvelopeStore, FsEnvelopeStore};

/// In-process session registry keyed by the `session_id` cookie value.
///
/// Session issuance belongs to the external auth collaborator; this store
/// is the seam where resolved sessions live for the middleware to find.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    /// Creates an empty `SessionStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session for a user and returns its id.
    pub fn issue(&self, user_id: &str, email: &str, duration_days: i64) -> Uuid {
        let session_id = Uuid::new_v4();
        let now = Utc::now();
        let session = Session {
            user_id: user_id.to_string(),
            email: email.to_string(),
            created_at: now,
            expires_at: now + Duration::days(duration_days),
        };

        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(session_id, session);

        session_id
    }

    /// Looks up a session by id.
    pub fn resolve(&self, session_id: &Uuid) -> Option<Session> {
        self.sessions
            .read()
            .expect("session store lock poisoned")
            .get(session_id)
            .cloned()
    }

    /// Removes a session.
    pub fn revoke(&self, session_id: &Uuid) {
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .remove(session_id);
    }
}

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The cipher used for every encrypt and decrypt.
    pub cipher: Arc<Cipher>,
    /// The per-user envelope store.
    pub store: Arc<dyn EnvelopeStore>,
    /// The session registry consulted by the auth middleware.
    pub sessions: SessionStore,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// The cipher is constructed here, once, from the configured key —
    /// a bad key fails startup rather than the first request.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let key = SecureKey::from_bytes(&config.encryption_key)?;
        let cipher = Arc::new(Cipher::new(&key));
        tracing::info!("✅ Cipher initialized");

        let store = Arc::new(FsEnvelopeStore::new(config.data_dir.clone()));
        tracing::info!("✅ Envelope store rooted at {}", config.data_dir.display());

        let sessions = SessionStore::new();
        tracing::info!("✅ Session store initialized");

        Ok(AppState {
            config: config.clone(),
            cipher,
            store,
            sessions,
        })
    }
}
