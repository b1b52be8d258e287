use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::envelope::StoredUserRecord;

/// Storage of per-user envelopes behind a small key-value surface, so the
/// service layer stays backend-agnostic.
///
/// `get` followed by `put` is a plain read-modify-write cycle: there is no
/// locking or compare-and-swap, and concurrent writers for the same user id
/// resolve as last-writer-wins.
pub trait EnvelopeStore: Send + Sync {
    /// Reads the envelope for a user, or `None` if none has been written.
    fn get(&self, user_id: &str) -> Result<Option<StoredUserRecord>>;

    /// Writes the envelope for a user, fully overwriting any prior content.
    fn put(&self, user_id: &str, envelope: &StoredUserRecord) -> Result<()>;
}

/// The default [`EnvelopeStore`]: one pretty-printed JSON file per user id
/// in a single flat directory, created lazily on first write.
#[derive(Debug, Clone)]
pub struct FsEnvelopeStore {
    root: PathBuf,
}

impl FsEnvelopeStore {
    /// Creates a store rooted at the given directory.
    ///
    /// The directory is not created here; it appears on the first `put`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn envelope_path(&self, user_id: &str) -> PathBuf {
        self.root.join(format!("{}.json", user_id))
    }
}

impl EnvelopeStore for FsEnvelopeStore {
    fn get(&self, user_id: &str) -> Result<Option<StoredUserRecord>> {
        let path = self.envelope_path(user_id);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(envelope) => Ok(Some(envelope)),
            Err(e) => {
                // Unreadable content reads as "no record", the same terminal
                // state as a missing file.
                tracing::warn!("Envelope for user {} failed to parse: {}", user_id, e);
                Ok(None)
            }
        }
    }

    fn put(&self, user_id: &str, envelope: &StoredUserRecord) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        let path = self.envelope_path(user_id);
        let json = serde_json::to_string_pretty(envelope)?;

        // Write to a temp file first, then rename, so a failed write never
        // leaves a truncated envelope behind.
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}
