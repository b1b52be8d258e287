use std::env;
use std::path::PathBuf;
use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The directory holding one envelope file per user.
    pub data_dir: PathBuf,
    /// The duration of a session in days.
    pub session_duration_days: i64,
    /// The key used to encrypt sensitive payloads.
    pub encryption_key: Zeroizing<Vec<u8>>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let mut encryption_key_hex = env::var("ENCRYPTION_KEY")
            .context("ENCRYPTION_KEY must be set (generate with: openssl rand -hex 32)")?;

        let encryption_key_bytes = hex::decode(&encryption_key_hex)
            .context("ENCRYPTION_KEY must be valid hexadecimal")?;

        encryption_key_hex.zeroize();

        if encryption_key_bytes.len() != 32 {
            anyhow::bail!("ENCRYPTION_KEY must be exactly 32 bytes (64 hex characters)");
        }

        Ok(Self {
            data_dir: env::var("SENSITIVE_DATA_DIR")
                .unwrap_or_else(|_| "data/sensitive".to_string())
                .into(),
            session_duration_days: env::var("SESSION_DURATION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .context("Invalid SESSION_DURATION_DAYS")?,
            encryption_key: Zeroizing::new(encryption_key_bytes),
        })
    }
}
