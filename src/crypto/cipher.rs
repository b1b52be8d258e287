use aes_gcm::{
    aead::{consts::U16, Aead, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce,
};
use aes_gcm::aead::rand_core::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};
use crate::error::{AppError, Result};

/// The size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// The size of the initialization vector in bytes.
pub const IV_SIZE: usize = 16;
/// The size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// AES-256-GCM with a 16-byte IV, the width the token format carries.
type VaultAead = AesGcm<Aes256, U16>;

/// A secure key wrapper that ensures the key is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureKey([u8; KEY_SIZE]);

impl SecureKey {
    /// Creates a new `SecureKey` from a byte array.
    ///
    /// # Arguments
    ///
    /// * `key` - A 32-byte array representing the AES-256 key.
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    /// Creates a `SecureKey` from a byte slice, failing on any other length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            AppError::Configuration(format!(
                "encryption key must be {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    /// Returns a reference to the key as a byte slice.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Generates a new random AES-256 key.
///
/// # Returns
///
/// A `SecureKey` containing the generated key.
pub fn generate_key() -> SecureKey {
    let mut key = [0u8; KEY_SIZE];
    OsRng.fill_bytes(&mut key);
    SecureKey::new(key)
}

/// Generates a new random AES-256 key as a 64-character hex string,
/// the form the `ENCRYPTION_KEY` environment variable expects.
pub fn generate_key_hex() -> String {
    hex::encode(generate_key().as_bytes())
}

/// Generates a fresh random initialization vector.
fn generate_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// A stateless AES-256-GCM transform over `iv:ciphertext:tag` hex tokens.
///
/// The key is supplied once, at construction, so a missing key is a
/// startup failure rather than a per-call surprise.
pub struct Cipher {
    aead: VaultAead,
}

impl Cipher {
    /// Creates a new `Cipher` from a key.
    pub fn new(key: &SecureKey) -> Self {
        Self {
            aead: VaultAead::new(key.as_bytes().into()),
        }
    }

    /// Encrypts a plaintext string into an `iv:ciphertext:tag` token.
    ///
    /// A fresh random IV is generated per call, so encrypting the same
    /// plaintext twice yields different tokens.
    ///
    /// # Arguments
    ///
    /// * `plaintext` - The data to encrypt.
    ///
    /// # Returns
    ///
    /// The hex-encoded three-segment token.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let iv = generate_iv();
        let nonce = Nonce::from(iv);

        let mut sealed = self
            .aead
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| AppError::Encryption(format!("Encryption failed: {}", e)))?;

        // The AEAD appends the 16-byte tag to the ciphertext.
        let tag = sealed.split_off(sealed.len() - TAG_SIZE);

        Ok(format!(
            "{}:{}:{}",
            hex::encode(iv),
            hex::encode(&sealed),
            hex::encode(&tag)
        ))
    }

    /// Decrypts an `iv:ciphertext:tag` token back into the plaintext.
    ///
    /// Fails with [`AppError::MalformedToken`] before any cipher work if the
    /// token does not parse, and with [`AppError::DecryptionFailed`] if the
    /// authentication tag does not verify.
    ///
    /// # Arguments
    ///
    /// * `token` - The three-segment token produced by [`Cipher::encrypt`].
    pub fn decrypt(&self, token: &str) -> Result<String> {
        let (iv, ciphertext, tag) = parse_token(token)?;
        let nonce = Nonce::from(iv);

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);

        let plaintext = self
            .aead
            .decrypt(&nonce, sealed.as_slice())
            .map_err(|_| {
                AppError::DecryptionFailed("authentication tag mismatch".to_string())
            })?;

        String::from_utf8(plaintext)
            .map_err(|_| AppError::DecryptionFailed("plaintext is not valid UTF-8".to_string()))
    }
}

/// Splits a token into its IV, ciphertext and tag parts.
///
/// The token must contain exactly three non-empty hex segments, with a
/// 16-byte IV and a 16-byte tag.
fn parse_token(token: &str) -> Result<([u8; IV_SIZE], Vec<u8>, Vec<u8>)> {
    let segments: Vec<&str> = token.split(':').collect();

    if segments.len() != 3 {
        return Err(AppError::MalformedToken(format!(
            "expected 3 segments, got {}",
            segments.len()
        )));
    }

    if segments.iter().any(|s| s.is_empty()) {
        return Err(AppError::MalformedToken("empty token segment".to_string()));
    }

    let iv_bytes = hex::decode(segments[0])
        .map_err(|_| AppError::MalformedToken("IV segment is not valid hex".to_string()))?;
    let ciphertext = hex::decode(segments[1])
        .map_err(|_| AppError::MalformedToken("ciphertext segment is not valid hex".to_string()))?;
    let tag = hex::decode(segments[2])
        .map_err(|_| AppError::MalformedToken("tag segment is not valid hex".to_string()))?;

    let iv: [u8; IV_SIZE] = iv_bytes.try_into().map_err(|v: Vec<u8>| {
        AppError::MalformedToken(format!("IV must be {} bytes, got {}", IV_SIZE, v.len()))
    })?;

    if tag.len() != TAG_SIZE {
        return Err(AppError::MalformedToken(format!(
            "tag must be {} bytes, got {}",
            TAG_SIZE,
            tag.len()
        )));
    }

    Ok((iv, ciphertext, tag))
}
