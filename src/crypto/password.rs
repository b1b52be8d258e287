use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use crate::error::{AppError, Result};

/// The number of PBKDF2 iterations.
const PBKDF2_ITERATIONS: u32 = 10_000;
/// The size of the derived hash in bytes.
const HASH_SIZE: usize = 64;
/// The size of the random salt in bytes.
const SALT_SIZE: usize = 16;

/// A password hash together with the salt it was derived with, both hex.
#[derive(Debug, Clone)]
pub struct PasswordHash {
    /// The hex-encoded PBKDF2-SHA512 hash.
    pub hash: String,
    /// The hex-encoded salt.
    pub salt: String,
}

/// Derives the PBKDF2-SHA512 hash of a password.
fn derive(password: &str, salt: &[u8]) -> [u8; HASH_SIZE] {
    let mut hash = [0u8; HASH_SIZE];
    pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut hash);
    hash
}

/// Hashes a password with PBKDF2-SHA512.
///
/// # Arguments
///
/// * `password` - The password to hash.
/// * `salt` - An optional hex-encoded salt; a fresh random salt is
///   generated when none is supplied.
///
/// # Returns
///
/// A `Result` containing the hex-encoded hash and salt.
pub fn hash_password(password: &str, salt: Option<&str>) -> Result<PasswordHash> {
    let salt_bytes = match salt {
        Some(salt_hex) => hex::decode(salt_hex)
            .map_err(|_| AppError::Validation("Salt must be valid hexadecimal".to_string()))?,
        None => {
            let mut salt_bytes = vec![0u8; SALT_SIZE];
            OsRng.fill_bytes(&mut salt_bytes);
            salt_bytes
        }
    };

    let hash = derive(password, &salt_bytes);

    Ok(PasswordHash {
        hash: hex::encode(hash),
        salt: hex::encode(&salt_bytes),
    })
}

/// Verifies a password against a stored hash and salt.
///
/// The comparison is constant-time.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `hash` - The hex-encoded hash to verify against.
/// * `salt` - The hex-encoded salt the hash was derived with.
///
/// # Returns
///
/// A `Result` containing `true` if the password matches.
pub fn verify_password(password: &str, hash: &str, salt: &str) -> Result<bool> {
    let expected = hex::decode(hash)
        .map_err(|_| AppError::Validation("Hash must be valid hexadecimal".to_string()))?;
    let salt_bytes = hex::decode(salt)
        .map_err(|_| AppError::Validation("Salt must be valid hexadecimal".to_string()))?;

    let derived = derive(password, &salt_bytes);

    Ok(derived.as_slice().ct_eq(expected.as_slice()).into())
}
