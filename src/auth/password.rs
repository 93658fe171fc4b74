use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use rand::RngCore;

use crate::error::AppError;
use crate::Result;

/// Salt length in bytes.
const SALT_BYTES: usize = 16;

/// PBKDF2-HMAC-SHA256 rounds for new hashes.
const PBKDF2_ROUNDS: u32 = 100_000;

/// Hash `password` with a fresh random salt.
///
/// The result is a PHC string (`$pbkdf2-sha256$i=...,l=32$<salt>$<hash>`), so
/// the round count travels with each stored hash. CPU-bound; call it from a
/// blocking context.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| AppError::InternalError(format!("failed to encode salt: {}", e)))?;

    let params = Params {
        rounds: PBKDF2_ROUNDS,
        output_length: 32,
    };
    let hash = Pbkdf2
        .hash_password_customized(password.as_bytes(), None, None, params, &salt)
        .map_err(|e| AppError::InternalError(format!("failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Check `password` against a hash produced by [`hash_password`].
/// Unparseable hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}
