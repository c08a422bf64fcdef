//! Argon2id hashing and verification of staff PINs.
//!
//! PINs are short, so they are never stored or compared in clear: each is
//! hashed with a random salt and stored in PHC string format.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use salon_db::models::staff::Staff;

/// Hash a PIN using Argon2id with a random salt.
pub fn hash_pin(pin: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(pin.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a PIN against a stored PHC-formatted hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only if the stored hash is malformed.
pub fn verify_pin(pin: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(pin.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Return the first candidate whose PIN hash matches `pin`.
///
/// Malformed hashes are logged and skipped.
pub fn find_by_pin<'a>(pin: &str, candidates: &'a [Staff]) -> Option<&'a Staff> {
    candidates.iter().find(|staff| match verify_pin(pin, &staff.pin_hash) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::warn!(staff_id = staff.id, error = %e, "Skipping staff with malformed PIN hash");
            false
        }
    })
}
