//! Argon2 implementation of the credential-hashing port.
//!
//! Every hash gets a fresh random salt and the output is a self-describing
//! PHC string, so parameters can be tightened later without invalidating
//! stored hashes. Verification goes through `argon2`, which compares in
//! constant time.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::domain::ports::{CredentialHasher, HashingError};
use crate::domain::PasswordHashString;

/// Salted, deliberately slow hasher used in production wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2CredentialHasher;

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordHashString, HashingError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|err| HashingError::failed(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| HashingError::failed(err.to_string()))?;
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| HashingError::failed(err.to_string()))?
            .to_string();
        Ok(PasswordHashString::new(phc))
    }

    fn verify(&self, hash: &PasswordHashString, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash.as_str()) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
