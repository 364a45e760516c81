//! Password hashing with Argon2id. Hashes are PHC strings carrying their
//! own salt and cost parameters, so verification needs nothing but the
//! stored string.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use chirp_types::{Error, Result};

pub fn hash(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| Error::Storage(format!("password hashing failed: {err}")))
}

/// A mismatch and an unparsable stored hash both come back as
/// `Unauthorized`: callers at the authentication boundary must not be able
/// to tell a bad password apart from a missing user.
pub fn verify(hash: &str, plain: &str) -> Result<()> {
    let parsed = PasswordHash::new(hash).map_err(|_| Error::Unauthorized)?;
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .map_err(|_| Error::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hashed = hash("hunter2").unwrap();
        assert_ne!(hashed, "hunter2");
        verify(&hashed, "hunter2").unwrap();
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let hashed = hash("hunter2").unwrap();
        let err = verify(&hashed, "hunter3").unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
    }

    #[test]
    fn garbage_stored_hash_is_unauthorized() {
        let err = verify("not-a-phc-string", "hunter2").unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
    }

    #[test]
    fn same_password_hashes_differently() {
        // Fresh salt per hash.
        assert_ne!(hash("hunter2").unwrap(), hash("hunter2").unwrap());
    }
}
