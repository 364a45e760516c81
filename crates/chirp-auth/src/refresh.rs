//! Long-lived opaque refresh tokens: 32 random bytes, hex-encoded, valid
//! for 60 days. They carry no claims; the store's token table is the sole
//! authority on what a value means.

use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};

use chirp_store::Store;
use chirp_types::{RefreshToken, Result};

pub const TOKEN_BYTES: usize = 32;
pub const TOKEN_TTL_DAYS: i64 = 60;

/// Generates a fresh token for `user_id` without touching the store.
pub fn generate(user_id: u64) -> RefreshToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    RefreshToken {
        user_id,
        value: hex::encode(bytes),
        expires_at: Utc::now() + Duration::days(TOKEN_TTL_DAYS),
    }
}

/// Generates a fresh token and overwrites the stored row for `user_id`.
/// The previous value, if any, becomes unusable immediately.
pub fn rotate(store: &Store, user_id: u64) -> Result<RefreshToken> {
    store.put_refresh_token(generate(user_id))
}

pub fn revoke(store: &Store, value: &str) -> Result<()> {
    store.revoke_refresh_token(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirp_types::Error;

    #[test]
    fn generated_values_are_64_hex_chars() {
        let token = generate(1);
        assert_eq!(token.value.len(), 64);
        assert!(token.value.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!token.is_expired());
    }

    #[test]
    fn generated_values_are_distinct() {
        assert_ne!(generate(1).value, generate(1).value);
    }

    #[test]
    fn rotate_twice_leaves_only_the_latest_resolvable() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("chirps.json")).unwrap();

        let first = rotate(&store, 7).unwrap();
        let second = rotate(&store, 7).unwrap();
        assert_ne!(first.value, second.value);

        let err = store.refresh_token_by_value(&first.value).unwrap_err();
        assert!(matches!(err, Error::NotFound));
        assert_eq!(
            store.refresh_token_by_value(&second.value).unwrap().user_id,
            7
        );
    }

    #[test]
    fn revoke_then_lookup_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("chirps.json")).unwrap();

        let token = rotate(&store, 7).unwrap();
        revoke(&store, &token.value).unwrap();

        let err = store.refresh_token_by_value(&token.value).unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }
}
