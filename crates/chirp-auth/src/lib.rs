//! Credential and token lifecycle on top of the document store.
//!
//! Two credential shapes: short-lived signed session tokens (JWTs proving
//! identity for a bounded window) and long-lived opaque refresh tokens
//! (lookup keys used to mint new session tokens without a password).

pub mod password;
pub mod refresh;
pub mod session;

pub use session::{Claims, SessionKeys};

use chirp_store::Store;
use chirp_types::{Error, RefreshToken, Result, User};

/// Everything a successful login produces.
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub session_token: String,
    pub refresh_token: RefreshToken,
}

/// Verifies an email/password pair and, on success, issues a session token
/// and rotates the user's refresh token.
///
/// An unknown email and a wrong password both come back as `Unauthorized`:
/// the caller learns nothing about which emails exist.
pub fn authenticate(
    store: &Store,
    keys: &SessionKeys,
    email: &str,
    plain: &str,
) -> Result<AuthSession> {
    let user = store.user_by_email(email).map_err(|err| match err {
        Error::NotFound => Error::Unauthorized,
        other => other,
    })?;
    password::verify(&user.password_hash, plain)?;

    let session_token = keys.issue(user.id)?;
    let refresh_token = refresh::rotate(store, user.id)?;

    Ok(AuthSession {
        user,
        session_token,
        refresh_token,
    })
}

/// Redeems a refresh token for a new session token. This is the explicit
/// expiry enforcement point: the store's lookup returns expired rows, and
/// redemption rejects them here.
pub fn refresh_session(store: &Store, keys: &SessionKeys, refresh_value: &str) -> Result<String> {
    let token = store
        .refresh_token_by_value(refresh_value)
        .map_err(|err| match err {
            Error::NotFound => Error::Unauthenticated,
            other => other,
        })?;

    if token.is_expired() {
        return Err(Error::Unauthenticated);
    }

    keys.issue(token.user_id)
}
