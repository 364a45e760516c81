//! Error taxonomy shared by the store and the auth layer.
//!
//! Every failure surfaces with its kind intact so the transport layer can
//! map kinds to status codes. Nothing here is retried internally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-bounds input (e.g. an oversized chirp body).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Uniqueness violation (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Referenced entity absent.
    #[error("record not found")]
    NotFound,

    /// Authenticated caller lacks rights over the target entity. Also used
    /// for credential mismatches, which are deliberately indistinguishable
    /// from unknown-user at the authentication boundary.
    #[error("unauthorized")]
    Unauthorized,

    /// Missing, invalid, or expired session token.
    #[error("unauthenticated")]
    Unauthenticated,

    /// I/O or serialization failure on the document. Fatal for the current
    /// request, never for the process.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
