use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short post. Bodies are validated and profanity-masked by the store
/// before a chirp is ever constructed; a chirp is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: u64,
    pub body: String,
    pub author_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    /// PHC-formatted argon2 hash. Never the plaintext.
    pub password_hash: String,
    #[serde(default)]
    pub is_upgraded: bool,
}

/// Long-lived opaque credential. A lookup key, not a signed assertion:
/// there are no embedded claims, the value only means something to the
/// token table. At most one live token exists per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub user_id: u64,
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Expiry is not enforced by the store's lookup; callers that redeem a
    /// token apply this check explicitly.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
