use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use chirp_types::{Chirp, RefreshToken, User};

/// The aggregate root: every entity collection lives in one JSON document,
/// keyed by integer ID (stringified in the JSON encoding). Refresh tokens
/// are keyed by the owning user's ID, which is what enforces the
/// one-live-token-per-user rule.
///
/// The `*_seq` counters are persisted next to their collections so assigned
/// IDs stay monotonic across deletions. They carry `serde(default)` because
/// older documents predate them; `next_chirp_id`/`next_user_id` clamp to the
/// highest existing key first, so a legacy document can never re-issue a
/// live ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub chirps: BTreeMap<u64, Chirp>,
    #[serde(default)]
    pub users: BTreeMap<u64, User>,
    #[serde(default)]
    pub tokens: BTreeMap<u64, RefreshToken>,
    #[serde(default)]
    pub chirp_seq: u64,
    #[serde(default)]
    pub user_seq: u64,
}

impl Document {
    pub fn next_chirp_id(&mut self) -> u64 {
        let floor = self.chirps.keys().next_back().copied().unwrap_or(0);
        self.chirp_seq = self.chirp_seq.max(floor) + 1;
        self.chirp_seq
    }

    pub fn next_user_id(&mut self) -> u64 {
        let floor = self.users.keys().next_back().copied().unwrap_or(0);
        self.user_seq = self.user_seq.max(floor) + 1;
        self.user_seq
    }
}
