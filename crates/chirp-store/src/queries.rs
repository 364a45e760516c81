use chirp_types::{Chirp, Error, RefreshToken, Result, User};

use crate::Store;

/// Chirp listings are ordered by ID; ascending is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

pub const MAX_CHIRP_LEN: usize = 140;

const BLOCKED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

impl Store {
    // -- Chirps --

    /// Validates and masks the body, then persists a new chirp. The body is
    /// rejected before masking if it exceeds [`MAX_CHIRP_LEN`] characters.
    pub fn create_chirp(&self, body: &str, author_id: u64) -> Result<Chirp> {
        if body.chars().count() > MAX_CHIRP_LEN {
            return Err(Error::Validation(format!(
                "chirp body exceeds {MAX_CHIRP_LEN} characters"
            )));
        }
        let body = mask_profanity(body);

        self.write(|doc| {
            let id = doc.next_chirp_id();
            let chirp = Chirp {
                id,
                body: body.clone(),
                author_id,
            };
            doc.chirps.insert(id, chirp.clone());
            Ok(chirp)
        })
    }

    /// All chirps, optionally restricted to one author. An empty result is
    /// not an error.
    pub fn chirps(&self, author: Option<u64>, order: SortOrder) -> Result<Vec<Chirp>> {
        self.read(|doc| {
            // BTreeMap iteration is already ascending by ID.
            let mut chirps: Vec<Chirp> = doc
                .chirps
                .values()
                .filter(|chirp| author.is_none_or(|id| chirp.author_id == id))
                .cloned()
                .collect();
            if order == SortOrder::Descending {
                chirps.reverse();
            }
            Ok(chirps)
        })
    }

    pub fn chirp_by_id(&self, id: u64) -> Result<Chirp> {
        self.read(|doc| doc.chirps.get(&id).cloned().ok_or(Error::NotFound))
    }

    /// Removes a chirp, but only for its author.
    pub fn delete_chirp(&self, id: u64, requester: u64) -> Result<()> {
        self.write(|doc| {
            let chirp = doc.chirps.get(&id).ok_or(Error::NotFound)?;
            if chirp.author_id != requester {
                return Err(Error::Unauthorized);
            }
            doc.chirps.remove(&id);
            Ok(())
        })
    }

    // -- Users --

    /// Registers a user. Emails are unique, compared case-sensitively as
    /// stored.
    pub fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        self.write(|doc| {
            if doc.users.values().any(|user| user.email == email) {
                return Err(Error::Conflict(format!("email {email} already registered")));
            }
            let id = doc.next_user_id();
            let user = User {
                id,
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                is_upgraded: false,
            };
            doc.users.insert(id, user.clone());
            Ok(user)
        })
    }

    pub fn user_by_email(&self, email: &str) -> Result<User> {
        self.read(|doc| {
            doc.users
                .values()
                .find(|user| user.email == email)
                .cloned()
                .ok_or(Error::NotFound)
        })
    }

    /// Overwrites email and password hash in place. Does not re-check email
    /// uniqueness against other users.
    pub fn update_user(&self, id: u64, email: &str, password_hash: &str) -> Result<User> {
        self.write(|doc| {
            let user = doc.users.get_mut(&id).ok_or(Error::NotFound)?;
            user.email = email.to_string();
            user.password_hash = password_hash.to_string();
            Ok(user.clone())
        })
    }

    /// Marks the paid-tier flag. Driven by the payment webhook upstream.
    pub fn upgrade_user(&self, id: u64) -> Result<User> {
        self.write(|doc| {
            let user = doc.users.get_mut(&id).ok_or(Error::NotFound)?;
            user.is_upgraded = true;
            Ok(user.clone())
        })
    }

    // -- Refresh tokens --

    /// Upserts the token row for `token.user_id`. Any previous token for
    /// that user is overwritten and its value becomes unusable immediately.
    pub fn put_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken> {
        self.write(|doc| {
            doc.tokens.insert(token.user_id, token.clone());
            Ok(token)
        })
    }

    /// Exact value match over the token table. Does not check expiry;
    /// redemption paths apply [`RefreshToken::is_expired`] themselves.
    pub fn refresh_token_by_value(&self, value: &str) -> Result<RefreshToken> {
        self.read(|doc| {
            doc.tokens
                .values()
                .find(|token| token.value == value)
                .cloned()
                .ok_or(Error::NotFound)
        })
    }

    /// Deletes the matching token row.
    pub fn revoke_refresh_token(&self, value: &str) -> Result<()> {
        self.write(|doc| {
            let owner = doc
                .tokens
                .values()
                .find(|token| token.value == value)
                .map(|token| token.user_id)
                .ok_or(Error::NotFound)?;
            doc.tokens.remove(&owner);
            Ok(())
        })
    }
}

/// Whole-token profanity masking: the body is split on single spaces, each
/// token is matched case-insensitively against the block list, and exact
/// matches are replaced with "****". A word that merely contains a blocked
/// word is left alone.
fn mask_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if BLOCKED_WORDS
                .iter()
                .any(|blocked| word.eq_ignore_ascii_case(blocked))
            {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
