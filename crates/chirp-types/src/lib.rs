pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{Chirp, RefreshToken, User};
