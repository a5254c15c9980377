//! Password generation
//!
//! - [`CharacterPool`]: weighted synthesis honouring per-category minimums
//! - Pronounceable mode (syllables with optional look-alike substitution)
//! - [`check_password`]: strength check for user-chosen passphrases

pub mod charset;
mod pool;
mod pronounceable;
mod strength;

pub use charset::Category;
pub use pool::CharacterPool;
pub use strength::{check_password, WeakPassword, MIN_LENGTH, SUFFICIENT_LENGTH};
