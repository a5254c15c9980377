//! Passphrase strength check

use thiserror::Error;

/// Length at which any password is accepted
pub const SUFFICIENT_LENGTH: usize = 12;

/// Shortest password accepted at all
pub const MIN_LENGTH: usize = 8;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeakPassword {
    #[error("password must be at least 8 characters long")]
    TooShort,

    #[error(
        "password must contain at least one uppercase letter, one lowercase letter and one digit or symbol"
    )]
    TooSimple,
}

/// Accept passwords of at least 12 characters, or at least 8 characters
/// that mix upper case, lower case and a digit or other character.
pub fn check_password(password: &str) -> Result<(), WeakPassword> {
    let length = password.chars().count();
    if length >= SUFFICIENT_LENGTH {
        return Ok(());
    }
    if length < MIN_LENGTH {
        return Err(WeakPassword::TooShort);
    }

    let (mut lower, mut upper, mut other) = (false, false, false);
    for c in password.chars() {
        if c.is_lowercase() {
            lower = true;
        } else if c.is_uppercase() {
            upper = true;
        } else {
            other = true;
        }
    }

    if lower && upper && other {
        Ok(())
    } else {
        Err(WeakPassword::TooSimple)
    }
}
