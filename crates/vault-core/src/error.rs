//! Error types for vault-core

use thiserror::Error;

use crate::policy::{PolicyDecodeError, PolicyViolation};

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Invalid password policy: {0}")]
    InvalidPolicy(#[from] PolicyViolation),

    #[error("Malformed policy string: {0}")]
    PolicyDecode(#[from] PolicyDecodeError),

    #[error("Invalid passphrase")]
    InvalidPassphrase,

    #[error("Session is closed - open it with a passphrase first")]
    SessionClosed,

    #[error("Stored passphrase is not valid UTF-8")]
    InvalidUtf8,

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
