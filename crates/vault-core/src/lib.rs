//! # vault-core
//!
//! Core engine for PW Vault including:
//! - In-memory obfuscation of the master passphrase under a per-process key
//! - Password policies with a compact 19-character hex encoding
//! - Weighted password generation honouring per-category minimums
//! - Settings persistence for the default policy and named policies

pub mod crypto;
pub mod error;
pub mod generator;
pub mod passkey;
pub mod policy;
pub mod session;
pub mod settings;
mod vault;

pub use crypto::{BlockCipher, BlowfishCipher, RandomSource, SecretBuffer, SecretString};
pub use error::{Result, VaultError};
pub use generator::{check_password, CharacterPool, WeakPassword};
pub use passkey::MasterKeyBox;
pub use policy::{
    NamedPolicies, PasswordPolicy, PolicyDecodeError, PolicyFlags, PolicyLimits, PolicyRow,
    PolicyViolation,
};
pub use session::SessionKeystore;
pub use settings::{PolicyDefaults, Settings, SettingsManager};
pub use vault::{SessionState, VaultSession};
