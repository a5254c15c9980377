//! Per-process session keystore
//!
//! Holds the random key and salt from which the passphrase obfuscation key is
//! derived. One keystore is created per process and shared by `Arc` with every
//! [`VaultSession`](crate::vault::VaultSession); the secrets are drawn once, on
//! first use, and never change afterwards.

use rand::rngs::OsRng;
use std::sync::OnceLock;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{derive_cipher_key, CipherKey, RandomSource};

/// Length of the session key and of the session salt, in bytes
pub const SESSION_SECRET_LEN: usize = 20;

/// Random key and salt drawn at first use
#[derive(Zeroize, ZeroizeOnDrop)]
struct SessionSecrets {
    key: [u8; SESSION_SECRET_LEN],
    salt: [u8; SESSION_SECRET_LEN],
}

impl SessionSecrets {
    fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut secrets = Self {
            key: [0u8; SESSION_SECRET_LEN],
            salt: [0u8; SESSION_SECRET_LEN],
        };
        rng.fill_bytes(&mut secrets.key);
        rng.fill_bytes(&mut secrets.salt);
        secrets
    }
}

/// Process-wide key/salt pair for passphrase obfuscation
#[derive(Default)]
pub struct SessionKeystore {
    secrets: OnceLock<SessionSecrets>,
}

impl SessionKeystore {
    /// Create an uninitialized keystore. Secrets are drawn lazily.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the session secrets from the OS random source if that has not
    /// happened yet. Safe to call concurrently; only one caller draws.
    pub fn ensure_initialized(&self) {
        self.ensure_initialized_with(&mut OsRng);
    }

    /// Same as [`ensure_initialized`](Self::ensure_initialized) with an
    /// explicit random source. The source is ignored once initialized.
    pub fn ensure_initialized_with<R: RandomSource + ?Sized>(&self, rng: &mut R) {
        self.secrets_with(rng);
    }

    /// Whether the secrets have been drawn
    pub fn is_initialized(&self) -> bool {
        self.secrets.get().is_some()
    }

    /// Derive the obfuscation cipher key, initializing first if needed
    pub fn cipher_key(&self) -> CipherKey {
        let secrets = self.secrets_with(&mut OsRng);
        derive_cipher_key(&secrets.key, &secrets.salt)
    }

    fn secrets_with<R: RandomSource + ?Sized>(&self, rng: &mut R) -> &SessionSecrets {
        self.secrets.get_or_init(|| {
            debug!("Initializing session keystore");
            SessionSecrets::generate(rng)
        })
    }

    #[cfg(test)]
    fn raw_secrets(&self) -> Option<(&[u8], &[u8])> {
        self.secrets
            .get()
            .map(|s| (s.key.as_slice(), s.salt.as_slice()))
    }
}

impl std::fmt::Debug for SessionKeystore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeystore")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
