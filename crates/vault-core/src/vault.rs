//! Database session orchestration

use std::sync::Arc;
use tracing::{debug, info};

use crate::crypto::{RandomSource, SecretString};
use crate::error::{Result, VaultError};
use crate::passkey::MasterKeyBox;
use crate::policy::{PasswordPolicy, PolicyLimits};
use crate::session::SessionKeystore;
use crate::settings::Settings;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No passphrase held
    Closed,
    /// Passphrase held, obfuscated
    Open,
}

/// One open database: its obfuscated passphrase and generation defaults
pub struct VaultSession {
    passkey: MasterKeyBox,
    default_policy: PasswordPolicy,
    limits: PolicyLimits,
    state: SessionState,
}

impl VaultSession {
    /// Create a closed session using the configured default policy and limits
    pub fn new(keystore: Arc<SessionKeystore>, settings: &Settings) -> Self {
        Self {
            passkey: MasterKeyBox::new(keystore),
            default_policy: settings.default_policy(),
            limits: settings.policy_limits,
            state: SessionState::Closed,
        }
    }

    /// Get the current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if the session is open
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Open the session with a passphrase. Opening an already open session
    /// only checks that the passphrase matches.
    pub fn open(&mut self, passphrase: &str) -> Result<()> {
        if self.state == SessionState::Open {
            debug!("Session already open");
            return self.verify_passphrase(passphrase);
        }

        self.passkey.set_passphrase(passphrase);
        self.state = SessionState::Open;

        info!("Session opened");
        Ok(())
    }

    /// Check a candidate passphrase against the held one
    pub fn verify_passphrase(&self, candidate: &str) -> Result<()> {
        if self.state != SessionState::Open {
            return Err(VaultError::SessionClosed);
        }
        if self.passkey.matches(candidate.as_bytes()) {
            Ok(())
        } else {
            Err(VaultError::InvalidPassphrase)
        }
    }

    /// Replace the held passphrase after checking the current one
    pub fn change_passphrase(&mut self, old: &str, new: &str) -> Result<()> {
        self.verify_passphrase(old)?;
        self.passkey.set_passphrase(new);

        info!("Passphrase changed");
        Ok(())
    }

    /// Recover the held passphrase
    pub fn passphrase(&self) -> Result<SecretString> {
        if self.state != SessionState::Open {
            return Err(VaultError::SessionClosed);
        }
        self.passkey.passphrase()
    }

    /// Close the session, wiping the held passphrase
    pub fn close(&mut self) {
        self.passkey.clear();
        self.state = SessionState::Closed;

        info!("Session closed");
    }

    /// Policy used when a caller passes the default-policy sentinel
    pub fn default_policy(&self) -> &PasswordPolicy {
        &self.default_policy
    }

    pub fn limits(&self) -> &PolicyLimits {
        &self.limits
    }

    /// Validate and install a new default policy
    pub fn set_default_policy(&mut self, policy: PasswordPolicy) -> Result<()> {
        let policy = policy.normalized();
        policy.validate(&self.limits)?;
        self.default_policy = policy;
        Ok(())
    }

    /// Generate a password, substituting the default policy for the sentinel
    pub fn generate_password<R: RandomSource + ?Sized>(
        &self,
        policy: &PasswordPolicy,
        rng: &mut R,
    ) -> Result<SecretString> {
        policy.make_random_password(&self.default_policy, &self.limits, rng)
    }

    /// Generate a password with the default policy
    pub fn generate_default_password<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<SecretString> {
        self.default_policy.generate(&self.limits, rng)
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("state", &self.state)
            .field("default_policy", &self.default_policy)
            .finish_non_exhaustive()
    }
}
