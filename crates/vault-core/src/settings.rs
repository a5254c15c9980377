//! Application settings management
//!
//! Stores the default password policy, the policy limits and the named
//! policy list in a plain JSON file. None of it is secret.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, VaultError};
use crate::policy::{NamedPolicies, PasswordPolicy, PolicyFlags, PolicyLimits};

/// Current settings file version
pub const SETTINGS_VERSION: u32 = 1;

/// Default password policy as stored in the settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyDefaults {
    pub use_lowercase: bool,
    pub use_uppercase: bool,
    pub use_digits: bool,
    pub use_symbols: bool,
    pub use_hex_digits: bool,
    pub use_easy_vision: bool,
    pub make_pronounceable: bool,
    pub length: u16,
    pub lower_min: u16,
    pub upper_min: u16,
    pub digit_min: u16,
    pub symbol_min: u16,
    /// Symbol set used when a policy carries none (empty = built-in set)
    pub default_symbols: String,
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            use_lowercase: true,
            use_uppercase: true,
            use_digits: true,
            use_symbols: true,
            use_hex_digits: false,
            use_easy_vision: false,
            make_pronounceable: false,
            length: 12,
            lower_min: 0,
            upper_min: 0,
            digit_min: 0,
            symbol_min: 0,
            default_symbols: String::new(),
        }
    }
}

impl PolicyDefaults {
    /// Build the policy these defaults describe
    pub fn to_policy(&self) -> PasswordPolicy {
        let mut flags = PolicyFlags::empty();
        flags.set(PolicyFlags::USE_LOWERCASE, self.use_lowercase);
        flags.set(PolicyFlags::USE_UPPERCASE, self.use_uppercase);
        flags.set(PolicyFlags::USE_DIGITS, self.use_digits);
        flags.set(PolicyFlags::USE_SYMBOLS, self.use_symbols);
        flags.set(PolicyFlags::USE_HEX_DIGITS, self.use_hex_digits);
        flags.set(PolicyFlags::USE_EASY_VISION, self.use_easy_vision);
        flags.set(PolicyFlags::MAKE_PRONOUNCEABLE, self.make_pronounceable);

        PasswordPolicy {
            flags,
            length: self.length,
            digit_min: self.digit_min,
            lower_min: self.lower_min,
            symbol_min: self.symbol_min,
            upper_min: self.upper_min,
            symbols: None,
        }
        .with_custom_symbols(self.default_symbols.clone())
    }

    /// Overwrite these defaults with a policy's values
    pub fn update_from(&mut self, policy: &PasswordPolicy) {
        let flags = policy.flags;
        self.use_lowercase = flags.contains(PolicyFlags::USE_LOWERCASE);
        self.use_uppercase = flags.contains(PolicyFlags::USE_UPPERCASE);
        self.use_digits = flags.contains(PolicyFlags::USE_DIGITS);
        self.use_symbols = flags.contains(PolicyFlags::USE_SYMBOLS);
        self.use_hex_digits = flags.contains(PolicyFlags::USE_HEX_DIGITS);
        self.use_easy_vision = flags.contains(PolicyFlags::USE_EASY_VISION);
        self.make_pronounceable = flags.contains(PolicyFlags::MAKE_PRONOUNCEABLE);
        self.length = policy.length;
        self.lower_min = policy.lower_min;
        self.upper_min = policy.upper_min;
        self.digit_min = policy.digit_min;
        self.symbol_min = policy.symbol_min;
        self.default_symbols = policy.symbols.clone().unwrap_or_default();
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Policy used when none is given
    #[serde(default)]
    pub policy_defaults: PolicyDefaults,
    /// Maxima enforced on every policy
    #[serde(default)]
    pub policy_limits: PolicyLimits,
    /// Named policies in their header encoding
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub named_policies: String,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            version: SETTINGS_VERSION,
            policy_defaults: PolicyDefaults::default(),
            policy_limits: PolicyLimits::default(),
            named_policies: String::new(),
        }
    }

    /// The default policy, validated against the limits. Falls back to the
    /// built-in defaults when the stored ones are unusable.
    pub fn default_policy(&self) -> PasswordPolicy {
        let policy = self.policy_defaults.to_policy().normalized();
        match policy.validate(&self.policy_limits) {
            Ok(()) => policy,
            Err(e) => {
                warn!("Stored default policy is invalid ({}), using built-in defaults", e);
                PolicyDefaults::default().to_policy()
            }
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a new settings manager
    pub fn new(storage_dir: &Path) -> Self {
        let settings_file = storage_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file).unwrap_or_else(|e| {
            warn!("Could not read settings from {:?}: {}", settings_file, e);
            Settings::new()
        });

        Self {
            settings_file,
            settings,
        }
    }

    /// Platform data directory for the settings file
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("org", "pwvault", "pw-vault")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| VaultError::SettingsError("Could not determine config directory".to_string()))
    }

    /// Path of the settings file
    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        if settings.version > SETTINGS_VERSION {
            return Err(VaultError::SettingsError(format!(
                "settings version {} is newer than supported version {}",
                settings.version, SETTINGS_VERSION
            )));
        }
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Update settings and save
    pub async fn update(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.save().await
    }

    /// Get the default policy
    pub fn default_policy(&self) -> PasswordPolicy {
        self.settings.default_policy()
    }

    /// Get the policy limits
    pub fn policy_limits(&self) -> &PolicyLimits {
        &self.settings.policy_limits
    }

    /// Validate a policy, make it the default and save
    pub async fn set_default_policy(&mut self, policy: &PasswordPolicy) -> Result<()> {
        let policy = policy.normalized();
        policy.validate(&self.settings.policy_limits)?;
        self.settings.policy_defaults.update_from(&policy);
        self.save().await
    }

    /// Decode the stored named policy list
    pub fn named_policies(&self) -> NamedPolicies {
        NamedPolicies::decode(&self.settings.named_policies)
    }

    /// Validate a policy, store it under `name` and save
    pub async fn save_named_policy(&mut self, name: &str, policy: &PasswordPolicy) -> Result<()> {
        let policy = policy.normalized();
        policy.validate(&self.settings.policy_limits)?;

        let mut named = self.named_policies();
        named.insert(name, policy);
        self.settings.named_policies = named.encode();
        self.save().await
    }

    /// Remove a named policy and save. Returns whether it existed.
    pub async fn remove_named_policy(&mut self, name: &str) -> Result<bool> {
        let mut named = self.named_policies();
        if named.remove(name).is_none() {
            return Ok(false);
        }
        self.settings.named_policies = if named.is_empty() {
            String::new()
        } else {
            named.encode()
        };
        self.save().await?;
        Ok(true)
    }

    /// Reset settings to defaults and delete settings file
    pub async fn reset(&mut self) -> Result<()> {
        self.settings = Settings::default();

        if self.settings_file.exists() {
            tokio::fs::remove_file(&self.settings_file).await?;
        }

        Ok(())
    }
}
