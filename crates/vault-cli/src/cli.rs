//! Command-line definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use vault_core::{PasswordPolicy, PolicyFlags};

/// PW Vault - password generation and policy tools
#[derive(Parser, Debug)]
#[command(name = "pw-vault")]
#[command(version)]
#[command(about = "PW Vault - password generation and policy tools")]
pub struct Cli {
    /// Directory holding settings.json
    #[arg(long, global = true, env = "VAULT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate passwords
    Generate(GenerateArgs),

    /// Encode, decode and manage password policies
    #[command(subcommand)]
    Policy(PolicyCommand),

    /// Check the strength of a passphrase read from the terminal
    Check,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Encoded 19-character policy
    #[arg(long, conflicts_with = "named")]
    pub policy: Option<String>,

    /// Name of a saved policy
    #[arg(long)]
    pub named: Option<String>,

    /// Number of passwords to print
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    #[command(flatten)]
    pub options: PolicyOptions,
}

#[derive(Subcommand, Debug)]
pub enum PolicyCommand {
    /// Validate a policy and print its 19-character encoding
    Encode(PolicyOptions),

    /// Print the fields of an encoded policy
    Decode {
        encoded: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a readable summary of an encoded policy
    Show { encoded: String },

    /// Save an encoded policy under a name
    Save { name: String, encoded: String },

    /// Remove a saved policy
    Remove { name: String },

    /// List saved policies
    List,

    /// Make an encoded policy the default
    SetDefault { encoded: String },
}

/// Policy built from individual options. Passing a category option without a
/// value enables it with no minimum.
#[derive(Args, Debug, Default, Clone)]
pub struct PolicyOptions {
    /// Password length
    #[arg(short, long)]
    pub length: Option<u16>,

    /// Use lowercase letters, with an optional minimum count
    #[arg(long, num_args = 0..=1, default_missing_value = "0", value_name = "MIN")]
    pub lower: Option<u16>,

    /// Use uppercase letters, with an optional minimum count
    #[arg(long, num_args = 0..=1, default_missing_value = "0", value_name = "MIN")]
    pub upper: Option<u16>,

    /// Use digits, with an optional minimum count
    #[arg(long, num_args = 0..=1, default_missing_value = "0", value_name = "MIN")]
    pub digits: Option<u16>,

    /// Use symbols, with an optional minimum count
    #[arg(long, num_args = 0..=1, default_missing_value = "0", value_name = "MIN")]
    pub symbols: Option<u16>,

    /// Symbol set replacing the built-in one
    #[arg(long, value_name = "CHARS")]
    pub symbol_set: Option<String>,

    /// Hexadecimal digits only
    #[arg(long)]
    pub hex: bool,

    /// Avoid look-alike characters
    #[arg(long)]
    pub easy_vision: bool,

    /// Pronounceable syllables
    #[arg(long)]
    pub pronounceable: bool,
}

impl PolicyOptions {
    /// Whether any option besides the length was given
    pub fn selects_characters(&self) -> bool {
        self.lower.is_some()
            || self.upper.is_some()
            || self.digits.is_some()
            || self.symbols.is_some()
            || self.hex
            || self.easy_vision
            || self.pronounceable
    }

    /// Build a policy, taking the length from `default_length` when unset.
    /// Returns the default-policy sentinel when no character option is given.
    pub fn to_policy(&self, default_length: u16) -> PasswordPolicy {
        if !self.selects_characters() {
            return PasswordPolicy::empty();
        }

        let mut policy = PasswordPolicy::new(self.length.unwrap_or(default_length));
        if let Some(min) = self.lower {
            policy = policy.with_lowercase(min);
        }
        if let Some(min) = self.upper {
            policy = policy.with_uppercase(min);
        }
        if let Some(min) = self.digits {
            policy = policy.with_digits(min);
        }
        if let Some(min) = self.symbols {
            policy = policy.with_symbols(min);
        }
        if self.hex {
            policy = policy.with_hex_digits();
        }
        if self.easy_vision {
            policy.flags.insert(PolicyFlags::USE_EASY_VISION);
        }
        if self.pronounceable {
            policy = policy.pronounceable();
        }
        if let Some(symbols) = &self.symbol_set {
            policy = policy.with_custom_symbols(symbols.clone());
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_category_flag_means_no_minimum() {
        let cli = Cli::parse_from(["pw-vault", "policy", "encode", "--length", "10", "--lower", "--digits", "2"]);
        let Command::Policy(PolicyCommand::Encode(options)) = cli.command else {
            panic!("expected policy encode");
        };
        assert_eq!(options.lower, Some(0));
        assert_eq!(options.digits, Some(2));
        assert_eq!(options.upper, None);

        let policy = options.to_policy(12);
        assert_eq!(policy.flags.bits(), 0x0005);
        assert_eq!(policy.length, 10);
        assert_eq!(policy.digit_min, 2);
    }

    #[test]
    fn test_no_character_options_yields_sentinel() {
        let options = PolicyOptions {
            length: Some(30),
            ..PolicyOptions::default()
        };
        assert!(options.to_policy(12).is_default_sentinel());
    }

    #[test]
    fn test_policy_conflicts_with_named() {
        let result = Cli::try_parse_from([
            "pw-vault", "generate", "--policy", "000700C002003000002", "--named", "PIN",
        ]);
        assert!(result.is_err());
    }
}
