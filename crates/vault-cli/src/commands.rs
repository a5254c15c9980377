//! Command implementations
//!
//! Each command writes its output to the given writer so it can be driven
//! from tests.

use anyhow::{anyhow, bail, Context, Result};
use std::io::Write;
use tracing::{debug, info};

use vault_core::generator::check_password;
use vault_core::policy::codec;
use vault_core::{PasswordPolicy, RandomSource, SettingsManager};

use crate::cli::{GenerateArgs, PolicyCommand, PolicyOptions};

/// Parse an encoded policy, reporting why it was rejected
fn parse_policy(encoded: &str, settings: &SettingsManager) -> Result<PasswordPolicy> {
    codec::try_decode_with_limits(encoded, settings.policy_limits())
        .with_context(|| format!("invalid policy string {:?}", encoded))
}

/// Build a policy from options and check it can be used
fn policy_from_options(options: &PolicyOptions, settings: &SettingsManager) -> Result<PasswordPolicy> {
    let default_length = settings.get().policy_defaults.length;
    let policy = options.to_policy(default_length);
    if policy.is_default_sentinel() {
        bail!("no character options given (use --lower, --upper, --digits, --symbols or --hex)");
    }
    let policy = policy.normalized();
    policy.validate(settings.policy_limits())?;
    Ok(policy)
}

pub fn generate<R: RandomSource + ?Sized>(
    args: &GenerateArgs,
    settings: &SettingsManager,
    rng: &mut R,
    out: &mut impl Write,
) -> Result<()> {
    let policy = if let Some(encoded) = &args.policy {
        parse_policy(encoded, settings)?
    } else if let Some(name) = &args.named {
        settings
            .named_policies()
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("no saved policy named {:?}", name))?
    } else if args.options.selects_characters() {
        policy_from_options(&args.options, settings)?
    } else {
        let mut policy = settings.default_policy();
        if let Some(length) = args.options.length {
            policy.length = length;
        }
        policy
    };

    let default = settings.default_policy();
    debug!(count = args.count, "Generating passwords");
    for _ in 0..args.count {
        let password = policy.make_random_password(&default, settings.policy_limits(), rng)?;
        writeln!(out, "{}", password.expose())?;
    }
    Ok(())
}

pub async fn policy_command(
    command: &PolicyCommand,
    settings: &mut SettingsManager,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        PolicyCommand::Encode(options) => {
            let policy = policy_from_options(options, settings)?;
            writeln!(out, "{}", codec::encode(&policy))?;
        }
        PolicyCommand::Decode { encoded, json } => {
            let policy = parse_policy(encoded, settings)?;
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&policy)?)?;
            } else {
                writeln!(out, "flags:      {:?}", policy.flags)?;
                writeln!(out, "length:     {}", policy.length)?;
                writeln!(out, "digit_min:  {}", policy.digit_min)?;
                writeln!(out, "lower_min:  {}", policy.lower_min)?;
                writeln!(out, "symbol_min: {}", policy.symbol_min)?;
                writeln!(out, "upper_min:  {}", policy.upper_min)?;
            }
        }
        PolicyCommand::Show { encoded } => {
            let policy = parse_policy(encoded, settings)?;
            for row in policy.describe() {
                writeln!(out, "{:<14} {}", row.label, row.value)?;
            }
        }
        PolicyCommand::Save { name, encoded } => {
            let policy = parse_policy(encoded, settings)?;
            settings.save_named_policy(name, &policy).await?;
            info!("Saved policy {:?}", name);
        }
        PolicyCommand::Remove { name } => {
            if !settings.remove_named_policy(name).await? {
                bail!("no saved policy named {:?}", name);
            }
            info!("Removed policy {:?}", name);
        }
        PolicyCommand::List => {
            for (name, policy) in settings.named_policies().iter() {
                writeln!(out, "{:<20} {}", name, codec::encode(policy))?;
            }
        }
        PolicyCommand::SetDefault { encoded } => {
            let policy = parse_policy(encoded, settings)?;
            settings.set_default_policy(&policy).await?;
            info!("Default policy set to {}", encoded);
        }
    }
    Ok(())
}

pub fn check(password: &str, out: &mut impl Write) -> Result<()> {
    match check_password(password) {
        Ok(()) => writeln!(out, "Password is strong enough")?,
        Err(weak) => bail!("weak password: {}", weak),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn manager() -> (SettingsManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        (SettingsManager::new(temp_dir.path()), temp_dir)
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_generate_with_encoded_policy() {
        let (settings, _temp) = manager();
        let mut rng = StdRng::seed_from_u64(1);
        let args = GenerateArgs {
            policy: Some("000700C002003000002".to_string()),
            named: None,
            count: 3,
            options: PolicyOptions::default(),
        };

        let mut out = Vec::new();
        generate(&args, &settings, &mut rng, &mut out).unwrap();

        let text = output(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            assert_eq!(line.chars().count(), 12);
            assert!(line.chars().filter(|c| c.is_ascii_digit()).count() >= 2);
        }
    }

    #[test]
    fn test_generate_defaults() {
        let (settings, _temp) = manager();
        let mut rng = StdRng::seed_from_u64(2);
        let args = GenerateArgs {
            policy: None,
            named: None,
            count: 1,
            options: PolicyOptions::default(),
        };

        let mut out = Vec::new();
        generate(&args, &settings, &mut rng, &mut out).unwrap();
        assert_eq!(output(out).trim_end().chars().count(), 12);
    }

    #[test]
    fn test_generate_rejects_bad_policy() {
        let (settings, _temp) = manager();
        let mut rng = StdRng::seed_from_u64(3);
        let args = GenerateArgs {
            policy: Some("zzz".to_string()),
            named: None,
            count: 1,
            options: PolicyOptions::default(),
        };

        let err = generate(&args, &settings, &mut rng, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("invalid policy string"));
    }

    #[tokio::test]
    async fn test_encode_and_show() {
        let (mut settings, _temp) = manager();
        let options = PolicyOptions {
            length: Some(12),
            lower: Some(3),
            upper: Some(2),
            digits: Some(2),
            ..PolicyOptions::default()
        };

        let mut out = Vec::new();
        policy_command(&PolicyCommand::Encode(options), &mut settings, &mut out)
            .await
            .unwrap();
        assert_eq!(output(out), "000700C002003000002\n");

        let mut out = Vec::new();
        let show = PolicyCommand::Show {
            encoded: "000700C002003000002".to_string(),
        };
        policy_command(&show, &mut settings, &mut out).await.unwrap();
        let text = output(out);
        assert!(text.contains("Lowercase"));
        assert!(text.contains("Yes (at least 3)"));
    }

    #[tokio::test]
    async fn test_encode_rejects_hex_mix() {
        let (mut settings, _temp) = manager();
        let options = PolicyOptions {
            hex: true,
            digits: Some(0),
            ..PolicyOptions::default()
        };

        let encode = PolicyCommand::Encode(options);
        let result = policy_command(&encode, &mut settings, &mut Vec::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_decode_json() {
        let (mut settings, _temp) = manager();
        let decode = PolicyCommand::Decode {
            encoded: "000700C002003000002".to_string(),
            json: true,
        };

        let mut out = Vec::new();
        policy_command(&decode, &mut settings, &mut out).await.unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["length"], 12);
        assert_eq!(value["lowerMin"], 3);
    }

    #[tokio::test]
    async fn test_save_list_generate_named() {
        let (mut settings, _temp) = manager();
        let save = PolicyCommand::Save {
            name: "PIN".to_string(),
            encoded: "0004006006000000000".to_string(),
        };
        policy_command(&save, &mut settings, &mut Vec::new()).await.unwrap();

        let mut out = Vec::new();
        policy_command(&PolicyCommand::List, &mut settings, &mut out).await.unwrap();
        assert!(output(out).contains("0004006006000000000"));

        let args = GenerateArgs {
            policy: None,
            named: Some("PIN".to_string()),
            count: 1,
            options: PolicyOptions::default(),
        };
        let mut rng = StdRng::seed_from_u64(4);
        let mut out = Vec::new();
        generate(&args, &settings, &mut rng, &mut out).unwrap();
        let pin = output(out);
        assert_eq!(pin.trim_end().len(), 6);
        assert!(pin.trim_end().chars().all(|c| c.is_ascii_digit()));

        let remove = PolicyCommand::Remove {
            name: "PIN".to_string(),
        };
        policy_command(&remove, &mut settings, &mut Vec::new()).await.unwrap();
        assert!(policy_command(&remove, &mut settings, &mut Vec::new()).await.is_err());
    }

    #[test]
    fn test_check() {
        let mut out = Vec::new();
        check("correct horse battery", &mut out).unwrap();
        assert!(output(out).contains("strong enough"));

        let err = check("short", &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("at least 8"));
    }
}
