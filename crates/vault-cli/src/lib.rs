//! # vault-cli
//!
//! Command-line front end for vault-core: password generation, policy
//! encoding and passphrase strength checks.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command, GenerateArgs, PolicyCommand, PolicyOptions};
