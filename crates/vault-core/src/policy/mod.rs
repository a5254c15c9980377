//! Password policies
//!
//! This module provides:
//! - The canonical [`PasswordPolicy`] value type and its validation
//! - The 19-character hex codec used to persist a policy
//! - The named policy list stored alongside a database

pub mod codec;
mod describe;
mod flags;
mod named;
mod types;

pub use codec::PolicyDecodeError;
pub use describe::PolicyRow;
pub use flags::PolicyFlags;
pub use named::NamedPolicies;
pub use types::{PasswordPolicy, PolicyLimits, PolicyViolation, DEFAULT_FIELD_MAX};
