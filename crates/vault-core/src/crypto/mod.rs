//! Cryptographic primitives for in-memory passphrase obfuscation
//!
//! This module provides:
//! - An 8-byte block cipher abstraction with a Blowfish implementation
//! - HMAC-SHA256 derivation of the obfuscation key
//! - The random source used by the keystore and the password generator
//! - Secure memory handling with zeroize

mod cipher;
mod key_derivation;
mod random;
mod secure_memory;

pub use cipher::{Block, BlockCipher, BlowfishCipher, BLOCK_SIZE};
pub use key_derivation::derive_cipher_key;
pub use random::RandomSource;
pub use secure_memory::{CipherKey, SecretBuffer, SecretString};
