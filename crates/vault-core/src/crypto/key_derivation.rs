//! Obfuscation key derivation using HMAC-SHA256
//!
//! The key that protects the in-memory passphrase is never stored. It is
//! recomputed from the session key and salt every time a cipher is built.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::CipherKey;

type HmacSha256 = Hmac<Sha256>;

/// Derive the 256-bit obfuscation cipher key from the session secrets
///
/// # Arguments
/// * `session_key` - Random per-process key, used as the HMAC key
/// * `session_salt` - Random per-process salt, used as the HMAC message
pub fn derive_cipher_key(session_key: &[u8], session_salt: &[u8]) -> CipherKey {
    // HMAC accepts keys of any length
    let mut mac = <HmacSha256 as Mac>::new_from_slice(session_key)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(session_salt);

    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&mac.finalize().into_bytes());

    CipherKey::new(key_bytes)
}
