//! Secure memory handling with automatic zeroization

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte written over a secret before it is zeroed and released.
const TRASH_BYTE: u8 = 0xFF;

/// Obfuscation cipher key - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CipherKey {
    key: [u8; 32],
}

impl CipherKey {
    /// Create a new cipher key from raw bytes
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Get the key bytes (use carefully - avoid copying)
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Scoped secret byte buffer.
///
/// Every temporary that holds plaintext, padding or ciphertext of the master
/// passphrase lives in one of these, so the bytes are wiped on every exit
/// path, including early returns and unwinding.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretBuffer {
    bytes: Vec<u8>,
}

impl SecretBuffer {
    /// Allocate a buffer of `len` zero bytes
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len],
        }
    }

    /// Allocate an empty buffer that can hold `capacity` bytes without
    /// reallocating (a reallocation would leave an unscrubbed copy behind)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Copy a slice into a new buffer
    pub fn from_slice(slice: &[u8]) -> Self {
        let mut buffer = Self::with_capacity(slice.len());
        buffer.bytes.extend_from_slice(slice);
        buffer
    }

    /// Append bytes. Callers size the buffer up front with `with_capacity`.
    pub fn extend_from_slice(&mut self, slice: &[u8]) {
        debug_assert!(self.bytes.len() + slice.len() <= self.bytes.capacity());
        self.bytes.extend_from_slice(slice);
    }

    /// Get the bytes (use carefully)
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the bytes mutably
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Overwrite the contents with the trash pattern, zero them and release
    /// the allocation.
    pub fn trash(&mut self) {
        self.bytes.iter_mut().for_each(|b| *b = TRASH_BYTE);
        self.bytes.zeroize();
        self.bytes = Vec::new();
    }
}

impl std::fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Decrypted or generated secret value - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    /// Create a new secret string
    pub fn new(value: String) -> Self {
        Self { value }
    }

    /// Get the secret value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Number of characters (not bytes) in the secret
    pub fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// Consume and return the inner value
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.value)
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}
