//! Obfuscated in-memory holder for a database's master passphrase
//!
//! The passphrase is kept encrypted under a key derived from the process
//! [`SessionKeystore`], 8 bytes at a time, with the final partial block zero
//! padded. This keeps it out of naive memory scans. It is not a defense
//! against anyone who can attach a debugger: the key material lives in the
//! same address space and there is no authentication tag.
//!
//! A payload whose trailing bytes are zero is indistinguishable from padding
//! at the block level; the separately kept `plain_len` is what recovers it.

use std::marker::PhantomData;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::crypto::{Block, BlockCipher, BlowfishCipher, SecretBuffer, SecretString, BLOCK_SIZE};
use crate::error::{Result, VaultError};
use crate::session::SessionKeystore;

/// Round `len` up to a whole number of cipher blocks
fn block_len(len: usize) -> usize {
    len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Scoped single-block scratch buffer, zeroed on drop
struct ScratchBlock(SecretBuffer);

impl ScratchBlock {
    fn new() -> Self {
        Self(SecretBuffer::zeroed(BLOCK_SIZE))
    }

    fn block(&mut self) -> &mut Block {
        self.0
            .as_mut_bytes()
            .try_into()
            .unwrap_or_else(|_| unreachable!("scratch block is BLOCK_SIZE bytes"))
    }
}

/// Holder of one obfuscated passphrase
pub struct MasterKeyBox<C: BlockCipher = BlowfishCipher> {
    keystore: Arc<SessionKeystore>,
    ciphertext: SecretBuffer,
    plain_len: usize,
    _cipher: PhantomData<C>,
}

impl MasterKeyBox<BlowfishCipher> {
    /// Create an empty box bound to a keystore, using Blowfish
    pub fn new(keystore: Arc<SessionKeystore>) -> Self {
        Self::with_cipher(keystore)
    }
}

impl<C: BlockCipher> MasterKeyBox<C> {
    /// Create an empty box bound to a keystore with a chosen block cipher
    pub fn with_cipher(keystore: Arc<SessionKeystore>) -> Self {
        Self {
            keystore,
            ciphertext: SecretBuffer::default(),
            plain_len: 0,
            _cipher: PhantomData,
        }
    }

    /// Replace the held passphrase. Any previous ciphertext is trashed first.
    pub fn set(&mut self, plaintext: &[u8]) {
        self.ciphertext.trash();
        self.plain_len = plaintext.len();
        self.ciphertext = self.encrypt(plaintext);
    }

    /// Convenience wrapper for [`set`](Self::set) on a string passphrase
    pub fn set_passphrase(&mut self, passphrase: &str) {
        self.set(passphrase.as_bytes());
    }

    /// Recover the held passphrase. Padding is never returned.
    pub fn get(&self) -> SecretBuffer {
        let cipher = C::new(&self.keystore.cipher_key());
        let mut plaintext = SecretBuffer::with_capacity(self.plain_len);
        let mut scratch = ScratchBlock::new();

        for (index, chunk) in self.ciphertext.as_bytes().chunks(BLOCK_SIZE).enumerate() {
            let block = scratch.block();
            block.copy_from_slice(chunk);
            cipher.decrypt_block(block);

            let wanted = (self.plain_len - index * BLOCK_SIZE).min(BLOCK_SIZE);
            plaintext.extend_from_slice(&block[..wanted]);
            block.fill(0);
        }

        plaintext
    }

    /// Recover the held passphrase as a string
    pub fn passphrase(&self) -> Result<SecretString> {
        let bytes = self.get();
        let text = std::str::from_utf8(bytes.as_bytes()).map_err(|_| VaultError::InvalidUtf8)?;
        Ok(SecretString::new(text.to_owned()))
    }

    /// Whether `candidate` equals the held passphrase. Compares ciphertexts
    /// in constant time, so the held value is never decrypted.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        if candidate.len() != self.plain_len {
            return false;
        }
        let encrypted = self.encrypt(candidate);
        encrypted
            .as_bytes()
            .ct_eq(self.ciphertext.as_bytes())
            .into()
    }

    /// Zero and release the ciphertext
    pub fn clear(&mut self) {
        self.ciphertext.trash();
        self.plain_len = 0;
    }

    /// Length of the held passphrase in bytes
    pub fn len(&self) -> usize {
        self.plain_len
    }

    pub fn is_empty(&self) -> bool {
        self.plain_len == 0
    }

    fn encrypt(&self, plaintext: &[u8]) -> SecretBuffer {
        let cipher = C::new(&self.keystore.cipher_key());
        let mut ciphertext = SecretBuffer::with_capacity(block_len(plaintext.len()));
        let mut scratch = ScratchBlock::new();

        for chunk in plaintext.chunks(BLOCK_SIZE) {
            let block = scratch.block();
            block.fill(0);
            block[..chunk.len()].copy_from_slice(chunk);
            cipher.encrypt_block(block);
            ciphertext.extend_from_slice(&block[..]);
        }

        ciphertext
    }
}

impl<C: BlockCipher> std::fmt::Debug for MasterKeyBox<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKeyBox")
            .field("plain_len", &self.plain_len)
            .field("ciphertext", &"[REDACTED]")
            .finish()
    }
}
