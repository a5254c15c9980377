//! 8-byte block cipher used to obfuscate the master passphrase in memory
//!
//! The cipher is only required to round-trip within one process for one
//! [`SessionKeystore`](crate::session::SessionKeystore). It is not used for
//! anything that is written to disk.

use blowfish::cipher::generic_array::GenericArray;
use blowfish::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use blowfish::Blowfish;

use super::CipherKey;

/// Block size of every obfuscation cipher, in bytes
pub const BLOCK_SIZE: usize = 8;

/// A single obfuscation block
pub type Block = [u8; BLOCK_SIZE];

/// Keyed cipher over 8-byte blocks
pub trait BlockCipher: Sized {
    /// Build a cipher instance from a derived key
    fn new(key: &CipherKey) -> Self;

    /// Encrypt one block in place
    fn encrypt_block(&self, block: &mut Block);

    /// Decrypt one block in place
    fn decrypt_block(&self, block: &mut Block);
}

/// Blowfish (big-endian block layout) with a 256-bit key
pub struct BlowfishCipher {
    inner: Blowfish,
}

impl BlockCipher for BlowfishCipher {
    fn new(key: &CipherKey) -> Self {
        // Blowfish takes 4..=56 byte keys
        let inner = <Blowfish as KeyInit>::new_from_slice(key.as_bytes())
            .unwrap_or_else(|_| unreachable!("32-byte key is within the Blowfish key range"));
        Self { inner }
    }

    fn encrypt_block(&self, block: &mut Block) {
        self.inner
            .encrypt_block(GenericArray::from_mut_slice(block.as_mut_slice()));
    }

    fn decrypt_block(&self, block: &mut Block) {
        self.inner
            .decrypt_block(GenericArray::from_mut_slice(block.as_mut_slice()));
    }
}

impl std::fmt::Debug for BlowfishCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlowfishCipher")
            .field("schedule", &"[REDACTED]")
            .finish()
    }
}
