//! XSalsa20-Poly1305 secretbox — per-message symmetric encryption.
//!
//! Thin wrapper so the ratchet engine never touches the `xsalsa20poly1305`
//! API directly. Key and nonce sizes are fixed by the type system, so
//! encryption itself cannot fail; only decryption can (tag mismatch).

use xsalsa20poly1305::aead::{Aead, KeyInit};
use xsalsa20poly1305::{Key, Nonce, XSalsa20Poly1305};

use crate::error::CryptoError;

pub const NONCE_LEN: usize = 24;

/// Encrypt `plaintext` under `key` with `nonce`. Returns ciphertext||tag.
pub fn encrypt(key: &[u8; 32], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Vec<u8> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key));
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .expect("encryption with valid key/nonce sizes cannot fail")
}

/// Decrypt `ciphertext` (ciphertext||tag) under `key` with `nonce`.
pub fn decrypt(key: &[u8; 32], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptFailed)
}
