//! SKDM Envelope — anonymous sealed-box encryption of sender-key
//! distribution messages to a recipient's long-term identity key.
//!
//! Ed25519 keys are birationally converted to X25519 so the same identity
//! key that signs archives can also receive sealed boxes, without a
//! separate X25519 prekey.

use crypto_box::{PublicKey as BoxPublicKey, SealedBox, SecretKey as BoxSecretKey};
use curve25519_dalek::edwards::CompressedEdwardsY;
use rand::rngs::OsRng;
use sha2::{Digest, Sha512};

use crate::error::CryptoError;
use crate::identity::{IdentityKeyPair, IdentityPublicKey};

/// Convert an Ed25519 public key to its birationally equivalent X25519
/// public key (Edwards curve point -> Montgomery u-coordinate).
pub fn ed25519_pub_to_x25519(ed_pub: &[u8; 32]) -> Result<x25519_dalek::PublicKey, CryptoError> {
    let edwards_point = CompressedEdwardsY(*ed_pub)
        .decompress()
        .ok_or_else(|| CryptoError::InvalidKey("not a valid Ed25519 curve point".into()))?;
    Ok(x25519_dalek::PublicKey::from(edwards_point.to_montgomery().to_bytes()))
}

/// Convert an Ed25519 secret key to its corresponding X25519 secret key via
/// clamped SHA-512 expansion (the same derivation `ed25519-dalek` uses
/// internally to turn a seed into a scalar).
pub fn ed25519_secret_to_x25519(ed_secret: &[u8; 32]) -> x25519_dalek::StaticSecret {
    let expanded = Sha512::digest(ed_secret);
    let mut clamped = [0u8; 32];
    clamped.copy_from_slice(&expanded[..32]);
    clamped[0] &= 248;
    clamped[31] &= 127;
    clamped[31] |= 64;
    x25519_dalek::StaticSecret::from(clamped)
}

/// Seal `payload` (the 52-byte SKDM) so only `recipient` can open it.
/// Ciphertext is `payload.len() + 48` bytes: an ephemeral X25519 public key
/// (32 bytes) plus a Poly1305 tag (16 bytes).
pub fn encrypt_skdm(payload: &[u8], recipient: &IdentityPublicKey) -> Result<Vec<u8>, CryptoError> {
    let x25519_pub = ed25519_pub_to_x25519(recipient.as_bytes())?;
    let box_pub = BoxPublicKey::from(*x25519_pub.as_bytes());
    SealedBox::new(&box_pub)
        .encrypt(&mut OsRng, payload)
        .map_err(|_| CryptoError::InvalidKey("sealed-box encryption failed".into()))
}

/// Open a sealed SKDM addressed to `recipient`'s identity key.
/// Fails opaquely with `SkdmDecryptFailed` on wrong recipient or tampering.
pub fn decrypt_skdm(sealed: &[u8], recipient: &IdentityKeyPair) -> Result<Vec<u8>, CryptoError> {
    let x25519_secret = ed25519_secret_to_x25519(recipient.secret_bytes());
    let x25519_pub = x25519_dalek::PublicKey::from(&x25519_secret);
    let box_secret = BoxSecretKey::from(x25519_secret.to_bytes());
    let box_pub = BoxPublicKey::from(*x25519_pub.as_bytes());
    SealedBox::new(&box_pub)
        .decrypt(&box_secret, sealed)
        .map_err(|_| CryptoError::SkdmDecryptFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender_key::{create_skdm_payload, generate_sender_key};

    #[test]
    fn seal_and_open_roundtrip() {
        let recipient = IdentityKeyPair::generate();
        let state = generate_sender_key();
        let payload = create_skdm_payload(&state);

        let sealed = encrypt_skdm(&payload, &recipient.public).unwrap();
        assert_eq!(sealed.len(), payload.len() + 48);

        let opened = decrypt_skdm(&sealed, &recipient).unwrap();
        assert_eq!(opened, payload);
    }

    #[test]
    fn wrong_recipient_fails() {
        let recipient = IdentityKeyPair::generate();
        let bystander = IdentityKeyPair::generate();
        let state = generate_sender_key();
        let payload = create_skdm_payload(&state);

        let sealed = encrypt_skdm(&payload, &recipient.public).unwrap();
        let err = decrypt_skdm(&sealed, &bystander).unwrap_err();
        assert!(matches!(err, CryptoError::SkdmDecryptFailed));
    }

    #[test]
    fn ed25519_to_x25519_conversion_is_consistent() {
        let kp = IdentityKeyPair::generate();
        let pub_x25519 = ed25519_pub_to_x25519(kp.public.as_bytes()).unwrap();
        let secret_x25519 = ed25519_secret_to_x25519(kp.secret_bytes());
        let derived_pub = x25519_dalek::PublicKey::from(&secret_x25519);
        assert_eq!(pub_x25519.as_bytes(), derived_pub.as_bytes());
    }
}
