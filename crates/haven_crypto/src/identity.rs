//! Identity key management
//!
//! A participant's long-term `IdentityKeyPair` (Ed25519) is the trust anchor
//! for two things in this crate: SKDM envelopes are sealed to a recipient's
//! identity public key (see `skdm_envelope`), and export archives are signed
//! with it (see `haven_archive`). Generation/storage policy for this key is
//! out of scope here; it is consumed as input.

use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier as _, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::error::CryptoError;

/// 32-byte Ed25519 public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityPublicKey(pub [u8; 32]);

impl IdentityPublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey(format!("public key must be 32 bytes, got {}", bytes.len())))?;
        // Reject non-canonical points up front rather than at first use.
        VerifyingKey::from_bytes(&arr).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Standard (not URL-safe) base64, matching the `identity_key` field on
    /// the wire in `HavenManifest.exported_by`.
    pub fn to_b64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn from_b64(s: &str) -> Result<Self, CryptoError> {
        let bytes = STANDARD.decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Human-readable fingerprint: SHA-256 of the public key, truncated to
    /// 20 bytes (160 bits), hex-encoded in groups of 4 for display.
    ///
    /// Example: "a1b2 c3d4 e5f6 7890 abcd ef01 2345 6789 0abc def0"
    pub fn fingerprint(&self) -> String {
        let hash = Sha256::digest(self.0);
        let hex = hex::encode(&hash[..20]);
        hex.chars()
            .collect::<Vec<_>>()
            .chunks(4)
            .map(|c| c.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Numeric fingerprint for QR codes: 12 groups of 5 digits (60 digits).
    pub fn numeric_fingerprint(&self) -> String {
        let hash = Sha256::digest(self.0);
        let bytes: &[u8] = &hash;
        let mut groups = Vec::with_capacity(12);
        for i in 0..12 {
            let offset = i * 5 / 2;
            let val = if i % 2 == 0 {
                ((bytes[offset] as u32) << 12)
                    | ((bytes[offset + 1] as u32) << 4)
                    | ((bytes[offset + 2] as u32) >> 4)
            } else {
                (((bytes[offset] & 0x0F) as u32) << 16)
                    | ((bytes[offset + 1] as u32) << 8)
                    | (bytes[offset + 2] as u32)
            };
            groups.push(format!("{:05}", val % 100_000));
        }
        groups.join(" ")
    }
}

/// Long-term identity signing key. Drop clears memory via `ZeroizeOnDrop`.
#[derive(ZeroizeOnDrop)]
pub struct IdentityKeyPair {
    #[zeroize(skip)]
    pub public: IdentityPublicKey,
    secret_bytes: [u8; 32],
}

impl IdentityKeyPair {
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let public = IdentityPublicKey(signing_key.verifying_key().to_bytes());
        Self { public, secret_bytes: signing_key.to_bytes() }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey(format!("identity key must be 32 bytes, got {}", bytes.len())))?;
        let signing_key = SigningKey::from_bytes(&arr);
        let public = IdentityPublicKey(signing_key.verifying_key().to_bytes());
        Ok(Self { public, secret_bytes: arr })
    }

    pub fn secret_bytes(&self) -> &[u8; 32] {
        &self.secret_bytes
    }

    fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.secret_bytes)
    }

    /// Sign arbitrary bytes; returns a 64-byte raw Ed25519 signature.
    pub fn sign(&self, msg: &[u8]) -> [u8; 64] {
        self.signing_key().sign(msg).to_bytes()
    }

    /// Verify a signature made by any Ed25519 public key.
    pub fn verify(public: &IdentityPublicKey, msg: &[u8], sig_bytes: &[u8]) -> Result<(), CryptoError> {
        let vk = VerifyingKey::from_bytes(&public.0).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let sig_arr: [u8; 64] = sig_bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("signature must be 64 bytes".into()))?;
        let sig = Signature::from_bytes(&sig_arr);
        vk.verify(msg, &sig).map_err(|_| CryptoError::SignatureVerification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let kp = IdentityKeyPair::generate();
        let sig = kp.sign(b"hello haven");
        IdentityKeyPair::verify(&kp.public, b"hello haven", &sig).unwrap();
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let kp = IdentityKeyPair::generate();
        let sig = kp.sign(b"hello haven");
        let err = IdentityKeyPair::verify(&kp.public, b"goodbye haven", &sig).unwrap_err();
        assert!(matches!(err, CryptoError::SignatureVerification));
    }

    #[test]
    fn fingerprint_is_deterministic_and_distinguishes_keys() {
        let kp1 = IdentityKeyPair::generate();
        let kp2 = IdentityKeyPair::generate();
        assert_eq!(kp1.public.fingerprint(), kp1.public.fingerprint());
        assert_ne!(kp1.public.fingerprint(), kp2.public.fingerprint());
        assert_ne!(kp1.public.numeric_fingerprint(), kp2.public.numeric_fingerprint());
    }

    #[test]
    fn public_key_b64_roundtrip() {
        let kp = IdentityKeyPair::generate();
        let encoded = kp.public.to_b64();
        let decoded = IdentityPublicKey::from_b64(&encoded).unwrap();
        assert_eq!(kp.public, decoded);
    }

    #[test]
    fn round_trips_through_bytes() {
        let kp = IdentityKeyPair::generate();
        let restored = IdentityKeyPair::from_bytes(kp.secret_bytes()).unwrap();
        assert_eq!(kp.public, restored.public);
    }
}
