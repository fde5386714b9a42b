//! haven_crypto — Haven sender-key ratchet cryptographic primitives
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited Rust crates.
//! - Zeroize all secret material on drop.
//! - Public APIs operate on fixed-size byte arrays and opaque newtypes to
//!   prevent accidental misuse (no raw key material floats around as `Vec<u8>`
//!   longer than it has to).
//!
//! # Module layout
//! - `identity`      — long-term Ed25519 identity keys + fingerprinting
//! - `sender_key`     — sender-key state, SKDM codec, ratchet engine, wire codec
//! - `skdm_envelope`  — anonymous sealed-box distribution of SKDMs
//! - `secretbox`      — XSalsa20-Poly1305 per-message encryption
//! - `hash`           — SHA-256 content hashing (archive integrity)
//! - `error`          — unified error type

pub mod error;
pub mod hash;
pub mod identity;
pub mod secretbox;
pub mod sender_key;
pub mod skdm_envelope;

pub use error::CryptoError;
