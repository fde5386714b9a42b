//! Sender-key group-messaging ratchet.
//!
//! One participant encrypts a message once; every group member decrypts
//! independently from a shared symmetric chain key. No DH ratchet step, so
//! forward secrecy is limited to "an old chain key cannot be recovered from
//! a newer one" — there is no post-compromise healing (see crate docs).

use rand::rngs::OsRng;
use rand_core::RngCore;
use zeroize::ZeroizeOnDrop;

use crate::error::CryptoError;
use crate::secretbox;

/// Upper bound on how many chain steps a single decrypt may skip. Bounds
/// the cost of handling out-of-order or dropped wire messages.
pub const MAX_SKIP: u64 = 256;

/// Wire message type tag for a sender-key ciphertext frame.
pub const WIRE_TYPE: u8 = 0x03;

const DIST_ID_LEN: usize = 16;
const CHAIN_KEY_LEN: usize = 32;
const NONCE_LEN: usize = secretbox::NONCE_LEN;
/// `type(1) + distribution_id(16) + chain_index(4) + nonce(24)`.
const WIRE_HEADER_LEN: usize = 1 + DIST_ID_LEN + 4 + NONCE_LEN;
/// `distribution_id(16) + chain_key(32) + chain_index(4)`.
pub const SKDM_PAYLOAD_LEN: usize = DIST_ID_LEN + CHAIN_KEY_LEN + 4;

/// Sender-side chain state. Advances on every `sender_key_encrypt` call.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SenderKeyState {
    #[zeroize(skip)]
    pub distribution_id: [u8; DIST_ID_LEN],
    chain_key: [u8; CHAIN_KEY_LEN],
    #[zeroize(skip)]
    pub chain_index: u32,
}

/// Receiver-side chain state for one remote sender's distribution. Identical
/// shape to `SenderKeyState`; kept as a distinct type so sender/receiver
/// roles can't be confused at the call site.
#[derive(Clone, ZeroizeOnDrop)]
pub struct ReceivedSenderKey {
    #[zeroize(skip)]
    pub distribution_id: [u8; DIST_ID_LEN],
    chain_key: [u8; CHAIN_KEY_LEN],
    #[zeroize(skip)]
    pub chain_index: u32,
}

/// A parsed SKDM payload.
pub struct SkdmPayload {
    pub distribution_id: [u8; DIST_ID_LEN],
    pub chain_key: [u8; CHAIN_KEY_LEN],
    pub chain_index: u32,
}

/// Create a fresh sender-key state: random distribution id, random chain
/// key, chain index 0.
pub fn generate_sender_key() -> SenderKeyState {
    let mut distribution_id = [0u8; DIST_ID_LEN];
    let mut chain_key = [0u8; CHAIN_KEY_LEN];
    OsRng.fill_bytes(&mut distribution_id);
    OsRng.fill_bytes(&mut chain_key);
    SenderKeyState { distribution_id, chain_key, chain_index: 0 }
}

impl SenderKeyState {
    /// Deep-copy this sender's state into receiver state at index 0, so a
    /// sender who is also a group member can decrypt its own messages.
    /// Must be called immediately after `generate_sender_key`, before any
    /// `sender_key_encrypt` call mutates `self`.
    pub fn clone_as_receiver(&self) -> ReceivedSenderKey {
        ReceivedSenderKey {
            distribution_id: self.distribution_id,
            chain_key: self.chain_key,
            chain_index: 0,
        }
    }
}

/// Two HMAC-SHA-256 derivations over the current chain key, keyed by a
/// one-byte domain separator: `0x01` for the message key, `0x02` for the
/// next chain key.
fn kdf_ck(chain_key: &[u8; CHAIN_KEY_LEN]) -> ([u8; CHAIN_KEY_LEN], [u8; CHAIN_KEY_LEN]) {
    use hmac::{Hmac, Mac};
    type HmacSha256 = Hmac<sha2::Sha256>;

    let message_key = {
        let mut mac = HmacSha256::new_from_slice(chain_key).expect("HMAC accepts any key length");
        mac.update(&[0x01]);
        let out = mac.finalize().into_bytes();
        let mut buf = [0u8; CHAIN_KEY_LEN];
        buf.copy_from_slice(&out);
        buf
    };
    let next_chain_key = {
        let mut mac = HmacSha256::new_from_slice(chain_key).expect("HMAC accepts any key length");
        mac.update(&[0x02]);
        let out = mac.finalize().into_bytes();
        let mut buf = [0u8; CHAIN_KEY_LEN];
        buf.copy_from_slice(&out);
        buf
    };
    (message_key, next_chain_key)
}

/// Serialize `state` into the fixed 52-byte SKDM payload:
/// `distribution_id(16) || chain_key(32) || chain_index(4, LE)`.
pub fn create_skdm_payload(state: &SenderKeyState) -> [u8; SKDM_PAYLOAD_LEN] {
    let mut out = [0u8; SKDM_PAYLOAD_LEN];
    out[..DIST_ID_LEN].copy_from_slice(&state.distribution_id);
    out[DIST_ID_LEN..DIST_ID_LEN + CHAIN_KEY_LEN].copy_from_slice(&state.chain_key);
    out[DIST_ID_LEN + CHAIN_KEY_LEN..].copy_from_slice(&state.chain_index.to_le_bytes());
    out
}

/// Parse an SKDM payload. Accepts any length >= 52, ignoring trailing bytes.
pub fn parse_skdm_payload(bytes: &[u8]) -> Result<SkdmPayload, CryptoError> {
    if bytes.len() < SKDM_PAYLOAD_LEN {
        return Err(CryptoError::SkdmTooShort(bytes.len()));
    }
    let mut distribution_id = [0u8; DIST_ID_LEN];
    distribution_id.copy_from_slice(&bytes[..DIST_ID_LEN]);
    let mut chain_key = [0u8; CHAIN_KEY_LEN];
    chain_key.copy_from_slice(&bytes[DIST_ID_LEN..DIST_ID_LEN + CHAIN_KEY_LEN]);
    let mut index_bytes = [0u8; 4];
    index_bytes.copy_from_slice(&bytes[DIST_ID_LEN + CHAIN_KEY_LEN..SKDM_PAYLOAD_LEN]);
    Ok(SkdmPayload { distribution_id, chain_key, chain_index: u32::from_le_bytes(index_bytes) })
}

impl ReceivedSenderKey {
    /// Build receiver state directly from a parsed SKDM payload.
    pub fn from_skdm(payload: &SkdmPayload) -> Self {
        Self {
            distribution_id: payload.distribution_id,
            chain_key: payload.chain_key,
            chain_index: payload.chain_index,
        }
    }
}

/// Encrypt `plaintext` under `state`'s current chain step, advancing the
/// chain by one. Returns the framed wire message:
/// `0x03 || distribution_id || chain_index(LE) || nonce || ciphertext+tag`.
pub fn sender_key_encrypt(state: &mut SenderKeyState, plaintext: &[u8]) -> Vec<u8> {
    let index = state.chain_index;
    let (message_key, next_chain_key) = kdf_ck(&state.chain_key);

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    let ciphertext = secretbox::encrypt(&message_key, &nonce, plaintext);

    state.chain_key = next_chain_key;
    state.chain_index = index + 1;

    let mut wire = Vec::with_capacity(WIRE_HEADER_LEN + ciphertext.len());
    wire.push(WIRE_TYPE);
    wire.extend_from_slice(&state.distribution_id);
    wire.extend_from_slice(&index.to_le_bytes());
    wire.extend_from_slice(&nonce);
    wire.extend_from_slice(&ciphertext);
    wire
}

/// Decrypt a wire message against `received`, advancing it to the message's
/// index (skipping forward as needed, bounded by `MAX_SKIP`).
pub fn sender_key_decrypt(wire: &[u8], received: &mut ReceivedSenderKey) -> Result<Vec<u8>, CryptoError> {
    if wire.len() < WIRE_HEADER_LEN {
        return Err(CryptoError::DecryptFailed);
    }
    if wire[0] != WIRE_TYPE {
        return Err(CryptoError::WrongType(wire[0]));
    }
    if wire[1..1 + DIST_ID_LEN] != received.distribution_id {
        return Err(CryptoError::DistIdMismatch);
    }

    let mut index_bytes = [0u8; 4];
    index_bytes.copy_from_slice(&wire[1 + DIST_ID_LEN..1 + DIST_ID_LEN + 4]);
    let target_index = u32::from_le_bytes(index_bytes);

    let skip = target_index as i64 - received.chain_index as i64;
    if skip < 0 {
        return Err(CryptoError::AlreadyConsumed);
    }
    let skip = skip as u64;
    if skip > MAX_SKIP {
        return Err(CryptoError::TooManySkipped { max: MAX_SKIP, requested: skip });
    }

    let mut message_key = [0u8; CHAIN_KEY_LEN];
    for _ in 0..=skip {
        let (mk, next_ck) = kdf_ck(&received.chain_key);
        message_key = mk;
        received.chain_key = next_ck;
        received.chain_index += 1;
    }

    let nonce_start = 1 + DIST_ID_LEN + 4;
    let nonce_end = nonce_start + NONCE_LEN;
    let nonce: [u8; NONCE_LEN] = wire[nonce_start..nonce_end]
        .try_into()
        .expect("slice length matches NONCE_LEN by construction");
    let ciphertext = &wire[nonce_end..];

    secretbox::decrypt(&message_key, &nonce, ciphertext)
}
