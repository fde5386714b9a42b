use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("SKDM payload too short: need at least 52 bytes, got {0}")]
    SkdmTooShort(usize),

    #[error("SKDM decryption failed (wrong recipient or tampering)")]
    SkdmDecryptFailed,

    #[error("Unexpected wire message type: {0:#x}")]
    WrongType(u8),

    #[error("Wire message distribution id does not match receiver state")]
    DistIdMismatch,

    #[error("Message index already consumed by this receiver")]
    AlreadyConsumed,

    #[error("Too many skipped chain steps (max {max}, requested {requested})")]
    TooManySkipped { max: u64, requested: u64 },

    #[error("Message decryption failed (authentication tag mismatch — possible tampering)")]
    DecryptFailed,

    #[error("Signature verification failed")]
    SignatureVerification,

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
