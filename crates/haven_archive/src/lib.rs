//! haven_archive — signed `.haven` export archive
//!
//! Builds and reads the ZIP container that packages channel/DM history,
//! server metadata, and attachments into one verifiable blob: per-file
//! SHA-256 integrity hashes plus a detached Ed25519 signature over a
//! canonical manifest.
//!
//! # Module layout
//! - `builder`   — accumulate blobs, compute manifest, sign, pack
//! - `reader`    — unpack, parse manifest, typed accessors, verify
//! - `canonical` — deterministic manifest signing bytes + sign/verify
//! - `zip_io`    — ZIP container framing
//! - `error`     — unified error type

pub mod builder;
pub mod canonical;
pub mod error;
pub mod reader;
pub mod zip_io;

pub use builder::ArchiveBuilder;
pub use error::ArchiveError;
pub use reader::{ArchiveReader, VerifyResult};
