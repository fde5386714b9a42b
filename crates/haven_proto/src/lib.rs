//! haven_proto — wire types for the `.haven` export archive
//!
//! Pure data definitions and the one naming convention the archive format
//! pins (channel/DM slugging). Structural JSON encode/decode is `serde`'s
//! job; crypto lives in `haven_crypto`; ZIP packing and canonical signing
//! live in `haven_archive`.
//!
//! # Modules
//! - `manifest` — `HavenManifest` and its nested record types
//! - `slug`     — channel/DM name to archive-path slugging

pub mod manifest;
pub mod slug;

pub use manifest::{DateRange, ExportedBy, FileEntry, HavenManifest, Scope, MANIFEST_FORMAT, MANIFEST_VERSION};
pub use slug::slugify;
