//! Archive reader: unpacks a `.haven` blob, parses the manifest, and offers
//! typed accessors plus integrity verification.

use haven_crypto::hash::compute_file_hash;
use haven_crypto::identity::IdentityPublicKey;
use haven_proto::{slugify, HavenManifest};
use indexmap::IndexMap;
use serde_json::Value;

use crate::canonical::verify_manifest;
use crate::error::ArchiveError;
use crate::zip_io;

/// Result of `ArchiveReader::verify`. Never carries an error — every
/// integrity problem found accumulates as a string instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    pub valid: bool,
    pub issues: Vec<String>,
}

pub struct ArchiveReader {
    manifest: HavenManifest,
    blobs: IndexMap<String, Vec<u8>>,
}

impl ArchiveReader {
    pub fn from_blob(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let blobs = zip_io::unpack(bytes)?;
        let manifest_bytes = blobs.get("manifest.json").ok_or(ArchiveError::MissingManifest)?;
        let manifest: HavenManifest = serde_json::from_slice(manifest_bytes)?;
        tracing::info!(files = blobs.len(), "opened haven export archive");
        Ok(Self { manifest, blobs })
    }

    pub fn manifest(&self) -> &HavenManifest {
        &self.manifest
    }

    /// Look up a channel export by name, trying `channels/` then `dms/`.
    pub fn get_channel_export(&self, name: &str) -> Option<&[u8]> {
        let slug = slugify(name);
        self.blobs
            .get(&format!("channels/{slug}.json"))
            .or_else(|| self.blobs.get(&format!("dms/{slug}.json")))
            .map(Vec::as_slice)
    }

    /// Every `channels/*.json` and `dms/*.json` entry, parsed. Malformed
    /// entries are skipped silently.
    pub fn get_channel_exports(&self) -> Vec<(String, Value)> {
        self.blobs
            .iter()
            .filter(|(path, _)| path.starts_with("channels/") || path.starts_with("dms/"))
            .filter_map(|(path, bytes)| serde_json::from_slice(bytes).ok().map(|v| (path.clone(), v)))
            .collect()
    }

    pub fn get_server_meta(&self) -> Option<Value> {
        self.blobs.get("server.json").and_then(|b| serde_json::from_slice(b).ok())
    }

    /// The audit log is schema-free: returned as whatever JSON value the
    /// builder was given, unvalidated.
    pub fn get_audit_log(&self) -> Option<Value> {
        self.blobs.get("audit-log.json").and_then(|b| serde_json::from_slice(b).ok())
    }

    pub fn get_attachment(&self, full_path: &str) -> Option<&[u8]> {
        self.blobs.get(full_path).map(Vec::as_slice)
    }

    /// Check every file's size and hash against the manifest, and the
    /// manifest's signature if present. Never raises; all problems
    /// accumulate as strings.
    pub fn verify(&self) -> VerifyResult {
        let mut issues = Vec::new();

        for (path, entry) in &self.manifest.files {
            match self.blobs.get(path) {
                None => issues.push(format!("Missing file: {path}")),
                Some(data) => {
                    if data.len() as u64 != entry.size {
                        issues.push(format!(
                            "Size mismatch for {path}: expected {}, got {}",
                            entry.size,
                            data.len()
                        ));
                    }
                    let actual = compute_file_hash(data);
                    if actual != entry.sha256 {
                        issues.push(format!(
                            "Hash mismatch for {path}: expected {}, got {actual}",
                            entry.sha256
                        ));
                    }
                }
            }
        }

        if let Some(sig) = &self.manifest.user_signature {
            match IdentityPublicKey::from_b64(&self.manifest.exported_by.identity_key) {
                Ok(public) => {
                    if !verify_manifest(&self.manifest, sig, &public) {
                        issues.push("user_signature does not verify against exported_by.identity_key".to_string());
                    }
                }
                Err(e) => issues.push(format!("exported_by.identity_key is not a valid identity key: {e}")),
            }
        }

        VerifyResult { valid: issues.is_empty(), issues }
    }
}
