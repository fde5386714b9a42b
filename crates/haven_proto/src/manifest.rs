//! `.haven` export manifest — the single structured record describing
//! everything an archive contains.
//!
//! Field order here is the JSON key order a freshly-built manifest is
//! serialised in before canonicalization re-sorts the top level; `files`
//! keeps insertion order (the order the builder added entries in), not
//! alphabetical, since canonicalization only touches the top level.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: u32 = 1;
pub const MANIFEST_FORMAT: &str = "haven-export";

/// What an archive was exported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Server,
    Channel,
    Dm,
}

/// Who produced the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedBy {
    pub user_id: String,
    pub username: String,
    /// Base64-encoded Ed25519 public key.
    pub identity_key: String,
}

/// Per-file integrity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Lowercase hex SHA-256.
    pub sha256: String,
    pub size: u64,
}

/// Inclusive date range covered by the exported messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// The manifest stored at `manifest.json` inside a `.haven` archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HavenManifest {
    pub version: u32,
    pub format: String,
    pub exported_by: ExportedBy,
    pub exported_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    pub instance_url: String,
    /// Path (relative to the archive root) -> integrity record. Excludes
    /// `manifest.json` itself.
    pub files: IndexMap<String, FileEntry>,
    pub message_count: u64,
    pub date_range: DateRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_signature: Option<String>,
}

impl HavenManifest {
    /// Replace a path's file entry, keeping first-insertion order for
    /// existing paths (matches the `files` map's documented semantics).
    pub fn insert_file(&mut self, path: String, entry: FileEntry) {
        self.files.insert(path, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HavenManifest {
        HavenManifest {
            version: MANIFEST_VERSION,
            format: MANIFEST_FORMAT.to_string(),
            exported_by: ExportedBy {
                user_id: "u1".into(),
                username: "alice".into(),
                identity_key: "base64key".into(),
            },
            exported_at: "2026-01-01T00:00:00Z".parse().unwrap(),
            scope: Some(Scope::Channel),
            server_id: Some("srv1".into()),
            channel_id: Some("chan1".into()),
            instance_url: "https://haven.example".into(),
            files: IndexMap::new(),
            message_count: 0,
            date_range: DateRange {
                from: "2026-01-01T00:00:00Z".parse().unwrap(),
                to: "2026-01-02T00:00:00Z".parse().unwrap(),
            },
            user_signature: None,
            server_signature: None,
        }
    }

    #[test]
    fn omits_absent_optional_fields() {
        let m = sample();
        let v = serde_json::to_value(&m).unwrap();
        assert!(v.get("user_signature").is_none());
        assert!(v.get("server_signature").is_none());
    }

    #[test]
    fn files_preserve_insertion_order() {
        let mut m = sample();
        m.insert_file("channels/b.json".into(), FileEntry { sha256: "b".into(), size: 1 });
        m.insert_file("channels/a.json".into(), FileEntry { sha256: "a".into(), size: 2 });
        let keys: Vec<_> = m.files.keys().collect();
        assert_eq!(keys, vec!["channels/b.json", "channels/a.json"]);
    }

    #[test]
    fn roundtrips_through_json() {
        let m = sample();
        let json = serde_json::to_string(&m).unwrap();
        let back: HavenManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
