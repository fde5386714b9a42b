//! Archive builder: accumulates blobs, computes the manifest, optionally
//! signs it, and packs everything into a ZIP.

use chrono::{DateTime, Utc};
use haven_crypto::hash::compute_file_hash;
use haven_crypto::identity::IdentityKeyPair;
use haven_proto::{slugify, DateRange, ExportedBy, FileEntry, HavenManifest, Scope, MANIFEST_FORMAT, MANIFEST_VERSION};
use indexmap::IndexMap;

use crate::canonical::sign_manifest;
use crate::error::ArchiveError;
use crate::zip_io;

/// Accumulates an export in memory before packing it into a `.haven` blob.
///
/// Archive metadata (who exported it, from where, what scope) is supplied
/// through this constructor rather than an external config file — there is
/// nothing here that needs to vary across environments.
pub struct ArchiveBuilder {
    exported_by: ExportedBy,
    instance_url: String,
    scope: Option<Scope>,
    server_id: Option<String>,
    channel_id: Option<String>,
    channels: IndexMap<String, Vec<u8>>,
    attachments: IndexMap<String, Vec<u8>>,
    server_meta: Option<Vec<u8>>,
    audit_log: Option<Vec<u8>>,
    message_count: u64,
    date_range: Option<DateRange>,
}

impl ArchiveBuilder {
    pub fn new(exported_by: ExportedBy, instance_url: impl Into<String>) -> Self {
        Self {
            exported_by,
            instance_url: instance_url.into(),
            scope: None,
            server_id: None,
            channel_id: None,
            channels: IndexMap::new(),
            attachments: IndexMap::new(),
            server_meta: None,
            audit_log: None,
            message_count: 0,
            date_range: None,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Add a channel's export JSON. Last write wins if `name` slugs to a
    /// path already present.
    pub fn add_channel(&mut self, name: &str, export_json: Vec<u8>) -> &mut Self {
        self.channels.insert(format!("channels/{}.json", slugify(name)), export_json);
        self
    }

    /// Add a direct-message export JSON. Last write wins on slug collision.
    pub fn add_dm(&mut self, name: &str, export_json: Vec<u8>) -> &mut Self {
        self.channels.insert(format!("dms/{}.json", slugify(name)), export_json);
        self
    }

    pub fn add_attachment(&mut self, id: &str, data: Vec<u8>) -> &mut Self {
        self.attachments.insert(format!("attachments/{id}.bin"), data);
        self
    }

    pub fn set_server_meta(&mut self, meta_json: Vec<u8>) -> &mut Self {
        self.server_meta = Some(meta_json);
        self
    }

    pub fn set_audit_log(&mut self, log_json: Vec<u8>) -> &mut Self {
        self.audit_log = Some(log_json);
        self
    }

    /// Record `count` more messages spanning `[from, to]`, widening the
    /// running date range to cover every call made so far.
    pub fn record_messages(&mut self, count: u64, from: DateTime<Utc>, to: DateTime<Utc>) -> &mut Self {
        self.message_count += count;
        self.date_range = Some(match self.date_range.take() {
            None => DateRange { from, to },
            Some(existing) => DateRange { from: existing.from.min(from), to: existing.to.max(to) },
        });
        self
    }

    /// Build the archive. If `signing_key` is supplied, the manifest's
    /// `user_signature` is set to the Ed25519 signature over its canonical
    /// bytes.
    pub fn build(self, signing_key: Option<&IdentityKeyPair>) -> Result<Vec<u8>, ArchiveError> {
        let mut blobs: IndexMap<String, Vec<u8>> = IndexMap::new();
        blobs.extend(self.channels);
        blobs.extend(self.attachments);
        if let Some(meta) = &self.server_meta {
            blobs.insert("server.json".to_string(), meta.clone());
        }
        if let Some(log) = &self.audit_log {
            blobs.insert("audit-log.json".to_string(), log.clone());
        }

        let now = Utc::now();
        let date_range = self.date_range.unwrap_or(DateRange { from: now, to: now });

        let mut manifest = HavenManifest {
            version: MANIFEST_VERSION,
            format: MANIFEST_FORMAT.to_string(),
            exported_by: self.exported_by,
            exported_at: now,
            scope: self.scope,
            server_id: self.server_id,
            channel_id: self.channel_id,
            instance_url: self.instance_url,
            files: IndexMap::new(),
            message_count: self.message_count,
            date_range,
            user_signature: None,
            server_signature: None,
        };
        for (path, data) in &blobs {
            manifest.insert_file(path.clone(), FileEntry { sha256: compute_file_hash(data), size: data.len() as u64 });
        }

        if let Some(key) = signing_key {
            manifest.user_signature = Some(sign_manifest(&manifest, key));
        }

        tracing::info!(
            files = blobs.len(),
            messages = manifest.message_count,
            signed = signing_key.is_some(),
            "built haven export archive"
        );

        let manifest_bytes = serde_json::to_vec_pretty(&manifest)?;
        blobs.insert("manifest.json".to_string(), manifest_bytes);

        zip_io::pack(&blobs)
    }
}
