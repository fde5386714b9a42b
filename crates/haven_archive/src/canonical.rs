//! Deterministic signing bytes for a `HavenManifest`, and Ed25519
//! sign/verify over them — the same canonical-JSON-then-sign shape the
//! teacher's device certificates use.

use base64::{engine::general_purpose::STANDARD, Engine};
use haven_crypto::identity::{IdentityKeyPair, IdentityPublicKey};
use haven_proto::HavenManifest;
use serde_json::{Map, Value};

/// Shallow copy of `manifest` with `user_signature`/`server_signature`
/// removed, top-level keys sorted by Unicode code point, nested objects
/// left exactly as serialised (insertion order), UTF-8, no trailing
/// whitespace, not pretty-printed.
pub fn canonical_manifest(manifest: &HavenManifest) -> Vec<u8> {
    let mut value = serde_json::to_value(manifest).expect("HavenManifest always serialises");
    if let Value::Object(map) = &mut value {
        map.remove("user_signature");
        map.remove("server_signature");

        let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        *map = entries.into_iter().collect::<Map<String, Value>>();
    }
    serde_json::to_vec(&value).expect("canonical value always serialises")
}

/// Sign the canonical bytes of `manifest` with `key`; returns base64.
pub fn sign_manifest(manifest: &HavenManifest, key: &IdentityKeyPair) -> String {
    let bytes = canonical_manifest(manifest);
    STANDARD.encode(key.sign(&bytes))
}

/// Verify `signature_b64` over `manifest`'s canonical bytes against
/// `public`. Never propagates an error — any failure (bad base64, bad
/// signature length, mismatched signature) simply returns `false`.
pub fn verify_manifest(manifest: &HavenManifest, signature_b64: &str, public: &IdentityPublicKey) -> bool {
    let bytes = canonical_manifest(manifest);
    let Ok(sig) = STANDARD.decode(signature_b64) else {
        return false;
    };
    IdentityKeyPair::verify(public, &bytes, &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use haven_proto::{DateRange, ExportedBy, FileEntry, MANIFEST_FORMAT, MANIFEST_VERSION};
    use indexmap::IndexMap;

    fn sample() -> HavenManifest {
        let mut files = IndexMap::new();
        files.insert("channels/b.json".to_string(), FileEntry { sha256: "bb".into(), size: 2 });
        files.insert("channels/a.json".to_string(), FileEntry { sha256: "aa".into(), size: 1 });

        HavenManifest {
            version: MANIFEST_VERSION,
            format: MANIFEST_FORMAT.to_string(),
            exported_by: ExportedBy {
                user_id: "u1".into(),
                username: "alice".into(),
                identity_key: "base64key".into(),
            },
            exported_at: Utc::now(),
            scope: None,
            server_id: None,
            channel_id: None,
            instance_url: "https://haven.example".into(),
            files,
            message_count: 2,
            date_range: DateRange { from: Utc::now(), to: Utc::now() },
            user_signature: None,
            server_signature: None,
        }
    }

    #[test]
    fn canonical_bytes_sort_top_level_keys_but_not_nested() {
        let manifest = sample();
        let bytes = canonical_manifest(&manifest);
        let text = String::from_utf8(bytes).unwrap();

        // Top level: "channel_id" < "date_range" < "exported_at" < "exported_by"
        // < "files" < "format" < "instance_url" < "message_count" < "scope"
        // < "server_id" < "version" — assert a representative ordering pair.
        let files_pos = text.find("\"files\"").unwrap();
        let format_pos = text.find("\"format\"").unwrap();
        assert!(files_pos < format_pos, "top-level keys must be sorted ascending");

        // Nested `files` map must retain insertion order: "b.json" before "a.json".
        let b_pos = text.find("channels/b.json").unwrap();
        let a_pos = text.find("channels/a.json").unwrap();
        assert!(b_pos < a_pos, "nested object order must be preserved, not re-sorted");
    }

    #[test]
    fn canonical_bytes_omit_signature_fields() {
        let mut manifest = sample();
        manifest.user_signature = Some("sig".into());
        let bytes = canonical_manifest(&manifest);
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("user_signature"));
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let key = IdentityKeyPair::generate();
        let manifest = sample();
        let sig = sign_manifest(&manifest, &key);
        assert!(verify_manifest(&manifest, &sig, &key.public));
    }

    #[test]
    fn verify_fails_on_tampered_manifest() {
        let key = IdentityKeyPair::generate();
        let manifest = sample();
        let sig = sign_manifest(&manifest, &key);

        let mut tampered = manifest;
        tampered.message_count += 1;
        assert!(!verify_manifest(&tampered, &sig, &key.public));
    }

    #[test]
    fn verify_fails_on_wrong_key() {
        let key = IdentityKeyPair::generate();
        let other = IdentityKeyPair::generate();
        let manifest = sample();
        let sig = sign_manifest(&manifest, &key);
        assert!(!verify_manifest(&manifest, &sig, &other.public));
    }

    #[test]
    fn verify_fails_gracefully_on_garbage_signature() {
        let key = IdentityKeyPair::generate();
        let manifest = sample();
        assert!(!verify_manifest(&manifest, "not-valid-base64!!", &key.public));
    }
}
