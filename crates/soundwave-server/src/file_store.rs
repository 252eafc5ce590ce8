//! Uploaded audio file storage.
//!
//! Validates uploads, generates collision-resistant stored names, and maps
//! extensions to served content types.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

/// Extensions accepted for upload (lowercase).
const ALLOWED_EXTENSIONS: [&str; 6] = ["mp3", "wav", "flac", "m4a", "aac", "ogg"];

/// Upload size cap in bytes.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// File storage rooted at the audio directory. Stored names are always
/// relative to the root.
#[derive(Clone)]
pub struct AudioFileStore {
    root: PathBuf,
}

impl AudioFileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Validate an upload before any bytes are written.
    ///
    /// Returns the normalized (lowercase) extension, or a rejection message.
    pub fn validate_upload(original_name: &str, len: usize) -> Result<String, String> {
        let ext = extension_of(original_name).unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(format!(
                "unsupported file type; allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ));
        }
        if len > MAX_UPLOAD_BYTES {
            return Err("file too large; maximum size is 100 MiB".to_string());
        }
        Ok(ext)
    }

    /// Write upload bytes under a fresh uuid-based name, preserving the
    /// extension. Returns the stored name.
    pub fn save(&self, bytes: &[u8], ext: &str) -> Result<String> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("create storage dir {:?}", self.root))?;
        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        let full_path = self.root.join(&stored_name);
        std::fs::write(&full_path, bytes)
            .with_context(|| format!("write audio file {:?}", full_path))?;
        Ok(stored_name)
    }

    /// Resolve a stored name to its on-disk path without requiring the file
    /// to exist. Rejects names that escape the storage root.
    pub fn resolve(&self, stored_name: &str) -> Result<PathBuf, String> {
        let path = Path::new(stored_name);
        if path.is_absolute() {
            return Err("file name must be relative".to_string());
        }
        if path
            .components()
            .any(|component| matches!(component, std::path::Component::ParentDir))
        {
            return Err("file name must not contain parent segments".to_string());
        }
        Ok(self.root.join(path))
    }

    /// Best-effort removal; tolerates the file already being gone.
    pub fn delete(&self, stored_name: &str) -> Result<(), String> {
        let full_path = self.resolve(stored_name)?;
        if full_path.exists() {
            std::fs::remove_file(&full_path).map_err(|err| err.to_string())?;
        }
        Ok(())
    }
}

/// Served content type for a file name, by extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> AudioFileStore {
        let root = std::env::temp_dir().join(format!(
            "soundwave-file-store-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        AudioFileStore::new(root)
    }

    #[test]
    fn validate_accepts_allowed_extensions_case_insensitive() {
        assert_eq!(
            AudioFileStore::validate_upload("Song.MP3", 10),
            Ok("mp3".to_string())
        );
        assert_eq!(
            AudioFileStore::validate_upload("take.flac", 10),
            Ok("flac".to_string())
        );
    }

    #[test]
    fn validate_rejects_unknown_extension() {
        assert!(AudioFileStore::validate_upload("notes.txt", 10).is_err());
        assert!(AudioFileStore::validate_upload("no-extension", 10).is_err());
    }

    #[test]
    fn validate_rejects_oversize() {
        assert!(AudioFileStore::validate_upload("song.mp3", MAX_UPLOAD_BYTES + 1).is_err());
        assert!(AudioFileStore::validate_upload("song.mp3", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn save_and_delete_round_trip() {
        let store = temp_store();
        let stored = store.save(b"bytes", "mp3").expect("save");
        assert!(stored.ends_with(".mp3"));
        let path = store.resolve(&stored).expect("resolve");
        assert_eq!(std::fs::read(&path).expect("read back"), b"bytes");

        store.delete(&stored).expect("delete");
        assert!(!path.exists());
        // Already gone: still fine.
        store.delete(&stored).expect("delete again");
    }

    #[test]
    fn save_generates_distinct_names() {
        let store = temp_store();
        let first = store.save(b"a", "ogg").expect("save");
        let second = store.save(b"b", "ogg").expect("save");
        assert_ne!(first, second);
    }

    #[test]
    fn resolve_rejects_traversal() {
        let store = temp_store();
        assert!(store.resolve("../outside.mp3").is_err());
        assert!(store.resolve("/etc/passwd").is_err());
        assert!(store.resolve("inner/../../outside.mp3").is_err());
    }

    #[test]
    fn content_type_table_matches_extensions() {
        assert_eq!(content_type_for("a.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("a.WAV"), "audio/wav");
        assert_eq!(content_type_for("a.flac"), "audio/flac");
        assert_eq!(content_type_for("a.m4a"), "audio/mp4");
        assert_eq!(content_type_for("a.aac"), "audio/aac");
        assert_eq!(content_type_for("a.ogg"), "audio/ogg");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }
}
