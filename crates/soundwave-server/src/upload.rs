//! Upload pipeline: store bytes, extract metadata, persist the track.

use soundwave_types::{Track, TrackPayload};

use crate::file_store::AudioFileStore;
use crate::library_db::LibraryDb;
use crate::tag_reader;

/// Failure modes surfaced by the upload pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadError {
    /// Validation rejected the file before any bytes were written.
    Rejected(String),
    /// Storage or database failure after validation.
    Internal(String),
}

impl UploadError {
    pub fn message(&self) -> &str {
        match self {
            UploadError::Rejected(msg) | UploadError::Internal(msg) => msg,
        }
    }
}

/// Store one uploaded file and create its track record.
///
/// Extraction failures are absorbed by the tag reader; a database failure
/// after the file was written leaves the stored file on disk (logged, not
/// reconciled).
pub fn upload_one(
    db: &LibraryDb,
    store: &AudioFileStore,
    original_name: &str,
    bytes: &[u8],
) -> Result<Track, UploadError> {
    let ext = AudioFileStore::validate_upload(original_name, bytes.len())
        .map_err(UploadError::Rejected)?;
    let stored_name = store
        .save(bytes, &ext)
        .map_err(|err| UploadError::Internal(format!("{err:#}")))?;

    let meta = tag_reader::extract_metadata(&store.root().join(&stored_name), original_name);
    let payload = TrackPayload {
        id: 0,
        title: meta.title,
        artist: meta.artist,
        album: meta.album,
        duration_seconds: meta.duration_seconds,
        file_path: stored_name.clone(),
        audio_format: ext,
        bitrate: meta.bitrate,
    };

    let track = db.insert_track(&payload).map_err(|err| {
        tracing::error!(
            error = %err,
            stored_name = %stored_name,
            "track insert failed after file write; stored file left on disk"
        );
        UploadError::Internal(format!("{err:#}"))
    })?;
    tracing::info!(
        original = %original_name,
        stored = %track.file_path,
        track_id = track.id,
        "audio file uploaded"
    );
    Ok(track)
}

/// Upload a batch of files independently.
///
/// Returns the created tracks and per-file error messages; a failing file
/// never aborts the rest of the batch.
pub fn upload_many(
    db: &LibraryDb,
    store: &AudioFileStore,
    files: Vec<(String, Vec<u8>)>,
) -> (Vec<Track>, Vec<String>) {
    let mut uploaded = Vec::new();
    let mut errors = Vec::new();
    for (name, bytes) in files {
        match upload_one(db, store, &name, &bytes) {
            Ok(track) => uploaded.push(track),
            Err(err) => errors.push(format!("{}: {}", name, err.message())),
        }
    }
    (uploaded, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag_reader::{UNKNOWN_ALBUM, UNKNOWN_ARTIST};

    fn temp_parts() -> (LibraryDb, AudioFileStore) {
        let root = std::env::temp_dir().join(format!(
            "soundwave-upload-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&root).expect("create temp dir");
        let db = LibraryDb::new(&root.join("library.sqlite")).expect("library db");
        let store = AudioFileStore::new(root.join("audio-files"));
        (db, store)
    }

    #[test]
    fn rejected_extension_creates_nothing() {
        let (db, store) = temp_parts();
        let result = upload_one(&db, &store, "notes.txt", b"hello");
        assert!(matches!(result, Err(UploadError::Rejected(_))));
        assert!(db.list_tracks(None).expect("list").is_empty());
        assert!(!store.root().exists());
    }

    #[test]
    fn untagged_upload_gets_placeholder_metadata() {
        let (db, store) = temp_parts();
        let track = upload_one(&db, &store, "Road Trip.mp3", b"not a real mpeg stream")
            .expect("upload");

        assert_eq!(track.title, "Road Trip");
        assert_eq!(track.artist, UNKNOWN_ARTIST);
        assert_eq!(track.album, UNKNOWN_ALBUM);
        assert_eq!(track.audio_format, "mp3");
        assert_eq!(track.duration_seconds, 0);
        assert_eq!(track.bitrate, 0);
        assert!(track.file_path.ends_with(".mp3"));
        assert!(store.root().join(&track.file_path).exists());
        assert_eq!(db.list_tracks(None).expect("list").len(), 1);
    }

    #[test]
    fn batch_isolates_per_file_failures() {
        let (db, store) = temp_parts();
        let files = vec![
            ("good.mp3".to_string(), b"audio".to_vec()),
            ("bad.txt".to_string(), b"text".to_vec()),
            ("also-good.ogg".to_string(), b"audio".to_vec()),
        ];
        let (uploaded, errors) = upload_many(&db, &store, files);
        assert_eq!(uploaded.len(), 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("bad.txt:"));
        assert_eq!(db.list_tracks(None).expect("list").len(), 2);
    }
}
