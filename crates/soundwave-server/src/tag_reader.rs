//! Tag metadata extraction for uploaded audio files.

use std::path::Path;

use anyhow::{Context, Result};
use lofty::{Accessor, AudioFile, TaggedFileExt, read_from_path};

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Metadata extracted from an uploaded audio file.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_seconds: i64,
    pub bitrate: i64,
}

/// Read tag metadata with filename/placeholder fallbacks.
///
/// Never fails: an unreadable file yields the placeholder record with the
/// failure logged, so a tag problem cannot turn into an upload failure.
pub fn extract_metadata(path: &Path, original_name: &str) -> ExtractedMetadata {
    match read_tags(path, original_name) {
        Ok(meta) => meta,
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %path.display(),
                "tag read failed; using placeholder metadata"
            );
            placeholder_metadata(original_name)
        }
    }
}

fn read_tags(path: &Path, original_name: &str) -> Result<ExtractedMetadata> {
    let tagged_file = read_from_path(path).context("read tags")?;
    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());
    let properties = tagged_file.properties();

    let title = tag
        .and_then(|tag| tag.title().map(|value| value.to_string()))
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| title_from_filename(original_name));
    let artist = tag
        .and_then(|tag| tag.artist().map(|value| value.to_string()))
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let album = tag
        .and_then(|tag| tag.album().map(|value| value.to_string()))
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

    Ok(ExtractedMetadata {
        title,
        artist,
        album,
        duration_seconds: properties.duration().as_secs() as i64,
        bitrate: properties
            .audio_bitrate()
            .or_else(|| properties.overall_bitrate())
            .unwrap_or(0) as i64,
    })
}

fn placeholder_metadata(original_name: &str) -> ExtractedMetadata {
    ExtractedMetadata {
        title: title_from_filename(original_name),
        artist: UNKNOWN_ARTIST.to_string(),
        album: UNKNOWN_ALBUM.to_string(),
        duration_seconds: 0,
        bitrate: 0,
    }
}

/// Original filename without its extension.
fn title_from_filename(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_filename_strips_extension() {
        assert_eq!(title_from_filename("My Song.mp3"), "My Song");
        assert_eq!(title_from_filename("archive.tar.flac"), "archive.tar");
        assert_eq!(title_from_filename("noext"), "noext");
    }

    #[test]
    fn unreadable_file_yields_placeholder_record() {
        let root = std::env::temp_dir().join(format!(
            "soundwave-tag-reader-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&root).expect("create temp dir");
        let path = root.join("not-audio.mp3");
        std::fs::write(&path, b"definitely not an mpeg stream").expect("write file");

        let meta = extract_metadata(&path, "Original Name.mp3");
        assert_eq!(meta.title, "Original Name");
        assert_eq!(meta.artist, UNKNOWN_ARTIST);
        assert_eq!(meta.album, UNKNOWN_ALBUM);
        assert_eq!(meta.duration_seconds, 0);
        assert_eq!(meta.bitrate, 0);
    }

    #[test]
    fn missing_file_yields_placeholder_record() {
        let meta = extract_metadata(Path::new("/nonexistent/file.ogg"), "file.ogg");
        assert_eq!(meta.title, "file");
        assert_eq!(meta.artist, UNKNOWN_ARTIST);
    }
}
