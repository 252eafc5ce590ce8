use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A track record as stored and served by the library.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Store-assigned identifier.
    pub id: i64,
    /// Track title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Album name, empty when unknown.
    pub album: String,
    /// Duration in whole seconds.
    pub duration_seconds: i64,
    /// Stored filename relative to the audio storage directory.
    pub file_path: String,
    /// Audio format label (usually the file extension).
    pub audio_format: String,
    /// Bitrate in kbit/s.
    pub bitrate: i64,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp (UTC).
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a track.
///
/// `id` is ignored on create and must match the path id on update.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TrackPayload {
    /// Track id; defaults to 0 when omitted.
    #[serde(default)]
    pub id: i64,
    /// Track title (required, at most 200 characters).
    pub title: String,
    /// Performing artist (required, at most 200 characters).
    pub artist: String,
    /// Album name (at most 200 characters).
    #[serde(default)]
    pub album: String,
    /// Duration in whole seconds.
    #[serde(default)]
    pub duration_seconds: i64,
    /// Stored filename (at most 500 characters).
    #[serde(default)]
    pub file_path: String,
    /// Audio format label.
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
    /// Bitrate in kbit/s.
    #[serde(default = "default_bitrate")]
    pub bitrate: i64,
}

fn default_audio_format() -> String {
    "MP3".to_string()
}

fn default_bitrate() -> i64 {
    320
}

/// A playlist with its tracks embedded in playback order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Store-assigned identifier.
    pub id: i64,
    /// Playlist name.
    pub name: String,
    /// Free-form description, empty when not set.
    pub description: String,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp (UTC).
    pub updated_at: DateTime<Utc>,
    /// Member tracks in ascending position order.
    pub tracks: Vec<Track>,
}

/// Request body for creating or replacing a playlist.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PlaylistPayload {
    /// Playlist id; defaults to 0 when omitted.
    #[serde(default)]
    pub id: i64,
    /// Playlist name (required, at most 200 characters).
    pub name: String,
    /// Description (at most 1000 characters).
    #[serde(default)]
    pub description: String,
}

/// Response payload of the `/status` endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Application name.
    pub application: String,
    /// Server version.
    pub version: String,
    /// Current server time (UTC).
    pub server_time_utc: DateTime<Utc>,
    /// Health indicator, "OK" when serving.
    pub status: String,
}

/// Body of the multi-upload response when at least one file failed.
///
/// Successful uploads are reported alongside per-file error messages;
/// one failing file never aborts the rest of the batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UploadBatchResponse {
    /// Summary message.
    pub message: String,
    /// Per-file error descriptions.
    pub errors: Vec<String>,
    /// Tracks created for the files that did succeed.
    pub uploaded_tracks: Vec<Track>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_serializes_camel_case() {
        let track = Track {
            id: 7,
            title: "Song".to_string(),
            artist: "Band".to_string(),
            album: String::new(),
            duration_seconds: 180,
            file_path: "abc.mp3".to_string(),
            audio_format: "mp3".to_string(),
            bitrate: 320,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&track).expect("serialize track");
        assert_eq!(json["durationSeconds"], 180);
        assert_eq!(json["filePath"], "abc.mp3");
        assert!(json.get("duration_seconds").is_none());
    }

    #[test]
    fn track_payload_defaults_apply() {
        let payload: TrackPayload =
            serde_json::from_str(r#"{"title":"Song","artist":"Band"}"#).expect("parse payload");
        assert_eq!(payload.id, 0);
        assert_eq!(payload.audio_format, "MP3");
        assert_eq!(payload.bitrate, 320);
        assert_eq!(payload.album, "");
    }
}
