//! SQLite store for tracks, playlists, and playlist memberships.
//!
//! Provides pooled connections and schema bootstrap.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use soundwave_types::{Playlist, PlaylistPayload, Track, TrackPayload};

const SCHEMA_VERSION: i32 = 1;

const TRACK_COLUMNS: &str =
    "id, title, artist, album, duration_seconds, file_path, audio_format, bitrate, \
     created_at_ms, updated_at_ms";

#[derive(Clone)]
pub struct LibraryDb {
    pool: Pool<SqliteConnectionManager>,
}

/// Result of a full-field replace with optimistic concurrency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// No row with the requested id.
    Missing,
    /// The row changed between the read and the conditional write.
    Conflict,
}

/// Result of adding a track to a playlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddTrackOutcome {
    Added,
    PlaylistMissing,
    TrackMissing,
    /// A membership for this (playlist, track) pair already exists.
    AlreadyPresent,
}

pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn datetime_from_ms(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn map_track_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Track> {
    Ok(Track {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        album: row.get(3)?,
        duration_seconds: row.get(4)?,
        file_path: row.get(5)?,
        audio_format: row.get(6)?,
        bitrate: row.get(7)?,
        created_at: datetime_from_ms(row.get(8)?),
        updated_at: datetime_from_ms(row.get(9)?),
    })
}

impl LibraryDb {
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create db dir {:?}", parent))?;
            }
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .context("create library db pool")?;

        {
            let conn = pool.get().context("open library db")?;
            init_schema(&conn)?;
        }

        Ok(Self { pool })
    }

    // ── Tracks ───────────────────────────────────────────────────────

    /// List tracks ordered by title, optionally filtered by a substring
    /// matched against title, artist, and album.
    pub fn list_tracks(&self, search: Option<&str>) -> Result<Vec<Track>> {
        let conn = self.pool.get().context("open library db")?;
        let search_like = search
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRACK_COLUMNS} FROM tracks
             WHERE ?1 IS NULL OR title LIKE ?1 OR artist LIKE ?1 OR album LIKE ?1
             ORDER BY title"
        ))?;
        let rows = stmt.query_map(params![search_like], map_track_row)?;
        Ok(rows.filter_map(Result::ok).collect())
    }

    pub fn track_by_id(&self, id: i64) -> Result<Option<Track>> {
        let conn = self.pool.get().context("open library db")?;
        conn.query_row(
            &format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ?1"),
            params![id],
            map_track_row,
        )
        .optional()
        .context("fetch track")
    }

    /// Find the track whose stored filename matches `file_path`.
    pub fn track_by_file_path(&self, file_path: &str) -> Result<Option<Track>> {
        let conn = self.pool.get().context("open library db")?;
        conn.query_row(
            &format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE file_path = ?1"),
            params![file_path],
            map_track_row,
        )
        .optional()
        .context("fetch track by file path")
    }

    pub fn insert_track(&self, payload: &TrackPayload) -> Result<Track> {
        let conn = self.pool.get().context("open library db")?;
        let now = now_ms();
        conn.execute(
            "INSERT INTO tracks (
                title, artist, album, duration_seconds, file_path, audio_format, bitrate,
                created_at_ms, updated_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                payload.title,
                payload.artist,
                payload.album,
                payload.duration_seconds,
                payload.file_path,
                payload.audio_format,
                payload.bitrate,
                now
            ],
        )
        .context("insert track")?;

        Ok(Track {
            id: conn.last_insert_rowid(),
            title: payload.title.clone(),
            artist: payload.artist.clone(),
            album: payload.album.clone(),
            duration_seconds: payload.duration_seconds,
            file_path: payload.file_path.clone(),
            audio_format: payload.audio_format.clone(),
            bitrate: payload.bitrate,
            created_at: datetime_from_ms(now),
            updated_at: datetime_from_ms(now),
        })
    }

    /// Replace all mutable fields of a track.
    ///
    /// The write is conditional on the version read in the same transaction,
    /// so a concurrent change surfaces as [`UpdateOutcome::Conflict`] instead
    /// of being overwritten.
    pub fn update_track(&self, id: i64, payload: &TrackPayload) -> Result<UpdateOutcome> {
        let mut conn = self.pool.get().context("open library db")?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("begin track update")?;
        let read_version: Option<i64> = tx
            .query_row(
                "SELECT updated_at_ms FROM tracks WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .context("read track version")?;
        let Some(read_version) = read_version else {
            return Ok(UpdateOutcome::Missing);
        };

        let updated = tx
            .execute(
                "UPDATE tracks SET
                    title = ?1, artist = ?2, album = ?3, duration_seconds = ?4,
                    file_path = ?5, audio_format = ?6, bitrate = ?7, updated_at_ms = ?8
                 WHERE id = ?9 AND updated_at_ms = ?10",
                params![
                    payload.title,
                    payload.artist,
                    payload.album,
                    payload.duration_seconds,
                    payload.file_path,
                    payload.audio_format,
                    payload.bitrate,
                    now_ms(),
                    id,
                    read_version
                ],
            )
            .context("update track")?;
        if updated > 0 {
            tx.commit().context("commit track update")?;
            return Ok(UpdateOutcome::Updated);
        }

        let exists: Option<i64> = tx
            .query_row("SELECT 1 FROM tracks WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()
            .context("recheck track existence")?;
        Ok(if exists.is_some() {
            UpdateOutcome::Conflict
        } else {
            UpdateOutcome::Missing
        })
    }

    /// Delete a track; memberships cascade via the foreign key.
    pub fn delete_track(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get().context("open library db")?;
        let deleted = conn
            .execute("DELETE FROM tracks WHERE id = ?1", params![id])
            .context("delete track")?;
        Ok(deleted > 0)
    }

    // ── Playlists ────────────────────────────────────────────────────

    /// List playlists ordered by name with their tracks embedded.
    pub fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let conn = self.pool.get().context("open library db")?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, created_at_ms, updated_at_ms
             FROM playlists ORDER BY name",
        )?;
        let rows = stmt.query_map([], map_playlist_row)?;
        let mut playlists: Vec<Playlist> = rows.filter_map(Result::ok).collect();
        for playlist in &mut playlists {
            playlist.tracks = tracks_for_playlist(&conn, playlist.id)?;
        }
        Ok(playlists)
    }

    pub fn playlist_by_id(&self, id: i64) -> Result<Option<Playlist>> {
        let conn = self.pool.get().context("open library db")?;
        let playlist = conn
            .query_row(
                "SELECT id, name, description, created_at_ms, updated_at_ms
                 FROM playlists WHERE id = ?1",
                params![id],
                map_playlist_row,
            )
            .optional()
            .context("fetch playlist")?;
        let Some(mut playlist) = playlist else {
            return Ok(None);
        };
        playlist.tracks = tracks_for_playlist(&conn, playlist.id)?;
        Ok(Some(playlist))
    }

    pub fn insert_playlist(&self, payload: &PlaylistPayload) -> Result<Playlist> {
        let conn = self.pool.get().context("open library db")?;
        let now = now_ms();
        conn.execute(
            "INSERT INTO playlists (name, description, created_at_ms, updated_at_ms)
             VALUES (?1, ?2, ?3, ?3)",
            params![payload.name, payload.description, now],
        )
        .context("insert playlist")?;

        Ok(Playlist {
            id: conn.last_insert_rowid(),
            name: payload.name.clone(),
            description: payload.description.clone(),
            created_at: datetime_from_ms(now),
            updated_at: datetime_from_ms(now),
            tracks: Vec::new(),
        })
    }

    /// Replace a playlist's fields; same concurrency contract as
    /// [`LibraryDb::update_track`].
    pub fn update_playlist(&self, id: i64, payload: &PlaylistPayload) -> Result<UpdateOutcome> {
        let mut conn = self.pool.get().context("open library db")?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("begin playlist update")?;
        let read_version: Option<i64> = tx
            .query_row(
                "SELECT updated_at_ms FROM playlists WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .context("read playlist version")?;
        let Some(read_version) = read_version else {
            return Ok(UpdateOutcome::Missing);
        };

        let updated = tx
            .execute(
                "UPDATE playlists SET name = ?1, description = ?2, updated_at_ms = ?3
                 WHERE id = ?4 AND updated_at_ms = ?5",
                params![payload.name, payload.description, now_ms(), id, read_version],
            )
            .context("update playlist")?;
        if updated > 0 {
            tx.commit().context("commit playlist update")?;
            return Ok(UpdateOutcome::Updated);
        }

        let exists: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM playlists WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .context("recheck playlist existence")?;
        Ok(if exists.is_some() {
            UpdateOutcome::Conflict
        } else {
            UpdateOutcome::Missing
        })
    }

    /// Delete a playlist; memberships cascade via the foreign key.
    pub fn delete_playlist(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get().context("open library db")?;
        let deleted = conn
            .execute("DELETE FROM playlists WHERE id = ?1", params![id])
            .context("delete playlist")?;
        Ok(deleted > 0)
    }

    // ── Memberships ──────────────────────────────────────────────────

    /// Append a track to a playlist at position max+1.
    ///
    /// The immediate transaction takes the write lock before the max is
    /// read, serializing concurrent adds so two callers cannot compute the
    /// same position.
    pub fn add_track_to_playlist(&self, playlist_id: i64, track_id: i64) -> Result<AddTrackOutcome> {
        let mut conn = self.pool.get().context("open library db")?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("begin membership insert")?;

        let playlist_exists: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM playlists WHERE id = ?1",
                params![playlist_id],
                |row| row.get(0),
            )
            .optional()
            .context("check playlist")?;
        if playlist_exists.is_none() {
            return Ok(AddTrackOutcome::PlaylistMissing);
        }

        let track_exists: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM tracks WHERE id = ?1",
                params![track_id],
                |row| row.get(0),
            )
            .optional()
            .context("check track")?;
        if track_exists.is_none() {
            return Ok(AddTrackOutcome::TrackMissing);
        }

        let already: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM playlist_tracks WHERE playlist_id = ?1 AND track_id = ?2",
                params![playlist_id, track_id],
                |row| row.get(0),
            )
            .optional()
            .context("check membership")?;
        if already.is_some() {
            return Ok(AddTrackOutcome::AlreadyPresent);
        }

        let next_position: i64 = tx
            .query_row(
                "SELECT COALESCE(MAX(position), 0) + 1 FROM playlist_tracks WHERE playlist_id = ?1",
                params![playlist_id],
                |row| row.get(0),
            )
            .context("compute next position")?;
        tx.execute(
            "INSERT INTO playlist_tracks (playlist_id, track_id, position, added_at_ms)
             VALUES (?1, ?2, ?3, ?4)",
            params![playlist_id, track_id, next_position, now_ms()],
        )
        .context("insert membership")?;

        tx.commit().context("commit membership insert")?;
        Ok(AddTrackOutcome::Added)
    }

    /// Remove a membership. Positions of the remaining entries are left
    /// untouched.
    pub fn remove_track_from_playlist(&self, playlist_id: i64, track_id: i64) -> Result<bool> {
        let conn = self.pool.get().context("open library db")?;
        let deleted = conn
            .execute(
                "DELETE FROM playlist_tracks WHERE playlist_id = ?1 AND track_id = ?2",
                params![playlist_id, track_id],
            )
            .context("delete membership")?;
        Ok(deleted > 0)
    }
}

fn map_playlist_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Playlist> {
    Ok(Playlist {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: datetime_from_ms(row.get(3)?),
        updated_at: datetime_from_ms(row.get(4)?),
        tracks: Vec::new(),
    })
}

fn tracks_for_playlist(conn: &Connection, playlist_id: i64) -> Result<Vec<Track>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.title, t.artist, t.album, t.duration_seconds, t.file_path,
                t.audio_format, t.bitrate, t.created_at_ms, t.updated_at_ms
         FROM playlist_tracks pt
         JOIN tracks t ON t.id = pt.track_id
         WHERE pt.playlist_id = ?1
         ORDER BY pt.position",
    )?;
    let rows = stmt.query_map(params![playlist_id], map_track_row)?;
    Ok(rows.filter_map(Result::ok).collect())
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            album TEXT NOT NULL DEFAULT '',
            duration_seconds INTEGER NOT NULL DEFAULT 0,
            file_path TEXT NOT NULL DEFAULT '',
            audio_format TEXT NOT NULL DEFAULT 'MP3',
            bitrate INTEGER NOT NULL DEFAULT 320,
            created_at_ms INTEGER NOT NULL,
            updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS playlists (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at_ms INTEGER NOT NULL,
            updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS playlist_tracks (
            id INTEGER PRIMARY KEY,
            playlist_id INTEGER NOT NULL,
            track_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            added_at_ms INTEGER NOT NULL,
            FOREIGN KEY(playlist_id) REFERENCES playlists(id) ON DELETE CASCADE,
            FOREIGN KEY(track_id) REFERENCES tracks(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_tracks_title_artist ON tracks(title, artist);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_playlist_tracks_pair
            ON playlist_tracks(playlist_id, track_id);
        CREATE INDEX IF NOT EXISTS idx_playlist_tracks_position
            ON playlist_tracks(playlist_id, position);
        "#,
    )
    .context("create library schema")?;

    let version_raw: Option<String> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    if version_raw.is_none() {
        conn.execute(
            "INSERT INTO meta (key, value) VALUES ('schema_version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )
        .context("insert schema version")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> LibraryDb {
        let root = std::env::temp_dir().join(format!(
            "soundwave-library-db-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&root).expect("create temp dir");
        LibraryDb::new(&root.join("library.sqlite")).expect("open library db")
    }

    fn track_payload(title: &str, artist: &str, album: &str) -> TrackPayload {
        TrackPayload {
            id: 0,
            title: title.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            duration_seconds: 180,
            file_path: String::new(),
            audio_format: "MP3".to_string(),
            bitrate: 320,
        }
    }

    #[test]
    fn insert_assigns_unique_ids() {
        let db = temp_db();
        let first = db
            .insert_track(&track_payload("One", "A", ""))
            .expect("insert first");
        let second = db
            .insert_track(&track_payload("Two", "B", ""))
            .expect("insert second");
        assert_ne!(first.id, second.id);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[test]
    fn list_orders_by_title_and_search_matches_all_fields() {
        let db = temp_db();
        db.insert_track(&track_payload("Zebra", "First Artist", "Red Album"))
            .expect("insert");
        db.insert_track(&track_payload("Alpha", "Second Artist", "Blue Album"))
            .expect("insert");

        let all = db.list_tracks(None).expect("list");
        assert_eq!(
            all.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
            vec!["Alpha", "Zebra"]
        );

        let by_title = db.list_tracks(Some("ebr")).expect("search title");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Zebra");

        let by_artist = db.list_tracks(Some("Second")).expect("search artist");
        assert_eq!(by_artist.len(), 1);
        assert_eq!(by_artist[0].title, "Alpha");

        let by_album = db.list_tracks(Some("Red")).expect("search album");
        assert_eq!(by_album.len(), 1);

        let none = db.list_tracks(Some("does-not-exist")).expect("search miss");
        assert!(none.is_empty());
    }

    #[test]
    fn update_replaces_fields_and_reports_missing() {
        let db = temp_db();
        let track = db
            .insert_track(&track_payload("Before", "A", ""))
            .expect("insert");

        let mut changed = track_payload("After", "B", "New Album");
        changed.id = track.id;
        let outcome = db.update_track(track.id, &changed).expect("update");
        assert_eq!(outcome, UpdateOutcome::Updated);

        let fetched = db.track_by_id(track.id).expect("fetch").expect("present");
        assert_eq!(fetched.title, "After");
        assert_eq!(fetched.album, "New Album");

        let missing = db.update_track(9999, &changed).expect("update missing");
        assert_eq!(missing, UpdateOutcome::Missing);
    }

    #[test]
    fn delete_track_reports_presence() {
        let db = temp_db();
        let track = db
            .insert_track(&track_payload("Gone", "A", ""))
            .expect("insert");
        assert!(db.delete_track(track.id).expect("delete"));
        assert!(!db.delete_track(track.id).expect("delete again"));
        assert!(db.track_by_id(track.id).expect("fetch").is_none());
    }

    #[test]
    fn add_track_assigns_sequential_positions() {
        let db = temp_db();
        let playlist = db
            .insert_playlist(&PlaylistPayload {
                id: 0,
                name: "Mix".to_string(),
                description: String::new(),
            })
            .expect("insert playlist");
        let a = db.insert_track(&track_payload("A", "X", "")).expect("a");
        let b = db.insert_track(&track_payload("B", "X", "")).expect("b");
        let c = db.insert_track(&track_payload("C", "X", "")).expect("c");

        for track in [&a, &b, &c] {
            let outcome = db
                .add_track_to_playlist(playlist.id, track.id)
                .expect("add");
            assert_eq!(outcome, AddTrackOutcome::Added);
        }

        let fetched = db
            .playlist_by_id(playlist.id)
            .expect("fetch")
            .expect("present");
        assert_eq!(
            fetched.tracks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![a.id, b.id, c.id]
        );
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let db = temp_db();
        let playlist = db
            .insert_playlist(&PlaylistPayload {
                id: 0,
                name: "Mix".to_string(),
                description: String::new(),
            })
            .expect("insert playlist");
        let track = db.insert_track(&track_payload("A", "X", "")).expect("a");

        assert_eq!(
            db.add_track_to_playlist(playlist.id, track.id).expect("add"),
            AddTrackOutcome::Added
        );
        assert_eq!(
            db.add_track_to_playlist(playlist.id, track.id)
                .expect("add again"),
            AddTrackOutcome::AlreadyPresent
        );
        let fetched = db
            .playlist_by_id(playlist.id)
            .expect("fetch")
            .expect("present");
        assert_eq!(fetched.tracks.len(), 1);
    }

    #[test]
    fn add_reports_missing_entities() {
        let db = temp_db();
        let track = db.insert_track(&track_payload("A", "X", "")).expect("a");
        assert_eq!(
            db.add_track_to_playlist(42, track.id).expect("add"),
            AddTrackOutcome::PlaylistMissing
        );

        let playlist = db
            .insert_playlist(&PlaylistPayload {
                id: 0,
                name: "Mix".to_string(),
                description: String::new(),
            })
            .expect("insert playlist");
        assert_eq!(
            db.add_track_to_playlist(playlist.id, 42).expect("add"),
            AddTrackOutcome::TrackMissing
        );
    }

    #[test]
    fn remove_missing_membership_reports_absent() {
        let db = temp_db();
        assert!(!db.remove_track_from_playlist(1, 1).expect("remove"));
    }

    #[test]
    fn deleting_track_cascades_without_compacting_positions() {
        let db = temp_db();
        let playlist = db
            .insert_playlist(&PlaylistPayload {
                id: 0,
                name: "Mix".to_string(),
                description: String::new(),
            })
            .expect("insert playlist");
        let a = db.insert_track(&track_payload("A", "X", "")).expect("a");
        let b = db.insert_track(&track_payload("B", "X", "")).expect("b");
        let c = db.insert_track(&track_payload("C", "X", "")).expect("c");
        for track in [&a, &b, &c] {
            db.add_track_to_playlist(playlist.id, track.id).expect("add");
        }

        assert!(db.delete_track(b.id).expect("delete b"));

        let fetched = db
            .playlist_by_id(playlist.id)
            .expect("fetch")
            .expect("present");
        assert_eq!(
            fetched.tracks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![a.id, c.id]
        );

        // Survivors keep their positions: the next insert lands after the
        // highest assigned position, not in the freed slot.
        let d = db.insert_track(&track_payload("D", "X", "")).expect("d");
        db.add_track_to_playlist(playlist.id, d.id).expect("add d");
        let fetched = db
            .playlist_by_id(playlist.id)
            .expect("fetch")
            .expect("present");
        assert_eq!(
            fetched.tracks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![a.id, c.id, d.id]
        );
    }

    #[test]
    fn deleting_playlist_keeps_tracks() {
        let db = temp_db();
        let playlist = db
            .insert_playlist(&PlaylistPayload {
                id: 0,
                name: "Mix".to_string(),
                description: String::new(),
            })
            .expect("insert playlist");
        let track = db.insert_track(&track_payload("A", "X", "")).expect("a");
        db.add_track_to_playlist(playlist.id, track.id).expect("add");

        assert!(db.delete_playlist(playlist.id).expect("delete"));
        assert!(db.playlist_by_id(playlist.id).expect("fetch").is_none());
        assert!(db.track_by_id(track.id).expect("fetch").is_some());
    }

    #[test]
    fn playlists_list_orders_by_name() {
        let db = temp_db();
        for name in ["Workout", "Ambient", "Drive"] {
            db.insert_playlist(&PlaylistPayload {
                id: 0,
                name: name.to_string(),
                description: String::new(),
            })
            .expect("insert playlist");
        }
        let names = db
            .list_playlists()
            .expect("list")
            .into_iter()
            .map(|p| p.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Ambient", "Drive", "Workout"]);
    }

    #[test]
    fn track_by_file_path_finds_stored_name() {
        let db = temp_db();
        let mut payload = track_payload("A", "X", "");
        payload.file_path = "abc-123.mp3".to_string();
        let track = db.insert_track(&payload).expect("insert");

        let found = db
            .track_by_file_path("abc-123.mp3")
            .expect("fetch")
            .expect("present");
        assert_eq!(found.id, track.id);
        assert!(db.track_by_file_path("missing.mp3").expect("fetch").is_none());
    }
}
