//! Shared application state.

use crate::file_store::AudioFileStore;
use crate::library_db::LibraryDb;

/// Shared application state for Actix handlers.
pub struct AppState {
    /// Track and playlist store.
    pub db: LibraryDb,
    /// Uploaded audio file storage.
    pub files: AudioFileStore,
}

impl AppState {
    pub fn new(db: LibraryDb, files: AudioFileStore) -> Self {
        Self { db, files }
    }
}
