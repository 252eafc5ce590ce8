//! HTTP API handlers.
//!
//! Defines the Actix routes for status, tracks, playlists, and uploads.

pub mod playlists;
pub mod status;
pub mod tracks;
pub mod uploads;

pub use playlists::{
    add_playlist_track,
    create_playlist,
    delete_playlist,
    get_playlist,
    list_playlists,
    remove_playlist_track,
    update_playlist,
};
pub use status::get_status;
pub use tracks::{
    create_track,
    delete_track,
    get_track,
    list_tracks,
    track_audio,
    update_track,
};
pub use uploads::{
    delete_file,
    download_file,
    upload_audio,
    upload_multiple,
};
