use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::status::get_status,
        api::tracks::list_tracks,
        api::tracks::get_track,
        api::tracks::create_track,
        api::tracks::update_track,
        api::tracks::delete_track,
        api::tracks::track_audio,
        api::playlists::list_playlists,
        api::playlists::get_playlist,
        api::playlists::create_playlist,
        api::playlists::update_playlist,
        api::playlists::delete_playlist,
        api::playlists::add_playlist_track,
        api::playlists::remove_playlist_track,
        api::uploads::upload_audio,
        api::uploads::upload_multiple,
        api::uploads::download_file,
        api::uploads::delete_file,
    ),
    components(
        schemas(
            soundwave_types::Track,
            soundwave_types::TrackPayload,
            soundwave_types::Playlist,
            soundwave_types::PlaylistPayload,
            soundwave_types::StatusResponse,
            soundwave_types::UploadBatchResponse,
        )
    ),
    tags(
        (name = "soundwave-server", description = "Media library API")
    )
)]
pub struct ApiDoc;
