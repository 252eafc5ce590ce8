//! Playlist CRUD and membership handlers.

use actix_web::http::header;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use soundwave_types::{Playlist, PlaylistPayload};

use crate::library_db::{AddTrackOutcome, UpdateOutcome};
use crate::state::AppState;

pub(crate) fn validate_playlist_payload(payload: &PlaylistPayload) -> Result<(), String> {
    if payload.name.trim().is_empty() {
        return Err("name is required".to_string());
    }
    if payload.name.chars().count() > 200 {
        return Err("name exceeds 200 characters".to_string());
    }
    if payload.description.chars().count() > 1000 {
        return Err("description exceeds 1000 characters".to_string());
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/playlist",
    responses(
        (status = 200, description = "Playlists ordered by name, tracks embedded", body = [Playlist])
    )
)]
#[get("/api/playlist")]
/// List playlists with their tracks in playback order.
pub async fn list_playlists(state: web::Data<AppState>) -> impl Responder {
    match state.db.list_playlists() {
        Ok(playlists) => HttpResponse::Ok().json(playlists),
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("list playlists failed: {err:#}"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/playlist/{id}",
    params(("id" = i64, Path, description = "Playlist id")),
    responses(
        (status = 200, description = "Playlist with ordered tracks", body = Playlist),
        (status = 404, description = "Playlist not found")
    )
)]
#[get("/api/playlist/{id}")]
/// Fetch a single playlist by id.
pub async fn get_playlist(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.db.playlist_by_id(path.into_inner()) {
        Ok(Some(playlist)) => HttpResponse::Ok().json(playlist),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("fetch playlist failed: {err:#}"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/playlist",
    request_body = PlaylistPayload,
    responses(
        (status = 201, description = "Playlist created", body = Playlist),
        (status = 400, description = "Validation failed")
    )
)]
#[post("/api/playlist")]
/// Create an empty playlist.
pub async fn create_playlist(
    state: web::Data<AppState>,
    body: web::Json<PlaylistPayload>,
) -> impl Responder {
    if let Err(msg) = validate_playlist_payload(&body) {
        return HttpResponse::BadRequest().body(msg);
    }
    match state.db.insert_playlist(&body) {
        Ok(playlist) => HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/api/playlist/{}", playlist.id)))
            .json(playlist),
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("create playlist failed: {err:#}"))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/playlist/{id}",
    params(("id" = i64, Path, description = "Playlist id")),
    request_body = PlaylistPayload,
    responses(
        (status = 204, description = "Playlist updated"),
        (status = 400, description = "Id mismatch or validation failed"),
        (status = 404, description = "Playlist not found"),
        (status = 409, description = "Playlist changed concurrently")
    )
)]
#[put("/api/playlist/{id}")]
/// Replace a playlist's name and description.
pub async fn update_playlist(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<PlaylistPayload>,
) -> impl Responder {
    let id = path.into_inner();
    if body.id != id {
        return HttpResponse::BadRequest().body("payload id does not match path id");
    }
    if let Err(msg) = validate_playlist_payload(&body) {
        return HttpResponse::BadRequest().body(msg);
    }
    match state.db.update_playlist(id, &body) {
        Ok(UpdateOutcome::Updated) => HttpResponse::NoContent().finish(),
        Ok(UpdateOutcome::Missing) => HttpResponse::NotFound().finish(),
        Ok(UpdateOutcome::Conflict) => {
            HttpResponse::Conflict().body("playlist changed concurrently; fetch and retry")
        }
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("update playlist failed: {err:#}"))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/playlist/{id}",
    params(("id" = i64, Path, description = "Playlist id")),
    responses(
        (status = 204, description = "Playlist deleted"),
        (status = 404, description = "Playlist not found")
    )
)]
#[delete("/api/playlist/{id}")]
/// Delete a playlist and its memberships.
pub async fn delete_playlist(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.db.delete_playlist(path.into_inner()) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().finish(),
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("delete playlist failed: {err:#}"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/playlist/{playlist_id}/tracks/{track_id}",
    params(
        ("playlist_id" = i64, Path, description = "Playlist id"),
        ("track_id" = i64, Path, description = "Track id")
    ),
    responses(
        (status = 200, description = "Track appended to playlist"),
        (status = 400, description = "Track is already in playlist"),
        (status = 404, description = "Playlist or track not found")
    )
)]
#[post("/api/playlist/{playlist_id}/tracks/{track_id}")]
/// Append a track to the end of a playlist.
pub async fn add_playlist_track(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> impl Responder {
    let (playlist_id, track_id) = path.into_inner();
    match state.db.add_track_to_playlist(playlist_id, track_id) {
        Ok(AddTrackOutcome::Added) => HttpResponse::Ok().finish(),
        Ok(AddTrackOutcome::PlaylistMissing) => HttpResponse::NotFound().body("playlist not found"),
        Ok(AddTrackOutcome::TrackMissing) => HttpResponse::NotFound().body("track not found"),
        Ok(AddTrackOutcome::AlreadyPresent) => {
            HttpResponse::BadRequest().body("track is already in playlist")
        }
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("add track failed: {err:#}"))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/playlist/{playlist_id}/tracks/{track_id}",
    params(
        ("playlist_id" = i64, Path, description = "Playlist id"),
        ("track_id" = i64, Path, description = "Track id")
    ),
    responses(
        (status = 204, description = "Membership removed"),
        (status = 404, description = "Track not found in playlist")
    )
)]
#[delete("/api/playlist/{playlist_id}/tracks/{track_id}")]
/// Remove a track from a playlist; remaining positions are unchanged.
pub async fn remove_playlist_track(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> impl Responder {
    let (playlist_id, track_id) = path.into_inner();
    match state.db.remove_track_from_playlist(playlist_id, track_id) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().body("track not found in playlist"),
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("remove track failed: {err:#}"))
        }
    }
}
