//! Track CRUD and audio serving handlers.

use std::path::Path;

use actix_web::body::SizedStream;
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};
use serde::Deserialize;
use soundwave_types::{Track, TrackPayload};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use utoipa::ToSchema;

use crate::file_store;
use crate::library_db::UpdateOutcome;
use crate::state::AppState;

/// Query parameters for track listing.
#[derive(Deserialize, ToSchema)]
pub struct TrackListQuery {
    /// Optional substring matched against title, artist, and album.
    #[serde(default)]
    pub search: Option<String>,
}

pub(crate) fn validate_track_payload(payload: &TrackPayload) -> Result<(), String> {
    if payload.title.trim().is_empty() {
        return Err("title is required".to_string());
    }
    if payload.title.chars().count() > 200 {
        return Err("title exceeds 200 characters".to_string());
    }
    if payload.artist.trim().is_empty() {
        return Err("artist is required".to_string());
    }
    if payload.artist.chars().count() > 200 {
        return Err("artist exceeds 200 characters".to_string());
    }
    if payload.album.chars().count() > 200 {
        return Err("album exceeds 200 characters".to_string());
    }
    if payload.file_path.chars().count() > 500 {
        return Err("filePath exceeds 500 characters".to_string());
    }
    if payload.duration_seconds < 0 {
        return Err("durationSeconds must be non-negative".to_string());
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/track",
    params(
        ("search" = Option<String>, Query, description = "Substring filter over title, artist, and album")
    ),
    responses(
        (status = 200, description = "Tracks ordered by title", body = [Track])
    )
)]
#[get("/api/track")]
/// List tracks, optionally filtered by a search term.
pub async fn list_tracks(
    state: web::Data<AppState>,
    query: web::Query<TrackListQuery>,
) -> impl Responder {
    match state.db.list_tracks(query.search.as_deref()) {
        Ok(tracks) => HttpResponse::Ok().json(tracks),
        Err(err) => HttpResponse::InternalServerError().body(format!("list tracks failed: {err:#}")),
    }
}

#[utoipa::path(
    get,
    path = "/api/track/{id}",
    params(("id" = i64, Path, description = "Track id")),
    responses(
        (status = 200, description = "Track record", body = Track),
        (status = 404, description = "Track not found")
    )
)]
#[get("/api/track/{id}")]
/// Fetch a single track by id.
pub async fn get_track(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.db.track_by_id(path.into_inner()) {
        Ok(Some(track)) => HttpResponse::Ok().json(track),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(err) => HttpResponse::InternalServerError().body(format!("fetch track failed: {err:#}")),
    }
}

#[utoipa::path(
    post,
    path = "/api/track",
    request_body = TrackPayload,
    responses(
        (status = 201, description = "Track created", body = Track),
        (status = 400, description = "Validation failed")
    )
)]
#[post("/api/track")]
/// Create a track record.
pub async fn create_track(
    state: web::Data<AppState>,
    body: web::Json<TrackPayload>,
) -> impl Responder {
    if let Err(msg) = validate_track_payload(&body) {
        return HttpResponse::BadRequest().body(msg);
    }
    match state.db.insert_track(&body) {
        Ok(track) => HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/api/track/{}", track.id)))
            .json(track),
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("create track failed: {err:#}"))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/track/{id}",
    params(("id" = i64, Path, description = "Track id")),
    request_body = TrackPayload,
    responses(
        (status = 204, description = "Track updated"),
        (status = 400, description = "Id mismatch or validation failed"),
        (status = 404, description = "Track not found"),
        (status = 409, description = "Track changed concurrently")
    )
)]
#[put("/api/track/{id}")]
/// Replace all fields of a track.
pub async fn update_track(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<TrackPayload>,
) -> impl Responder {
    let id = path.into_inner();
    if body.id != id {
        return HttpResponse::BadRequest().body("payload id does not match path id");
    }
    if let Err(msg) = validate_track_payload(&body) {
        return HttpResponse::BadRequest().body(msg);
    }
    match state.db.update_track(id, &body) {
        Ok(UpdateOutcome::Updated) => HttpResponse::NoContent().finish(),
        Ok(UpdateOutcome::Missing) => HttpResponse::NotFound().finish(),
        Ok(UpdateOutcome::Conflict) => {
            HttpResponse::Conflict().body("track changed concurrently; fetch and retry")
        }
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("update track failed: {err:#}"))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/track/{id}",
    params(("id" = i64, Path, description = "Track id")),
    responses(
        (status = 204, description = "Track deleted"),
        (status = 404, description = "Track not found")
    )
)]
#[delete("/api/track/{id}")]
/// Delete a track and its playlist memberships.
pub async fn delete_track(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.db.delete_track(path.into_inner()) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().finish(),
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("delete track failed: {err:#}"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/track/{id}/audio",
    params(("id" = i64, Path, description = "Track id")),
    responses(
        (status = 200, description = "Full audio stream"),
        (status = 206, description = "Partial content"),
        (status = 404, description = "Track or file not found"),
        (status = 416, description = "Invalid range")
    )
)]
#[get("/api/track/{id}/audio")]
/// Stream a track's audio file with HTTP range support.
pub async fn track_audio(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let track = match state.db.track_by_id(path.into_inner()) {
        Ok(Some(track)) => track,
        Ok(None) => return HttpResponse::NotFound().finish(),
        Err(err) => {
            return HttpResponse::InternalServerError().body(format!("fetch track failed: {err:#}"));
        }
    };
    if track.file_path.is_empty() {
        return HttpResponse::NotFound().body("audio file not found on disk");
    }
    let full_path = match state.files.resolve(&track.file_path) {
        Ok(path) => path,
        Err(msg) => return HttpResponse::BadRequest().body(msg),
    };
    let download_name = format!("{}.{}", track.title, track.audio_format);
    stream_file(
        &req,
        &full_path,
        file_store::content_type_for(&track.file_path),
        &download_name,
    )
    .await
}

/// Stream a stored file with HTTP range support.
///
/// A database record may outlive its file; a missing file is a 404 here.
pub(crate) async fn stream_file(
    req: &HttpRequest,
    path: &Path,
    content_type: &str,
    download_name: &str,
) -> HttpResponse {
    let mut file = match tokio::fs::File::open(path).await {
        Ok(f) => f,
        Err(_) => return HttpResponse::NotFound().body("audio file not found on disk"),
    };
    let meta = match file.metadata().await {
        Ok(m) => m,
        Err(_) => return HttpResponse::NotFound().body("audio file not found on disk"),
    };
    let total_len = meta.len();

    let range_header = req
        .headers()
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok());
    let range = match range_header.and_then(|h| parse_single_range(h, total_len)) {
        Some(r) => Some(r),
        None if range_header.is_some() => {
            return HttpResponse::RangeNotSatisfiable()
                .insert_header((header::ACCEPT_RANGES, "bytes"))
                .finish();
        }
        None => None,
    };

    let (start, len, status_code) = if let Some((start, end)) = range {
        let len = end.saturating_sub(start).saturating_add(1);
        (start, len, StatusCode::PARTIAL_CONTENT)
    } else {
        (0, total_len, StatusCode::OK)
    };

    if start > 0 {
        if file.seek(std::io::SeekFrom::Start(start)).await.is_err() {
            return HttpResponse::InternalServerError().finish();
        }
    }

    let stream = ReaderStream::new(file.take(len));
    let body = SizedStream::new(len, stream);

    let mut resp = HttpResponse::build(status_code);
    resp.insert_header((header::ACCEPT_RANGES, "bytes"));
    resp.insert_header((header::CONTENT_TYPE, content_type));
    resp.insert_header((
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{download_name}\""),
    ));
    if let Some((start, end)) = range {
        resp.insert_header((
            header::CONTENT_RANGE,
            format!("bytes {start}-{end}/{total_len}"),
        ));
    }
    resp.insert_header((header::CONTENT_LENGTH, len.to_string()));
    resp.body(body)
}

pub(crate) fn parse_single_range(header: &str, total_len: u64) -> Option<(u64, u64)> {
    let header = header.trim();
    if !header.starts_with("bytes=") {
        return None;
    }
    let range = header.trim_start_matches("bytes=");
    let first = range.split(',').next()?;
    let (start_s, end_s) = first.split_once('-')?;
    if start_s.is_empty() {
        return None;
    }
    let start = start_s.parse::<u64>().ok()?;
    let end = if end_s.is_empty() {
        total_len.saturating_sub(1)
    } else {
        end_s.parse::<u64>().ok()?
    };
    if start >= total_len || end < start {
        return None;
    }
    Some((start, end.min(total_len.saturating_sub(1))))
}
