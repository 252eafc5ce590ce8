//! Upload, download, and stored-file handlers.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};
use futures_util::TryStreamExt;
use soundwave_types::UploadBatchResponse;

use crate::api::tracks::stream_file;
use crate::file_store::{self, MAX_UPLOAD_BYTES};
use crate::state::AppState;
use crate::upload::{self, UploadError};

/// One file pulled out of a multipart payload. `bytes` is `Err` when the
/// field was rejected while reading (oversize), so the caller can report it
/// per file without having buffered the whole body.
type IncomingFile = (String, Result<Vec<u8>, String>);

async fn collect_files(payload: &mut Multipart) -> Result<Vec<IncomingFile>, String> {
    let mut files = Vec::new();
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|err| format!("read multipart field: {err}"))?
    {
        let Some(file_name) = field
            .content_disposition()
            .get_filename()
            .map(|name| name.to_string())
        else {
            // Not a file field; drain it so the parser can advance.
            while field
                .try_next()
                .await
                .map_err(|err| format!("read multipart field: {err}"))?
                .is_some()
            {}
            continue;
        };

        let mut bytes = Vec::new();
        let mut oversize = false;
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|err| format!("read upload chunk: {err}"))?
        {
            // Keep draining past the cap so the parser reaches the next
            // boundary, but stop buffering.
            if oversize {
                continue;
            }
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                oversize = true;
                bytes.clear();
                continue;
            }
            bytes.extend_from_slice(&chunk);
        }

        if oversize {
            files.push((
                file_name,
                Err("file too large; maximum size is 100 MiB".to_string()),
            ));
        } else {
            files.push((file_name, Ok(bytes)));
        }
    }
    Ok(files)
}

#[utoipa::path(
    post,
    path = "/api/upload/audio",
    responses(
        (status = 200, description = "Track created from upload", body = soundwave_types::Track),
        (status = 400, description = "No file, unsupported type, or oversize"),
        (status = 500, description = "Storage or database failure")
    )
)]
#[post("/api/upload/audio")]
/// Upload one audio file and create its track record.
pub async fn upload_audio(state: web::Data<AppState>, mut payload: Multipart) -> impl Responder {
    let files = match collect_files(&mut payload).await {
        Ok(files) => files,
        Err(msg) => return HttpResponse::BadRequest().body(msg),
    };
    let Some((name, bytes)) = files.into_iter().next() else {
        return HttpResponse::BadRequest().body("no file provided");
    };
    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(msg) => return HttpResponse::BadRequest().body(msg),
    };
    if bytes.is_empty() {
        return HttpResponse::BadRequest().body("file is empty");
    }

    match upload::upload_one(&state.db, &state.files, &name, &bytes) {
        Ok(track) => HttpResponse::Ok().json(track),
        Err(UploadError::Rejected(msg)) => HttpResponse::BadRequest().body(msg),
        Err(UploadError::Internal(msg)) => HttpResponse::InternalServerError().body(msg),
    }
}

#[utoipa::path(
    post,
    path = "/api/upload/multiple",
    responses(
        (status = 200, description = "All files uploaded", body = [soundwave_types::Track]),
        (status = 400, description = "At least one file failed", body = UploadBatchResponse)
    )
)]
#[post("/api/upload/multiple")]
/// Upload a batch of audio files; failures are reported per file.
pub async fn upload_multiple(state: web::Data<AppState>, mut payload: Multipart) -> impl Responder {
    let files = match collect_files(&mut payload).await {
        Ok(files) => files,
        Err(msg) => return HttpResponse::BadRequest().body(msg),
    };
    if files.is_empty() {
        return HttpResponse::BadRequest().body("no files provided");
    }

    let mut ready = Vec::new();
    let mut errors = Vec::new();
    for (name, bytes) in files {
        match bytes {
            Ok(bytes) if !bytes.is_empty() => ready.push((name, bytes)),
            Ok(_) => errors.push(format!("{name}: file is empty")),
            Err(msg) => errors.push(format!("{name}: {msg}")),
        }
    }

    let (uploaded, mut upload_errors) = upload::upload_many(&state.db, &state.files, ready);
    errors.append(&mut upload_errors);

    if errors.is_empty() {
        HttpResponse::Ok().json(uploaded)
    } else {
        HttpResponse::BadRequest().json(UploadBatchResponse {
            message: "some files failed to upload".to_string(),
            errors,
            uploaded_tracks: uploaded,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/upload/download/{file_name}",
    params(("file_name" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "Full file stream"),
        (status = 206, description = "Partial content"),
        (status = 404, description = "File not found")
    )
)]
#[get("/api/upload/download/{file_name}")]
/// Download a stored audio file by its generated name.
pub async fn download_file(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let file_name = path.into_inner();
    let full_path = match state.files.resolve(&file_name) {
        Ok(path) => path,
        Err(msg) => return HttpResponse::BadRequest().body(msg),
    };
    stream_file(
        &req,
        &full_path,
        file_store::content_type_for(&file_name),
        &file_name,
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/upload/file/{file_name}",
    params(("file_name" = String, Path, description = "Stored file name")),
    responses(
        (status = 204, description = "File and track record removed"),
        (status = 404, description = "No track references the file")
    )
)]
#[delete("/api/upload/file/{file_name}")]
/// Delete a stored file and the track record referencing it.
pub async fn delete_file(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let file_name = path.into_inner();
    let track = match state.db.track_by_file_path(&file_name) {
        Ok(Some(track)) => track,
        Ok(None) => return HttpResponse::NotFound().body("track not found"),
        Err(err) => {
            return HttpResponse::InternalServerError().body(format!("fetch track failed: {err:#}"));
        }
    };

    if let Err(msg) = state.files.delete(&file_name) {
        return HttpResponse::InternalServerError().body(msg);
    }

    match state.db.delete_track(track.id) {
        Ok(_) => {
            tracing::info!(file = %file_name, track_id = track.id, "audio file deleted");
            HttpResponse::NoContent().finish()
        }
        Err(err) => {
            HttpResponse::InternalServerError().body(format!("delete track failed: {err:#}"))
        }
    }
}
