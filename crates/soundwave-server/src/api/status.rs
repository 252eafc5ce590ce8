//! Server status endpoint.

use actix_web::{HttpResponse, Responder, get};
use chrono::Utc;
use soundwave_types::StatusResponse;

const APPLICATION: &str = "SoundWave";

#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Server status", body = StatusResponse)
    )
)]
#[get("/status")]
/// Report application name, version, and server time.
pub async fn get_status() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        application: APPLICATION.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        server_time_utc: Utc::now(),
        status: "OK".to_string(),
    })
}
