mod api;
mod config;
mod file_store;
mod library_db;
mod openapi;
mod state;
mod tag_reader;
mod upload;

use std::path::PathBuf;

use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::file_store::AudioFileStore;
use crate::library_db::LibraryDb;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "soundwave-server")]
struct Args {
    /// HTTP bind address, e.g. 0.0.0.0:8080
    #[arg(long)]
    bind: Option<std::net::SocketAddr>,

    /// Directory for uploaded audio files
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Path to the SQLite database file
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Optional server config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info")),
        )
        .init();

    let cfg = match args.config.as_ref() {
        Some(path) => config::ServerConfig::load(path)?,
        None => config::ServerConfig::default(),
    };
    let bind = match args.bind {
        Some(addr) => addr,
        None => config::bind_from_config(&cfg)?
            .unwrap_or_else(|| "0.0.0.0:8080".parse().expect("default bind")),
    };
    let storage_dir = args
        .storage_dir
        .or_else(|| config::storage_dir_from_config(&cfg))
        .unwrap_or_else(|| PathBuf::from("audio-files"));
    let db_path = args
        .db_path
        .or_else(|| config::db_path_from_config(&cfg))
        .unwrap_or_else(|| PathBuf::from("soundwave.sqlite"));

    tracing::info!(
        bind = %bind,
        storage_dir = %storage_dir.display(),
        db_path = %db_path.display(),
        "starting soundwave-server"
    );

    let db = LibraryDb::new(&db_path)?;
    let state = web::Data::new(AppState::new(db, AudioFileStore::new(storage_dir)));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default().exclude("/status"))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", openapi::ApiDoc::openapi()),
            )
            .service(api::get_status)
            .service(api::list_tracks)
            .service(api::get_track)
            .service(api::create_track)
            .service(api::update_track)
            .service(api::delete_track)
            .service(api::track_audio)
            .service(api::list_playlists)
            .service(api::get_playlist)
            .service(api::create_playlist)
            .service(api::update_playlist)
            .service(api::delete_playlist)
            .service(api::add_playlist_track)
            .service(api::remove_playlist_track)
            .service(api::upload_audio)
            .service(api::upload_multiple)
            .service(api::download_file)
            .service(api::delete_file)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
