//! Configuration loading and parsing.
//!
//! Defines the server config schema and resolves defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level server configuration loaded from TOML.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Bind address (host:port).
    pub bind: Option<String>,
    /// Directory for uploaded audio files.
    pub storage_dir: Option<String>,
    /// Path to the SQLite database file.
    pub db_path: Option<String>,
}

impl ServerConfig {
    /// Load configuration from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            std::fs::read_to_string(path).with_context(|| format!("read config {:?}", path))?;
        let cfg = toml::from_str::<ServerConfig>(&raw)
            .with_context(|| format!("parse config {:?}", path))?;
        Ok(cfg)
    }
}

/// Parse an optional bind address from config.
pub fn bind_from_config(cfg: &ServerConfig) -> Result<Option<SocketAddr>> {
    let Some(bind) = cfg.bind.as_deref() else {
        return Ok(None);
    };
    let addr = bind.parse().with_context(|| format!("parse bind {bind}"))?;
    Ok(Some(addr))
}

/// Extract the optional storage directory from config.
pub fn storage_dir_from_config(cfg: &ServerConfig) -> Option<PathBuf> {
    non_empty_path(cfg.storage_dir.as_deref())
}

/// Extract the optional database path from config.
pub fn db_path_from_config(cfg: &ServerConfig) -> Option<PathBuf> {
    non_empty_path(cfg.db_path.as_deref())
}

fn non_empty_path(raw: Option<&str>) -> Option<PathBuf> {
    raw.and_then(|path| {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    })
}
