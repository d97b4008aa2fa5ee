use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Server configuration, read from `FERRY_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory whose direct children are served.
    pub root: PathBuf,
    pub chunk_bytes: usize,
    pub delay: Duration,
    /// Emit attachment Content-Disposition headers.
    pub attachment: bool,
    /// Fixed content type for every file; probed per file when unset.
    pub content_type: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("FERRY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("FERRY_PORT")
            .unwrap_or_else(|_| "3210".into())
            .parse()
            .context("FERRY_PORT must be a port number")?;
        let root: PathBuf = std::env::var("FERRY_ROOT")
            .unwrap_or_else(|_| "./files".into())
            .into();
        let chunk_bytes: usize = std::env::var("FERRY_CHUNK_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(40960);
        let delay_ms: u64 = std::env::var("FERRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);
        let attachment = std::env::var("FERRY_ATTACHMENT")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let content_type = std::env::var("FERRY_CONTENT_TYPE")
            .ok()
            .filter(|v| !v.is_empty());

        Ok(Self {
            host,
            port,
            root,
            chunk_bytes,
            delay: Duration::from_millis(delay_ms),
            attachment,
            content_type,
        })
    }
}
