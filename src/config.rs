//! Runtime configuration for the server binary

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Port used when neither `--port` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The PORT environment variable is not a valid port number
    #[error("invalid PORT value '{0}'")]
    InvalidPort(String),
}

/// spritetint - tint and composite PNG sprites over HTTP
#[derive(Debug, Parser)]
#[command(name = "spritetint")]
#[command(about = "Serve per-channel tinted PNG sprites over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to listen on (falls back to the PORT environment variable,
    /// then 3000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory containing the icons/ and overlays/ asset folders
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,
}

impl Config {
    /// Resolve the listen port: CLI flag, then PORT env var, then default.
    pub fn port(&self) -> Result<u16, ConfigError> {
        if let Some(port) = self.port {
            return Ok(port);
        }
        match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value)),
            Err(_) => Ok(DEFAULT_PORT),
        }
    }
}
