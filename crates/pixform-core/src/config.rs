//! Configuration module
//!
//! Runtime settings for the image service: bind address, where the frontend
//! bundle lives, where processed images are written and request limits.
//! Everything is passed to the HTTP layer explicitly so tests can point the
//! service at temporary directories.

use std::env;
use std::path::PathBuf;

use anyhow::Context;

const SERVER_HOST: &str = "0.0.0.0";
const SERVER_PORT: u16 = 5000;
const STATIC_ROOT: &str = "client/build";
const UPLOADS_SUBDIR: &str = "static/uploads";
const MAX_UPLOAD_SIZE_MB: usize = 16;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub environment: String,
    pub server_host: String,
    pub server_port: u16,
    /// Root of the prebuilt frontend bundle served for `GET /` and `GET /<path>`.
    pub static_root: PathBuf,
    /// Flat directory that receives every processed image.
    pub upload_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub cors_origins: Vec<String>,
}

impl ServiceConfig {
    /// Config with default limits rooted at the given directories.
    pub fn new(static_root: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            environment: "development".to_string(),
            server_host: SERVER_HOST.to_string(),
            server_port: SERVER_PORT,
            static_root: static_root.into(),
            upload_dir: upload_dir.into(),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            cors_origins: vec!["*".to_string()],
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| SERVER_HOST.to_string());

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("SERVER_PORT must be a port number, got '{}'", raw))?,
            None => SERVER_PORT,
        };

        let static_root = PathBuf::from(lookup("STATIC_ROOT").unwrap_or_else(|| STATIC_ROOT.to_string()));
        let upload_dir = lookup("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| static_root.join(UPLOADS_SUBDIR));

        let max_upload_size_mb = match lookup("MAX_UPLOAD_SIZE_MB") {
            Some(raw) => raw.trim().parse::<usize>().with_context(|| {
                format!("MAX_UPLOAD_SIZE_MB must be a whole number, got '{}'", raw)
            })?,
            None => MAX_UPLOAD_SIZE_MB,
        };

        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .with_context(|| format!("MAX_UPLOAD_SIZE_MB is too large: {}", max_upload_size_mb))?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            environment,
            server_host,
            server_port,
            static_root,
            upload_dir,
            max_upload_size_bytes,
            cors_origins,
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_port == 0 {
            anyhow::bail!("SERVER_PORT cannot be 0");
        }
        if self.max_upload_size_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_SIZE_MB cannot be 0");
        }
        if self.is_production() && self.allows_any_origin() {
            anyhow::bail!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            );
        }
        Ok(())
    }
}
