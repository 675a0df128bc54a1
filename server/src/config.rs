//! Server configuration parsed from environment variables.
//!
//! `.env` files are loaded by `main` through `dotenvy` before parsing.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DROPBOX_API_BASE_URL: &str = "https://api.dropboxapi.com";
pub const DEFAULT_DROPBOX_CONTENT_BASE_URL: &str = "https://content.dropboxapi.com";
pub const DEFAULT_DROPBOX_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DROPBOX_CONNECT_TIMEOUT_SECS: u64 = 10;
const EXPORT_SUBDIR: &str = "clustica-exports";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: &'static str },
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropboxTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Dropbox API access. Present only when `DROPBOX_ACCESS_TOKEN` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropboxConfig {
    pub access_token: String,
    pub api_base_url: String,
    pub content_base_url: String,
    pub timeouts: DropboxTimeouts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub cookie_secure: bool,
    /// Scratch directory for EPUB generation.
    pub export_dir: PathBuf,
    pub dropbox: Option<DropboxConfig>,
}

impl ServerConfig {
    /// Build typed config from process environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `COOKIE_SECURE`: boolean, default false
    /// - `EXPORT_DIR`: default `<tmp>/clustica-exports`
    /// - `DROPBOX_ACCESS_TOKEN`: enables Dropbox features
    /// - `DROPBOX_API_BASE_URL`, `DROPBOX_CONTENT_BASE_URL`
    /// - `DROPBOX_REQUEST_TIMEOUT_SECS`: default 60
    /// - `DROPBOX_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric/boolean
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing { var: "DATABASE_URL" })?;
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { var: "COOKIE_SECURE", value: raw })?,
            None => false,
        };
        let export_dir = lookup("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(EXPORT_SUBDIR));
        let dropbox = DropboxConfig::from_lookup(&lookup)?;

        Ok(Self { database_url, port, db_max_connections, cookie_secure, export_dir, dropbox })
    }
}

impl DropboxConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(access_token) = lookup("DROPBOX_ACCESS_TOKEN").filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };
        let api_base_url = base_url(lookup, "DROPBOX_API_BASE_URL", DEFAULT_DROPBOX_API_BASE_URL);
        let content_base_url = base_url(lookup, "DROPBOX_CONTENT_BASE_URL", DEFAULT_DROPBOX_CONTENT_BASE_URL);
        let timeouts = DropboxTimeouts {
            request_secs: parse_or(lookup, "DROPBOX_REQUEST_TIMEOUT_SECS", DEFAULT_DROPBOX_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_or(lookup, "DROPBOX_CONNECT_TIMEOUT_SECS", DEFAULT_DROPBOX_CONNECT_TIMEOUT_SECS)?,
        };
        Ok(Some(Self { access_token: access_token.trim().to_owned(), api_base_url, content_base_url, timeouts }))
    }
}

/// Parse a loose boolean (`1/true/yes/on`, `0/false/no/off`, any case).
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}

fn base_url<F>(lookup: &F, var: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .unwrap_or_else(|| default.to_owned())
        .trim_end_matches('/')
        .to_owned()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
