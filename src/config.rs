//! Server configuration from flags and environment variables.

use crate::auth::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS};
use crate::notify::DEFAULT_EVENT_BUFFER;
use crate::ticket::domain::{UserId, WorkOrder};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use clap::Parser;
use serde::Deserialize;
use std::net::SocketAddr;
use thiserror::Error;

/// Default size of the `PostgreSQL` connection pool.
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Runtime settings for the `qualidesk` server.
#[derive(Debug, Clone, Parser)]
#[command(name = "qualidesk", version, about)]
pub struct ServerConfig {
    /// Address the HTTP server listens on.
    #[arg(long, env = "QUALIDESK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// `PostgreSQL` connection URL; tickets are kept in memory when unset.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "QUALIDESK_POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: u32,

    /// Events buffered per stream subscriber before it is cut off.
    #[arg(long, env = "QUALIDESK_EVENT_BUFFER", default_value_t = DEFAULT_EVENT_BUFFER)]
    pub event_buffer: usize,

    /// Lifetime of a cached token lookup, in seconds.
    #[arg(long, env = "QUALIDESK_AUTH_CACHE_TTL_SECS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub auth_cache_ttl_secs: u64,

    /// Maximum number of cached token lookups.
    #[arg(long, env = "QUALIDESK_AUTH_CACHE_CAPACITY", default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub auth_cache_capacity: u64,

    /// JSON file mapping bearer tokens to identities.
    #[arg(long, env = "QUALIDESK_TOKENS_FILE")]
    pub tokens_file: Utf8PathBuf,

    /// Directory holding attachment content; kept in memory when unset.
    #[arg(long, env = "QUALIDESK_BLOB_DIR")]
    pub blob_dir: Option<Utf8PathBuf>,

    /// JSON file of work orders and users loaded into the in-memory store.
    #[arg(long, env = "QUALIDESK_SEED_FILE")]
    pub seed_file: Option<Utf8PathBuf>,

    /// `tracing` filter directive.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

/// Reference data for the in-memory store.
///
/// ```json
/// { "workOrders": [{ "id": 1, "number": "24113" }], "users": [1, 2] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedData {
    /// Work orders tickets may be filed against.
    pub work_orders: Vec<WorkOrder>,
    /// Users tickets may reference.
    pub users: Vec<UserId>,
}

/// Errors raised while reading a seed file.
#[derive(Debug, Error)]
pub enum SeedFileError {
    /// The file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    Io {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid seed JSON.
    #[error("invalid seed file {path}: {source}")]
    Parse {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

impl SeedData {
    /// Reads seed data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SeedFileError`] when the file cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, SeedFileError> {
        let io_error = |source| SeedFileError::Io {
            path: path.to_owned(),
            source,
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error(std::io::Error::other("path must include a file name")))?;
        let parent = path
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
        let contents = dir.read_to_string(file_name).map_err(io_error)?;
        serde_json::from_str(&contents).map_err(|source| SeedFileError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}
