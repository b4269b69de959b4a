//! Process bootstrap: storage selection, service wiring, and the HTTP loop.

use crate::attachment::adapters::{DirectoryBlobStore, InMemoryBlobStore};
use crate::attachment::{BlobStore, BlobStoreError};
use crate::audit::{AuditSink, adapters::TracingAuditSink};
use crate::auth::{
    CachingIdentityProvider, IdentityProvider,
    adapters::{StaticTokenProvider, TokenFileError},
};
use crate::config::{SeedData, SeedFileError, ServerConfig};
use crate::http::{AppComponents, AppState, router};
use crate::notify::TicketNotifier;
use crate::ticket::{
    adapters::{
        memory::InMemoryTicketRepository,
        postgres::{PostgresTicketRepository, TicketPgPool},
    },
    ports::{TicketRepository, TicketRepositoryError},
};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Errors that stop the server from starting or keep it from running.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The token table could not be loaded.
    #[error(transparent)]
    Tokens(#[from] TokenFileError),

    /// The seed file could not be loaded.
    #[error(transparent)]
    Seed(#[from] SeedFileError),

    /// Seeding the in-memory store failed.
    #[error("failed to seed in-memory store: {0}")]
    Store(#[from] TicketRepositoryError),

    /// The database pool could not be created.
    #[error("failed to connect to database: {0}")]
    Database(#[from] PoolError),

    /// The blob directory could not be opened.
    #[error("failed to open blob directory: {0}")]
    Blobs(#[from] BlobStoreError),

    /// Binding or serving the listener failed.
    #[error("server I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking startup task panicked.
    #[error("startup task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds the application state described by `config`.
///
/// # Errors
///
/// Returns [`StartupError`] when any backing store cannot be prepared.
pub async fn build_state(config: &ServerConfig) -> Result<AppState, StartupError> {
    let tokens = StaticTokenProvider::load(&config.tokens_file)?;
    info!(tokens = tokens.len(), path = %config.tokens_file, "token table loaded");

    let repository = open_repository(config, &tokens).await?;
    let blobs: Arc<dyn BlobStore> = match &config.blob_dir {
        Some(dir) => {
            info!(path = %dir, "storing attachments on disk");
            Arc::new(DirectoryBlobStore::open(dir)?)
        }
        None => {
            warn!("no blob directory configured; attachments are kept in memory");
            Arc::new(InMemoryBlobStore::new())
        }
    };

    let identities: Arc<dyn IdentityProvider> = Arc::new(CachingIdentityProvider::new(
        Arc::new(tokens),
        Duration::from_secs(config.auth_cache_ttl_secs),
        config.auth_cache_capacity,
    ));
    let audit: Arc<dyn AuditSink> = Arc::new(TracingAuditSink);

    Ok(AppState::new(AppComponents {
        repository,
        blobs,
        identities,
        audit,
        notifier: TicketNotifier::new(config.event_buffer),
    }))
}

async fn open_repository(
    config: &ServerConfig,
    tokens: &StaticTokenProvider,
) -> Result<Arc<dyn TicketRepository>, StartupError> {
    if let Some(url) = config.database_url.clone() {
        let max_size = config.pool_size;
        let pool: TicketPgPool = tokio::task::spawn_blocking(move || {
            Pool::builder()
                .max_size(max_size)
                .build(ConnectionManager::<PgConnection>::new(url))
        })
        .await??;
        info!(pool_size = max_size, "connected to PostgreSQL");
        return Ok(Arc::new(PostgresTicketRepository::new(pool)));
    }

    warn!("DATABASE_URL is not set; tickets are kept in memory");
    let repository = InMemoryTicketRepository::new();
    for identity in tokens.identities() {
        repository.insert_user(identity.user_id)?;
    }
    if let Some(path) = &config.seed_file {
        let seed = SeedData::load(path)?;
        info!(
            work_orders = seed.work_orders.len(),
            users = seed.users.len(),
            "seeding in-memory store"
        );
        for work_order in seed.work_orders {
            repository.insert_work_order(work_order)?;
        }
        for user in seed.users {
            repository.insert_user(user)?;
        }
    }
    Ok(Arc::new(repository))
}

/// Serves the API until Ctrl-C.
///
/// # Errors
///
/// Returns [`StartupError`] when startup fails or the listener errors.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let state = build_state(&config).await?;
    let listener = TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "qualidesk listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("qualidesk stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
