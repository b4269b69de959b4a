//! Identity provider decorator that caches successful lookups.

use super::{AuthError, Identity, IdentityProvider};
use async_trait::async_trait;
use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default lifetime of a cached identity, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default number of cached identities.
pub const DEFAULT_CACHE_CAPACITY: u64 = 1024;

type TokenDigest = [u8; 32];

/// Caches identities returned by an inner provider.
///
/// Only successful lookups are cached, keyed by a SHA-256 digest of the
/// token so raw credentials are not retained. Unknown tokens and provider
/// failures always reach the inner provider.
pub struct CachingIdentityProvider<P>
where
    P: IdentityProvider + ?Sized,
{
    inner: Arc<P>,
    cache: Cache<TokenDigest, Identity>,
}

impl<P> CachingIdentityProvider<P>
where
    P: IdentityProvider + ?Sized,
{
    /// Wraps `inner` with a cache of the given lifetime and size.
    #[must_use]
    pub fn new(inner: Arc<P>, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(capacity)
            .build();
        Self { inner, cache }
    }
}

fn digest(token: &str) -> TokenDigest {
    Sha256::digest(token.as_bytes()).into()
}

#[async_trait]
impl<P> IdentityProvider for CachingIdentityProvider<P>
where
    P: IdentityProvider + ?Sized,
{
    async fn identify(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        let key = digest(token);
        if let Some(identity) = self.cache.get(&key).await {
            debug!(user_id = %identity.user_id, "identity served from cache");
            return Ok(Some(identity));
        }

        let resolved = self.inner.identify(token).await?;
        if let Some(identity) = resolved {
            self.cache.insert(key, identity).await;
        }
        Ok(resolved)
    }
}
