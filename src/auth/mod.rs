//! Bearer-token authentication and role checks.
//!
//! Identity lookups go through the [`IdentityProvider`] port. The
//! [`CachingIdentityProvider`] decorator keeps recent answers in a bounded
//! TTL cache so repeated requests with the same credential skip the provider
//! until the entry expires.

pub mod adapters;
mod caching;
mod identity;
mod role;

pub use caching::{CachingIdentityProvider, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS};
pub use identity::{AuthError, Identity, IdentityProvider};
#[cfg(test)]
pub use identity::MockIdentityProvider;
pub use role::Role;
