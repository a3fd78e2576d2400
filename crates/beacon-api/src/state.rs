//! Application state shared across all request handlers.

use beacon_auth::DigestCache;
use beacon_pool::ClientPool;
use beacon_push::{ApnsClient, FcmClient};
use beacon_storage::BlobStore;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared state handed to every handler.
///
/// Cloned per request; every field is a pool handle or an `Arc`, so clones
/// are cheap. The digest cache and the two client pools are the only
/// mutable shared structures in the process — each is constructed once at
/// startup and owned here.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Digest → tenant authentication cache.
    pub digest_cache: Arc<DigestCache>,

    /// Blob store holding per-tenant push credentials.
    pub blobs: Arc<dyn BlobStore>,

    /// Pooled APNS clients, keyed by tenant.
    pub apns_clients: Arc<ClientPool<ApnsClient>>,

    /// Pooled FCM clients, keyed by tenant.
    pub fcm_clients: Arc<ClientPool<FcmClient>>,
}

impl AppState {
    /// Assemble the state from its explicitly constructed parts.
    #[must_use]
    pub fn new(
        pool: PgPool,
        digest_cache: Arc<DigestCache>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            pool,
            digest_cache,
            blobs,
            apns_clients: Arc::new(ClientPool::new()),
            fcm_clients: Arc::new(ClientPool::new()),
        }
    }
}
