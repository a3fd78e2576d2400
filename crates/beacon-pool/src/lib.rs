//! Tenant-keyed pool of expensive push-backend clients.
//!
//! Push clients are slow to build (configuration lookup, credential fetch
//! from blob storage, key parsing) and cheap to reuse, so each backend gets
//! one [`ClientPool`] keyed by tenant. Entries are created lazily on first
//! use, touched on every hit, and evicted by a periodic TTL sweep.
//!
//! # Concurrency discipline
//!
//! Reads (existence check + timestamp touch) take the shared lock;
//! structural mutation (insert, evict) takes the exclusive lock. Builders
//! run with **no** pool lock held — the only serialization during a build
//! is a per-tenant gate, which gives at-most-one build per tenant under
//! concurrent first-time access. An entry is never mutated after
//! construction except its last-used timestamp, which is an atomic.

mod pool;
mod sweeper;

pub use pool::ClientPool;
pub use sweeper::spawn_sweeper;
