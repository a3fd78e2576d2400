//! Push client adapters for the Beacon gateway.
//!
//! Two adapters, one per backend, each exposing the same shape: a builder
//! that assembles a live client from the tenant's configuration row plus a
//! credential fetched from blob storage, and a `deliver` operation that
//! sends one notification and surfaces the backend's outcome.
//!
//! Clients are expensive to build (blob fetch, key parsing, token signing)
//! and are meant to live in a [`beacon_pool::ClientPool`]; nothing in this
//! crate caches clients itself.

pub mod apns;
pub mod fcm;

mod error;

pub use apns::{ApnsClient, ApnsEnvironment};
pub use error::PushError;
pub use fcm::FcmClient;
