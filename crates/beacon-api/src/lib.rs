//! HTTP surface of the Beacon push gateway.
//!
//! Request flow: digest authentication middleware resolves the caller's
//! rotating digest to a [`beacon_core::TenantId`] via the in-memory cache,
//! then the handlers dispatch — validate the body, check the tenant row,
//! fetch or build the tenant's pooled push client, and deliver.

pub mod handlers;
pub mod middleware;
pub mod seed;

mod error;
mod router;
mod state;

pub use error::ApiError;
pub use router::gateway_router;
pub use state::AppState;
