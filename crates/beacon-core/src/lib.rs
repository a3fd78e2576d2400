//! Core types for the Beacon push gateway.
//!
//! Provides the strongly typed [`TenantId`] used to scope every credential,
//! configuration row, device registration, and pooled client in the system.

mod ids;

pub use ids::{ParseTenantIdError, TenantId};
