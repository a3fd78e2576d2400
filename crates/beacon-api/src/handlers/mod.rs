//! Request handlers.

mod push;
mod push_apns;
mod push_fcm;
mod register;

pub use push::{push_handler, PushRequest, PushResponse};
pub use push_apns::{push_apns_handler, ApnsPushRequest};
pub use push_fcm::{push_fcm_handler, FcmPushRequest};
pub use register::{register_handler, RegisterRequest, RegisterResponse};

use crate::ApiError;
use beacon_core::TenantId;
use beacon_db::models::Tenant;
use sqlx::PgPool;

/// Response body shared by the backend-specific push endpoints.
#[derive(Debug, serde::Serialize)]
pub struct BackendPushResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// Echo of the authenticated tenant.
    pub tenant: String,
}

/// Load the tenant row and require it to be active.
///
/// Every authenticated request re-reads the tenant row: deactivating a
/// tenant takes effect on their next call, not at the next digest reload.
pub(crate) async fn require_active_tenant(
    pool: &PgPool,
    tenant_id: &TenantId,
) -> Result<Tenant, ApiError> {
    let tenant = Tenant::find_by_tenant_id(pool, tenant_id.as_str())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid tenant".to_string()))?;

    if !tenant.active {
        return Err(ApiError::Forbidden("Tenant is not active".to_string()));
    }
    Ok(tenant)
}
