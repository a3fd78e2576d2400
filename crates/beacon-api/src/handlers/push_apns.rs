//! APNS push handler.

use crate::handlers::{require_active_tenant, BackendPushResponse};
use crate::middleware::TenantContext;
use crate::{ApiError, AppState};
use axum::{extract::State, Extension, Json};
use beacon_push::ApnsClient;
use serde::Deserialize;
use serde_json::Value;

/// APNS push payload.
#[derive(Debug, Deserialize)]
pub struct ApnsPushRequest {
    /// Application-level user identifier, recorded in logs only.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Target device token.
    #[serde(default)]
    pub device_token: String,
    /// Notification title.
    #[serde(default)]
    pub title: String,
    /// Notification body.
    #[serde(default)]
    pub body: String,
    /// Structured custom data (dropped by the APNS adapter, see its docs).
    #[serde(default)]
    pub data: serde_json::Map<String, Value>,
}

/// `POST /push/apns` — deliver one notification via APNS.
///
/// First use per tenant builds the pooled client (configuration lookup,
/// p8 fetch, key parse); later requests reuse it. Pool entries persist
/// regardless of delivery outcome.
pub async fn push_apns_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Json(req): Json<ApnsPushRequest>,
) -> Result<Json<BackendPushResponse>, ApiError> {
    require_active_tenant(&state.pool, ctx.tenant_id()).await?;

    if req.device_token.is_empty() || req.title.is_empty() || req.body.is_empty() {
        return Err(ApiError::Validation(
            "Missing required fields: device_token, title, body".to_string(),
        ));
    }

    let tenant_id = ctx.tenant_id();
    let client = state
        .apns_clients
        .get_or_build(tenant_id, || {
            ApnsClient::build(&state.pool, state.blobs.as_ref(), tenant_id)
        })
        .await?;

    client
        .deliver(&req.device_token, &req.title, &req.body, &req.data)
        .await?;

    tracing::info!(
        tenant = %tenant_id,
        user = req.user_id.as_deref().unwrap_or(""),
        device = %req.device_token,
        "APNS push sent"
    );

    Ok(Json(BackendPushResponse {
        success: true,
        message: "APNS push notification sent successfully".to_string(),
        tenant: tenant_id.to_string(),
    }))
}
