//! FCM push handler.

use crate::handlers::{require_active_tenant, BackendPushResponse};
use crate::middleware::TenantContext;
use crate::{ApiError, AppState};
use axum::{extract::State, Extension, Json};
use beacon_push::FcmClient;
use serde::Deserialize;
use serde_json::Value;

/// FCM push payload.
#[derive(Debug, Deserialize)]
pub struct FcmPushRequest {
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
    /// Structured custom data, stringified into the message.
    #[serde(default)]
    pub data: serde_json::Map<String, Value>,
}

/// `POST /push/fcm` — deliver one notification via FCM.
///
/// First use per tenant builds the pooled client (configuration lookup,
/// service-account fetch, signer setup); later requests reuse it.
pub async fn push_fcm_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Json(req): Json<FcmPushRequest>,
) -> Result<Json<BackendPushResponse>, ApiError> {
    require_active_tenant(&state.pool, ctx.tenant_id()).await?;

    if req.device_token.is_empty() || req.title.is_empty() || req.body.is_empty() {
        return Err(ApiError::Validation(
            "Missing required fields: device_token, title, body".to_string(),
        ));
    }

    let tenant_id = ctx.tenant_id();
    let client = state
        .fcm_clients
        .get_or_build(tenant_id, || {
            FcmClient::build(&state.pool, state.blobs.as_ref(), tenant_id)
        })
        .await?;

    client
        .deliver(&req.device_token, &req.title, &req.body, &req.data)
        .await?;

    tracing::info!(
        tenant = %tenant_id,
        user = req.user_id.as_deref().unwrap_or(""),
        device = %req.device_token,
        "FCM push sent"
    );

    Ok(Json(BackendPushResponse {
        success: true,
        message: "FCM push notification sent successfully".to_string(),
        tenant: tenant_id.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: FcmPushRequest = serde_json::from_str("{}").unwrap();
        assert!(req.device_token.is_empty());
        assert!(req.data.is_empty());
    }

    #[test]
    fn test_response_shape() {
        let response = BackendPushResponse {
            success: true,
            message: "FCM push notification sent successfully".to_string(),
            tenant: "acme".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["tenant"], "acme");
    }
}
