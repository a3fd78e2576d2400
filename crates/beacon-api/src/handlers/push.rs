//! Generic push handler — the stubbed fan-out path.
//!
//! Resolves the tenant's registered devices (optionally filtered by user)
//! and logs a simulated delivery per device instead of dispatching to a
//! backend. Intentional: callers that want real delivery use the
//! backend-specific endpoints.

use crate::handlers::require_active_tenant;
use crate::middleware::TenantContext;
use crate::{ApiError, AppState};
use axum::{extract::State, Extension, Json};
use beacon_db::models::DeviceToken;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic push payload.
#[derive(Debug, Deserialize)]
pub struct PushRequest {
    /// Restrict the fan-out to one user's devices.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Notification title.
    #[serde(default)]
    pub title: String,
    /// Notification body.
    #[serde(default)]
    pub body: String,
    /// Structured custom data, echoed into the simulation log.
    #[serde(default)]
    pub data: serde_json::Map<String, Value>,
}

/// Generic push response.
#[derive(Debug, Serialize)]
pub struct PushResponse {
    pub success: bool,
    pub message: String,
    /// How many devices the notification fanned out to.
    pub devices_sent: usize,
}

/// `POST /push` — simulated fan-out to a tenant's registered devices.
pub async fn push_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Json(req): Json<PushRequest>,
) -> Result<Json<PushResponse>, ApiError> {
    require_active_tenant(&state.pool, ctx.tenant_id()).await?;

    if req.title.is_empty() || req.body.is_empty() {
        return Err(ApiError::Validation(
            "Missing required fields: title, body".to_string(),
        ));
    }

    let devices = DeviceToken::list_for_tenant(
        &state.pool,
        ctx.tenant_id().as_str(),
        req.user_id.as_deref(),
    )
    .await?;

    if devices.is_empty() {
        return Err(ApiError::NotFound(
            "No devices found for push notification".to_string(),
        ));
    }

    for device in &devices {
        let data = Value::Object(req.data.clone());
        tracing::info!(
            tenant = %ctx.tenant_id(),
            user = %device.user_id,
            platform = %device.platform,
            device = %device.device_token,
            title = %req.title,
            body = %req.body,
            data = %data,
            "Simulated push delivery"
        );
    }

    Ok(Json(PushResponse {
        success: true,
        message: "Push notification sent".to_string(),
        devices_sent: devices.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: PushRequest = serde_json::from_str(r#"{"title": "t", "body": "b"}"#).unwrap();
        assert_eq!(req.user_id, None);
        assert!(req.data.is_empty());
    }

    #[test]
    fn test_request_with_user_filter_and_data() {
        let req: PushRequest = serde_json::from_str(
            r#"{"user_id": "u1", "title": "t", "body": "b", "data": {"k": 1}}"#,
        )
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert_eq!(req.data["k"], 1);
    }

    #[test]
    fn test_response_serializes() {
        let response = PushResponse {
            success: true,
            message: "Push notification sent".to_string(),
            devices_sent: 3,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["devices_sent"], 3);
    }
}
