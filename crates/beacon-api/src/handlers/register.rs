//! Device registration handler.

use crate::handlers::require_active_tenant;
use crate::middleware::TenantContext;
use crate::{ApiError, AppState};
use axum::{extract::State, Extension, Json};
use beacon_db::models::DeviceToken;
use serde::{Deserialize, Serialize};

/// Device registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Backend-issued device token.
    #[serde(default)]
    pub device_token: String,
    /// Application-level user identifier.
    #[serde(default)]
    pub user_id: String,
    /// Target platform (e.g. `"ios"`).
    #[serde(default)]
    pub platform: String,
}

/// Device registration response.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    /// Identifier of the (created or refreshed) registration row.
    pub id: i64,
    /// The tenant's display name.
    pub tenant: String,
}

/// `POST /register` — register or refresh a device token.
///
/// Re-registering the same (tenant, user, platform) updates the stored
/// token rather than creating a duplicate.
pub async fn register_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let tenant = require_active_tenant(&state.pool, ctx.tenant_id()).await?;

    if req.device_token.is_empty() || req.user_id.is_empty() || req.platform.is_empty() {
        return Err(ApiError::Validation(
            "Missing required fields: device_token, user_id, platform".to_string(),
        ));
    }

    let device = DeviceToken::upsert(
        &state.pool,
        ctx.tenant_id().as_str(),
        &req.user_id,
        &req.platform,
        &req.device_token,
    )
    .await?;

    tracing::info!(
        tenant = %ctx.tenant_id(),
        user = %req.user_id,
        platform = %req.platform,
        "Device registered"
    );

    Ok(Json(RegisterResponse {
        success: true,
        message: "Device registered successfully".to_string(),
        id: device.id,
        tenant: tenant.name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_fields_default_to_empty() {
        let req: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(req.device_token.is_empty());
        assert!(req.user_id.is_empty());
        assert!(req.platform.is_empty());
    }

    #[test]
    fn test_request_deserializes() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"device_token": "abc", "user_id": "u1", "platform": "ios"}"#,
        )
        .unwrap();
        assert_eq!(req.device_token, "abc");
        assert_eq!(req.user_id, "u1");
        assert_eq!(req.platform, "ios");
    }

    #[test]
    fn test_response_serializes() {
        let response = RegisterResponse {
            success: true,
            message: "Device registered successfully".to_string(),
            id: 42,
            tenant: "Acme Corp".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["id"], 42);
        assert_eq!(json["tenant"], "Acme Corp");
    }
}
