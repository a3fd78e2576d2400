//! Digest authentication middleware.
//!
//! Extracts the caller's rotating digest from the `Authorization` header
//! (`Digest <token>`), resolves it to a tenant through the in-memory
//! [`DigestCache`], and inserts a [`TenantContext`] into request extensions
//! for the rest of that request's handling. Rejections happen before any
//! tenant-scoped state is touched; resolution is a pure function of the
//! header plus current cache state.

use crate::ApiError;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use beacon_auth::DigestCache;
use beacon_core::TenantId;
use std::sync::Arc;

/// The credential header scheme label.
pub const DIGEST_SCHEME: &str = "Digest";

/// Tenant identity resolved for the current request.
///
/// Inserted into request extensions on successful authentication; handlers
/// read it via `Extension<TenantContext>`.
#[derive(Debug, Clone)]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    /// Create a new tenant context.
    #[must_use]
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    /// The resolved tenant.
    #[must_use]
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }
}

/// Extract the digest token from an `Authorization` header value.
///
/// The header must be exactly `Digest <token>` with a single space and a
/// non-empty token. A missing header is an authentication failure (401);
/// any other shape is malformed input (400).
fn parse_digest_header(value: &str) -> Result<&str, ApiError> {
    let mut parts = value.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default();

    if scheme != DIGEST_SCHEME || token.is_empty() || token.contains(' ') {
        return Err(ApiError::Validation(format!(
            "Invalid Authorization header format. Expected: {DIGEST_SCHEME} <digest>"
        )));
    }
    Ok(token)
}

/// Digest authentication middleware.
///
/// On success, inserts [`TenantContext`] into request extensions. On
/// failure the request is rejected before any tenant-scoped work:
/// missing header → 401, malformed header → 400, unknown digest → 401.
pub async fn digest_auth_middleware(
    State(cache): State<Arc<DigestCache>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            ApiError::Unauthorized("Missing Authorization header".to_string()).into_response()
        })?;

    let digest = parse_digest_header(header).map_err(IntoResponse::into_response)?;

    let tenant_id = cache.lookup_tenant_by_digest(digest).await.ok_or_else(|| {
        tracing::warn!("Rejected unknown or expired digest");
        ApiError::Unauthorized("Unauthorized: invalid or expired API key".to_string())
            .into_response()
    })?;

    tracing::debug!(tenant = %tenant_id, "Digest authentication successful");
    request.extensions_mut().insert(TenantContext::new(tenant_id));
    Ok(next.run(request).await)
}
