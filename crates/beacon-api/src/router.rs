//! Router configuration for the gateway.

use crate::handlers::{push_apns_handler, push_fcm_handler, push_handler, register_handler};
use crate::middleware::digest_auth_middleware;
use crate::AppState;
use axum::{middleware, routing::post, Router};
use std::sync::Arc;

/// Create the authenticated gateway router.
///
/// Provides:
/// - `POST /register` — register a device token
/// - `POST /push` — simulated fan-out to registered devices
/// - `POST /push/apns` — deliver via APNS
/// - `POST /push/fcm` — deliver via FCM
///
/// Every route sits behind digest authentication; unauthenticated surface
/// (health probes) is attached by the binary.
pub fn gateway_router(state: AppState) -> Router {
    let cache = Arc::clone(&state.digest_cache);
    Router::new()
        .route("/register", post(register_handler))
        .route("/push", post(push_handler))
        .route("/push/apns", post(push_apns_handler))
        .route("/push/fcm", post(push_fcm_handler))
        .route_layer(middleware::from_fn_with_state(cache, digest_auth_middleware))
        .with_state(state)
}
