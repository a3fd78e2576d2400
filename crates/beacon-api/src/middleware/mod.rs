//! Request middleware.

mod digest;

pub use digest::{digest_auth_middleware, TenantContext, DIGEST_SCHEME};
