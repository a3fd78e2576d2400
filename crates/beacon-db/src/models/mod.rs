//! Relational models for the Beacon push gateway.

mod api_key;
mod apns_config;
mod device_token;
mod fcm_config;
mod tenant;

pub use api_key::ApiKey;
pub use apns_config::ApnsConfig;
pub use device_token::DeviceToken;
pub use fcm_config::FcmConfig;
pub use tenant::Tenant;
