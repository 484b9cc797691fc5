//! Configuration and shared plumbing for the Beacon push gateway client.

pub mod config;
pub mod http;
pub mod secret;

pub use config::{DEFAULT_BASE_URL, GatewayConfig, HttpConfig};
pub use secret::Secret;
