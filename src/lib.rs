//! Beacon: async, typed client for the OneSignal push notification API.
//!
//! ```no_run
//! use beacon::{GatewayClient, GatewayConfig, NotificationExtras};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::load(std::path::Path::new("beacon.toml"))?;
//! let client = GatewayClient::from_config(config)?;
//! let resp = client
//!     .send_to_all("Deploy finished", "v2 is live", &NotificationExtras::new())
//!     .await?;
//! println!("{} {}", resp.status_code, resp.body);
//! # Ok(())
//! # }
//! ```

pub mod telemetry;

pub use beacon_client::*;
pub use beacon_core::{config, http};
