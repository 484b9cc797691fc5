use super::GatewayConfig;
use crate::secret::Secret;

impl GatewayConfig {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("BEACON_APP_ID") {
            self.app_id = v;
        }
        if let Ok(v) = std::env::var("BEACON_APP_KEY") {
            self.app_key = Secret::new(v);
        }
        if let Ok(v) = std::env::var("BEACON_USER_AUTH_KEY") {
            self.user_auth_key = Secret::new(v);
        }
        if let Ok(v) = std::env::var("BEACON_BASE_URL") {
            self.base_url = v;
        }
        if let Ok(v) = std::env::var("BEACON_HTTP_CONNECT_TIMEOUT") {
            if let Ok(secs) = v.parse::<u64>() {
                self.http.connect_timeout_secs = secs;
            } else {
                tracing::warn!("ignoring invalid BEACON_HTTP_CONNECT_TIMEOUT value: {v}");
            }
        }
        if let Ok(v) = std::env::var("BEACON_HTTP_TIMEOUT") {
            if let Ok(secs) = v.parse::<u64>() {
                self.http.timeout_secs = secs;
            } else {
                tracing::warn!("ignoring invalid BEACON_HTTP_TIMEOUT value: {v}");
            }
        }
    }
}
