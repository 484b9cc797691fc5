use serde::{Deserialize, Serialize};
use url::Url;

use crate::secret::Secret;

pub const DEFAULT_BASE_URL: &str = "https://onesignal.com/api/v1/";

/// Credentials and endpoint for one vendor application.
///
/// `app_key` is the REST API key used for read operations on apps and
/// devices, `user_auth_key` authorizes sends, cancels and mutations.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_key: Secret,
    #[serde(default)]
    pub user_auth_key: Secret,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_key: Secret::default(),
            user_auth_key: Secret::default(),
            base_url: default_base_url(),
            http: HttpConfig::default(),
        }
    }
}

impl GatewayConfig {
    #[must_use]
    pub fn new(
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        user_auth_key: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: Secret::new(app_key),
            user_auth_key: Secret::new(user_auth_key),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parse `base_url`, guaranteeing a single trailing slash on its path so
    /// that relative action paths join under it instead of replacing its
    /// last segment. Query and fragment are left as parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn normalized_base_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(self.base_url.trim())?;
        if !url.cannot_be_a_base() {
            let path = format!("{}/", url.path().trim_end_matches('/'));
            url.set_path(&path);
        }
        Ok(url)
    }
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_request_timeout(),
        }
    }
}
