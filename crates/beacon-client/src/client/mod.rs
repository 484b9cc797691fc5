
use std::fmt;
use std::sync::Arc;

use beacon_core::{GatewayConfig, Secret};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{FailureCause, GatewayError, OperationFailure, Result};
use crate::observer::RequestObserver;
use crate::operation::{Credential, Operation};
use crate::payload::{
    ALL_SEGMENT, Alert, Aliases, ExternalUserNotification, LocalizedText, NotificationExtras,
    OpenedUpdate, PUSH_CHANNEL, PlayerNotification, SegmentNotification, merge_required,
};
use crate::transport::{
    Method, ReqwestTransport, ResponseBody, Transport, TransportRequest, TransportResponse,
};

/// Largest page the vendor serves from the device listing endpoint.
pub const MAX_DEVICE_PAGE: u32 = 300;

const NOT_EMPTY: &str = "must not be empty";

/// Decoded body plus the vendor's status code, returned by send operations.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub body: Value,
    pub status_code: u16,
}

/// Client for the push vendor's REST API.
///
/// Holds only immutable configuration, so one instance can be shared across
/// tasks. Every call builds a fresh request and goes through `T`.
pub struct GatewayClient<T = ReqwestTransport> {
    transport: T,
    app_id: String,
    app_key: Secret,
    user_auth_key: Secret,
    base_url: Url,
    observer: Option<Arc<dyn RequestObserver>>,
}

impl<T> fmt::Debug for GatewayClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("app_id", &self.app_id)
            .field("app_key", &self.app_key)
            .field("user_auth_key", &self.user_auth_key)
            .field("base_url", &self.base_url.as_str())
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl GatewayClient<ReqwestTransport> {
    /// Build a client over a `reqwest` transport configured from `config.http`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Config` if the config is invalid or the HTTP
    /// client cannot be built.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let client = beacon_core::http::build_client(&config.http)
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;
        Self::new(config, ReqwestTransport::new(client))
    }
}

impl<T: Transport> GatewayClient<T> {
    /// # Errors
    ///
    /// Returns `GatewayError::Config` if `app_id` is empty or `base_url` is
    /// not an absolute hierarchical URL.
    pub fn new(config: GatewayConfig, transport: T) -> Result<Self> {
        if config.app_id.trim().is_empty() {
            return Err(GatewayError::Config("app_id must not be empty".into()));
        }
        let base_url = config.normalized_base_url().map_err(|e| {
            GatewayError::Config(format!("invalid base_url {:?}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Config(format!(
                "base_url {:?} cannot carry a path",
                config.base_url
            )));
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(GatewayError::Config(format!(
                "base_url {:?} must not carry a query or fragment",
                config.base_url
            )));
        }

        Ok(Self {
            transport,
            app_id: config.app_id,
            app_key: config.app_key,
            user_auth_key: config.user_auth_key,
            base_url,
            observer: None,
        })
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send to every subscriber via the implicit "All" segment.
    ///
    /// # Errors
    ///
    /// `Validation` if `title` or `message` is blank, `Send` on any
    /// transport or vendor failure.
    pub async fn send_to_all(
        &self,
        title: &str,
        message: &str,
        extras: &NotificationExtras,
    ) -> Result<GatewayResponse> {
        let op = Operation::SendToAll;
        require(op, "title", title)?;
        require(op, "message", message)?;

        let payload = to_payload(
            op,
            &SegmentNotification {
                app_id: &self.app_id,
                included_segments: [ALL_SEGMENT],
                headings: title.into(),
                contents: message.into(),
                extras,
            },
        )?;
        self.post(op, &["notifications"], &payload).await
    }

    /// Send to specific vendor device ids. An empty id list is forwarded
    /// as-is and left for the vendor to judge.
    ///
    /// # Errors
    ///
    /// `Validation` if `headings` or `contents` is blank, `Send` on any
    /// transport or vendor failure.
    pub async fn send_to_players(
        &self,
        headings: &LocalizedText,
        contents: &LocalizedText,
        player_ids: &[String],
        extras: &NotificationExtras,
    ) -> Result<GatewayResponse> {
        let op = Operation::SendToPlayers;
        require_text(op, "headings", headings)?;
        require_text(op, "contents", contents)?;

        let payload = to_payload(
            op,
            &PlayerNotification {
                app_id: &self.app_id,
                include_player_ids: player_ids,
                headings,
                contents,
                extras,
            },
        )?;
        self.post(op, &["notifications"], &payload).await
    }

    /// Send to caller-defined user ids through the `external_id` alias,
    /// on the push channel only.
    ///
    /// # Errors
    ///
    /// `Validation` if `headings`, `contents` or `external_user_ids` is
    /// blank, `Send` on any transport or vendor failure.
    pub async fn send_to_external_user_ids(
        &self,
        headings: &LocalizedText,
        contents: &LocalizedText,
        external_user_ids: &[String],
        extras: &NotificationExtras,
    ) -> Result<GatewayResponse> {
        let op = Operation::SendToExternalUserIds;
        require_text(op, "headings", headings)?;
        require_text(op, "contents", contents)?;
        if external_user_ids.is_empty() || external_user_ids.iter().any(|id| id.trim().is_empty())
        {
            return Err(invalid(op, "external_user_ids", NOT_EMPTY));
        }

        let payload = to_payload(
            op,
            &ExternalUserNotification {
                app_id: &self.app_id,
                include_aliases: Aliases {
                    external_id: external_user_ids,
                },
                target_channel: PUSH_CHANNEL,
                headings,
                contents,
                alert: Alert {
                    title: headings,
                    subtitle: "",
                    body: contents,
                },
                mutable_content: 1,
                extras,
            },
        )?;
        self.post(op, &["notifications"], &payload).await
    }

    /// # Errors
    ///
    /// `Validation` for a blank id, `Cancel` when the vendor refuses (for
    /// example the notification was already delivered) or the call fails.
    pub async fn cancel_notification(&self, notification_id: &str) -> Result<Value> {
        let op = Operation::CancelNotification;
        require(op, "notification_id", notification_id)?;

        let mut url = self.endpoint(op, &["notifications", notification_id])?;
        url.query_pairs_mut().append_pair("app_id", &self.app_id);
        self.delete(op, url).await
    }

    /// Report a notification as opened (or not).
    ///
    /// # Errors
    ///
    /// `Validation` for a blank id, `Update` on any transport or vendor
    /// failure.
    pub async fn track_open(&self, notification_id: &str, opened: bool) -> Result<Value> {
        let op = Operation::TrackOpen;
        require(op, "notification_id", notification_id)?;

        let payload = to_payload(
            op,
            &OpenedUpdate {
                app_id: &self.app_id,
                opened,
            },
        )?;
        let url = self.endpoint(op, &["notifications", notification_id])?;
        self.put(op, url, &payload).await
    }

    /// # Errors
    ///
    /// `Query` on any transport or vendor failure.
    pub async fn list_apps(&self) -> Result<Value> {
        let op = Operation::ListApps;
        let url = self.endpoint(op, &["apps"])?;
        self.get(op, url).await
    }

    /// Fetch one app; `None` means the configured app.
    ///
    /// # Errors
    ///
    /// `Validation` for an explicitly blank id, `Query` on any transport or
    /// vendor failure.
    pub async fn get_app(&self, app_id: Option<&str>) -> Result<Value> {
        let op = Operation::GetApp;
        let app_id = match app_id {
            Some(id) => {
                require(op, "app_id", id)?;
                id
            }
            None => self.app_id.as_str(),
        };
        let url = self.endpoint(op, &["apps", app_id])?;
        self.get(op, url).await
    }

    /// Create an app. `name` overrides any `name` inside `extra_params`.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank name, `Create` on any transport or vendor
    /// failure.
    pub async fn create_app(&self, name: &str, extra_params: Map<String, Value>) -> Result<Value> {
        let op = Operation::CreateApp;
        require(op, "name", name)?;

        let payload = Value::Object(merge_required(extra_params, [("name", name.into())]));
        self.post(op, &["apps"], &payload)
            .await
            .map(|resp| resp.body)
    }

    /// # Errors
    ///
    /// `Validation` for a blank id or empty params, `Update` on any
    /// transport or vendor failure.
    pub async fn update_app(&self, app_id: &str, params: Map<String, Value>) -> Result<Value> {
        let op = Operation::UpdateApp;
        require(op, "app_id", app_id)?;
        require_params(op, &params)?;

        let url = self.endpoint(op, &["apps", app_id])?;
        self.put(op, url, &Value::Object(params)).await
    }

    /// List devices of the configured app. Absent bounds are left to the
    /// vendor defaults.
    ///
    /// # Errors
    ///
    /// `Validation` if `limit` is 0 or above [`MAX_DEVICE_PAGE`], `Query` on
    /// any transport or vendor failure.
    pub async fn list_devices(&self, limit: Option<u32>, offset: Option<u32>) -> Result<Value> {
        let op = Operation::ListDevices;
        if let Some(limit) = limit
            && !(1..=MAX_DEVICE_PAGE).contains(&limit)
        {
            return Err(invalid(op, "limit", "must be between 1 and 300"));
        }

        let mut url = self.endpoint(op, &["players"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("app_id", &self.app_id);
            if let Some(limit) = limit {
                query.append_pair("limit", &limit.to_string());
            }
            if let Some(offset) = offset {
                query.append_pair("offset", &offset.to_string());
            }
        }
        self.get(op, url).await
    }

    /// Register a device on the configured app. `device_type` is the
    /// vendor's numeric platform code; it and `app_id` override `params`.
    ///
    /// # Errors
    ///
    /// `Create` on any transport or vendor failure.
    pub async fn add_device(&self, device_type: u8, params: Map<String, Value>) -> Result<Value> {
        let op = Operation::AddDevice;
        let payload = Value::Object(merge_required(
            params,
            [
                ("app_id", self.app_id.as_str().into()),
                ("device_type", device_type.into()),
            ],
        ));
        self.post(op, &["players"], &payload)
            .await
            .map(|resp| resp.body)
    }

    /// # Errors
    ///
    /// `Validation` for a blank id or empty params, `Update` on any
    /// transport or vendor failure.
    pub async fn update_device(&self, device_id: &str, params: Map<String, Value>) -> Result<Value> {
        let op = Operation::UpdateDevice;
        require(op, "device_id", device_id)?;
        require_params(op, &params)?;

        let url = self.endpoint(op, &["players", device_id])?;
        self.put(op, url, &Value::Object(params)).await
    }

    async fn post(
        &self,
        op: Operation,
        segments: &[&str],
        payload: &Value,
    ) -> Result<GatewayResponse> {
        let url = self.endpoint(op, segments)?;
        self.dispatch(op, Method::POST, url, Some(payload)).await
    }

    async fn get(&self, op: Operation, url: Url) -> Result<Value> {
        self.dispatch(op, Method::GET, url, None)
            .await
            .map(|resp| resp.body)
    }

    async fn put(&self, op: Operation, url: Url, payload: &Value) -> Result<Value> {
        self.dispatch(op, Method::PUT, url, Some(payload))
            .await
            .map(|resp| resp.body)
    }

    async fn delete(&self, op: Operation, url: Url) -> Result<Value> {
        self.dispatch(op, Method::DELETE, url, None)
            .await
            .map(|resp| resp.body)
    }

    async fn dispatch(
        &self,
        op: Operation,
        method: Method,
        url: Url,
        payload: Option<&Value>,
    ) -> Result<GatewayResponse> {
        let body = payload
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| failure(op, "failed to encode request body", None, None, e.into()))?;
        if let (Some(observer), Some(payload)) = (&self.observer, payload) {
            observer.on_request(op, payload);
        }

        tracing::debug!(operation = %op, %method, path = url.path(), "push gateway request");
        let request = TransportRequest {
            method,
            url,
            headers: vec![
                ("Content-Type", "application/json".to_owned()),
                ("Authorization", self.authorization(op.credential())),
            ],
            body,
        };

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(operation = %op, "push gateway transport error: {e}");
                return Err(failure(op, "transport failure", None, None, e.into()));
            }
        };
        if let Some(observer) = &self.observer {
            observer.on_response(op, response.status);
        }

        decode_response(op, response)
    }

    fn authorization(&self, credential: Credential) -> String {
        let key = match credential {
            Credential::RestApiKey => &self.app_key,
            Credential::UserAuthKey => &self.user_auth_key,
        };
        format!("Basic {}", key.expose())
    }

    /// Append `segments` under the base path, percent-encoding each one.
    fn endpoint(&self, op: Operation, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                GatewayError::Config(format!("base_url cannot carry a path for {op}"))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn decode_response(op: Operation, response: TransportResponse) -> Result<GatewayResponse> {
    let status = response.status;
    if !response.is_success() {
        tracing::warn!(operation = %op, status, "push gateway rejected request");
        return Err(failure(
            op,
            "vendor rejected the request",
            Some(status),
            Some(response.body.to_raw()),
            FailureCause::Status { status },
        ));
    }

    let body: Value = match response.body {
        ResponseBody::Json(value) => value,
        ResponseBody::Text(text) if text.trim().is_empty() => Value::Null,
        ResponseBody::Text(text) => serde_json::from_str(&text).map_err(|e| {
            failure(
                op,
                "malformed JSON in response body",
                Some(status),
                Some(text.clone()),
                e.into(),
            )
        })?,
    };
    tracing::debug!(operation = %op, status, "push gateway response");

    Ok(GatewayResponse {
        body,
        status_code: status,
    })
}

fn failure(
    operation: Operation,
    message: &str,
    status: Option<u16>,
    body: Option<String>,
    cause: FailureCause,
) -> GatewayError {
    GatewayError::from_failure(OperationFailure {
        operation,
        message: message.to_owned(),
        status,
        body,
        cause,
    })
}

fn to_payload(op: Operation, payload: &impl Serialize) -> Result<Value> {
    serde_json::to_value(payload)
        .map_err(|e| failure(op, "failed to encode request body", None, None, e.into()))
}

fn invalid(operation: Operation, field: &'static str, reason: &'static str) -> GatewayError {
    GatewayError::Validation {
        operation,
        field,
        reason,
    }
}

fn require(op: Operation, field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(op, field, NOT_EMPTY));
    }
    Ok(())
}

fn require_text(op: Operation, field: &'static str, text: &LocalizedText) -> Result<()> {
    if text.is_blank() {
        return Err(invalid(op, field, NOT_EMPTY));
    }
    Ok(())
}

fn require_params(op: Operation, params: &Map<String, Value>) -> Result<()> {
    if params.is_empty() {
        return Err(invalid(op, "params", NOT_EMPTY));
    }
    Ok(())
}
