//! Optional hook for seeing outgoing payloads and vendor status codes.

use serde_json::Value;

use crate::operation::Operation;

/// Receives every outgoing request payload and every vendor status code.
///
/// Both methods default to doing nothing. Implementations must not block:
/// they run inline on the request path.
pub trait RequestObserver: Send + Sync {
    fn on_request(&self, _operation: Operation, _payload: &Value) {}

    fn on_response(&self, _operation: Operation, _status: u16) {}
}

/// Logs payloads and status codes through `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn on_request(&self, operation: Operation, payload: &Value) {
        tracing::debug!(%operation, %payload, "push gateway request payload");
    }

    fn on_response(&self, operation: Operation, status: u16) {
        tracing::debug!(%operation, status, "push gateway response");
    }
}
