//! Typed client for the OneSignal push notification REST API.
//!
//! [`GatewayClient`] turns each supported endpoint into one async method,
//! signs it with the right key and maps the vendor's answer into either a
//! decoded JSON body or a [`GatewayError`] naming the failed operation.

#![forbid(unsafe_code)]

pub mod client;
pub mod error;
pub mod observer;
pub mod operation;
pub mod payload;
pub mod transport;

pub use beacon_core::{GatewayConfig, HttpConfig, Secret};
pub use client::{GatewayClient, GatewayResponse, MAX_DEVICE_PAGE};
pub use error::{FailureCause, GatewayError, OperationFailure};
pub use observer::{RequestObserver, TracingObserver};
pub use operation::{Credential, FailureKind, Operation};
pub use payload::{LocalizedText, NotificationExtras};
pub use transport::{
    Method, ReqwestTransport, ResponseBody, Transport, TransportError, TransportRequest,
    TransportResponse,
};
