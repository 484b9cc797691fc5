use crate::operation::{FailureKind, Operation};
use crate::transport::TransportError;

/// What went wrong underneath an [`OperationFailure`].
#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    #[error("vendor responded with HTTP {status}")]
    Status { status: u16 },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("JSON serialization/deserialization failed")]
    Json(#[from] serde_json::Error),
}

/// A failed call, with whatever the vendor told us about it.
#[derive(Debug, thiserror::Error)]
#[error("{operation}: {message}")]
pub struct OperationFailure {
    pub operation: Operation,
    pub message: String,
    pub status: Option<u16>,
    pub body: Option<String>,
    #[source]
    pub cause: FailureCause,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid gateway configuration: {0}")]
    Config(String),

    #[error("invalid `{field}` for {operation}: {reason}")]
    Validation {
        operation: Operation,
        field: &'static str,
        reason: &'static str,
    },

    #[error("failed to send notification")]
    Send(#[source] OperationFailure),

    #[error("failed to cancel notification")]
    Cancel(#[source] OperationFailure),

    #[error("query failed")]
    Query(#[source] OperationFailure),

    #[error("create failed")]
    Create(#[source] OperationFailure),

    #[error("update failed")]
    Update(#[source] OperationFailure),
}

impl GatewayError {
    /// Wrap a failure in the variant its operation reports under.
    #[must_use]
    pub fn from_failure(failure: OperationFailure) -> Self {
        match failure.operation.failure_kind() {
            FailureKind::Send => Self::Send(failure),
            FailureKind::Cancel => Self::Cancel(failure),
            FailureKind::Query => Self::Query(failure),
            FailureKind::Create => Self::Create(failure),
            FailureKind::Update => Self::Update(failure),
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&OperationFailure> {
        match self {
            Self::Send(f) | Self::Cancel(f) | Self::Query(f) | Self::Create(f) | Self::Update(f) => {
                Some(f)
            }
            Self::Config(_) | Self::Validation { .. } => None,
        }
    }

    /// Vendor status code, when the call got that far.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.failure().and_then(|f| f.status)
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
