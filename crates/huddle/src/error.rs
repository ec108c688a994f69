//! Error types for session operations.

use thiserror::Error;
use tonic::{Code, Status};

use crate::relay::CancelHandle;

pub type Result<T, E = SessionError> = std::result::Result<T, E>;

/// Failure of a session operation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configured address is not a valid URI
    #[error("Invalid session service endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// Eager connection to the service failed
    #[error("Failed to connect to session service at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// Any status the call mechanism reported, passed through as-is
    #[error(transparent)]
    Rpc(#[from] Status),

    /// The call succeeded but left out a field it must carry
    #[error("Unexpected {operation} response: status is ok but {field} is missing")]
    MissingPayload {
        operation: &'static str,
        field: &'static str,
    },
}

impl SessionError {
    /// The RPC status, if this error came from the call itself.
    pub fn status(&self) -> Option<&Status> {
        match self {
            SessionError::Rpc(status) => Some(status),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<Code> {
        self.status().map(Status::code)
    }
}

/// A streaming operation could not open its stream.
///
/// Carries the cancellation handle the call created so callers can treat
/// both outcomes uniformly. Cancelling it does nothing, since nothing is
/// streaming, and never blocks.
#[derive(Debug, Error)]
#[error("Failed to open {operation} stream: {source}")]
pub struct SubscribeError {
    operation: &'static str,
    #[source]
    source: SessionError,
    cancel: CancelHandle,
}

impl SubscribeError {
    pub fn new(operation: &'static str, source: SessionError, cancel: CancelHandle) -> Self {
        Self {
            operation,
            source,
            cancel,
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn error(&self) -> &SessionError {
        &self.source
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn into_parts(self) -> (SessionError, CancelHandle) {
        (self.source, self.cancel)
    }

    pub fn into_error(self) -> SessionError {
        self.source
    }
}
