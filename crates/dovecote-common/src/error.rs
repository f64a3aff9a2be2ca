//! Error types for notification service calls

use smol_str::SmolStr;

/// Failure reported by a [`NotificationClient`](crate::NotificationClient)
/// call.
///
/// Callers above the facade treat every variant the same way, as a failed
/// remote operation. The split exists for logging and for consumers that
/// talk to the service directly.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ClientError {
    /// Connectivity or I/O failure before a response was produced
    #[error("transport error: {0}")]
    #[diagnostic(code(dovecote_common::client::transport))]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out
    #[error("request timeout")]
    #[diagnostic(
        code(dovecote_common::client::timeout),
        help("the service did not answer in time; the call may be retried")
    )]
    Timeout,

    /// The service answered and rejected the request
    #[error("service error {code}: {message}")]
    #[diagnostic(code(dovecote_common::client::service))]
    Service {
        /// Machine-readable rejection code from the service
        code: SmolStr,
        /// Human-readable description
        message: String,
    },

    /// Response deserialization failed
    #[error("failed to decode response: {0}")]
    #[diagnostic(code(dovecote_common::client::decode))]
    Decode(
        #[from]
        #[source]
        serde_json::Error,
    ),
}

impl ClientError {
    /// Builds a [`ClientError::Service`] from a code and message.
    pub fn service(code: impl Into<SmolStr>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Wraps an arbitrary transport-layer failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Result type for notification service calls
pub type ClientResult<T> = std::result::Result<T, ClientError>;
