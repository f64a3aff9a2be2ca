//! Error types for the inbox state engine

use std::sync::Arc;

use dovecote_common::ClientError;

/// Failure surfaced by an inbox component operation.
///
/// Nothing in the engine panics across the component boundary; every
/// fallible operation returns this type. Local validation failures never
/// contact the service.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum InboxError {
    /// A required identifier or cutoff was empty or absent
    #[error("missing required parameter: {0}")]
    #[diagnostic(
        code(dovecote::missing_parameter),
        help("the call was rejected locally; the service was not contacted")
    )]
    MissingParameter(&'static str),

    /// The component was used after teardown or outside its hub
    #[error("component is not initialized")]
    #[diagnostic(
        code(dovecote::not_initialized),
        help("construct components through an InboxHub and keep them alive while in use")
    )]
    NotInitialized,

    /// The notification service reported a failure
    #[error("remote operation failed: {0}")]
    #[diagnostic(code(dovecote::remote))]
    Remote(
        #[from]
        #[source]
        ClientError,
    ),
}

/// Result type for inbox component operations
pub type InboxResult<T> = std::result::Result<T, InboxError>;

/// Callback invoked with failures the engine surfaces out-of-band:
/// fetch failures reflected into the list state and side-effect failures
/// that have no caller to return to.
pub type ErrorHook = Arc<dyn Fn(&InboxError) + Send + Sync>;
