//! Binding errors.

use thiserror::Error;

/// Errors surfaced by bindings.
///
/// Every failure propagates synchronously to the immediate caller; bindings
/// do not retry, and they make no transient/permanent distinction.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("invalid metadata: {0}")]
    Metadata(String),

    #[error("binding not initialized")]
    NotInitialized,

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("listener failed: {0}")]
    ListenFailed(String),

    #[error("remote error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}
