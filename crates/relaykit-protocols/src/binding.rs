//! Binding protocol definitions.
//!
//! Bindings are adapters relaying messages between the generic contract and
//! one external system (webhook endpoints, queues, chat services).
//!
//! ## Core Concepts
//!
//! - **OutputBinding**: outbound direction - `invoke` sends a message to the
//!   external system
//! - **InputBinding**: inbound direction - `read` listens for messages and
//!   forwards each one to a registered [`ReadHandler`]
//! - A single component may implement both halves over one configuration

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BindingError;
use crate::metadata::Metadata;

#[cfg(test)]
#[path = "binding_tests.rs"]
mod tests;

/// Operation kinds an output binding can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Outbound send.
    Create,
    /// Listen-trigger.
    Get,
    Delete,
    List,
}

impl OperationKind {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Get => "get",
            OperationKind::Delete => "delete",
            OperationKind::List => "list",
        }
    }
}

/// Outbound invocation request. Transient; not persisted by bindings.
#[derive(Debug, Clone)]
pub struct InvokeRequest {
    /// Raw payload bytes, already in the external system's wire format.
    pub data: Vec<u8>,
    /// Requested operation kind.
    pub operation: OperationKind,
    /// Per-call metadata.
    pub metadata: HashMap<String, String>,
}

impl InvokeRequest {
    /// Create a request with the given operation and payload.
    pub fn new(operation: OperationKind, data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            operation,
            metadata: HashMap::new(),
        }
    }
}

/// Outbound invocation response.
#[derive(Debug, Clone, Default)]
pub struct InvokeResponse {
    pub data: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

/// An inbound message delivered to the registered [`ReadHandler`].
#[derive(Debug, Clone)]
pub struct ReadResponse {
    /// Raw payload bytes as received from the external system.
    pub data: Vec<u8>,
}

/// Future returned by a [`ReadHandler`] invocation.
pub type ReadHandlerFuture =
    Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>, BindingError>> + Send>>;

/// Handler invoked for each inbound message while an [`InputBinding`] is
/// reading. Cloneable so the listener can call it per request.
pub type ReadHandler = Arc<dyn Fn(ReadResponse) -> ReadHandlerFuture + Send + Sync>;

/// Base trait for bindings: configuration from component metadata.
#[async_trait]
pub trait Binding: Send + Sync {
    /// Parse and store the configuration, constructing any transports the
    /// binding needs. Fails if the metadata does not decode.
    async fn init(&mut self, metadata: Metadata) -> Result<(), BindingError>;
}

/// Outbound half: relay messages to the external system.
#[async_trait]
pub trait OutputBinding: Binding {
    /// Perform one outbound invocation. Synchronous with respect to the
    /// network round trip; safe to call concurrently.
    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse, BindingError>;

    /// Operation kinds this binding accepts.
    fn operations(&self) -> Vec<OperationKind>;
}

/// Inbound half: listen for messages from the external system.
#[async_trait]
pub trait InputBinding: Binding {
    /// Start listening and forward each arrival to `handler`.
    ///
    /// Blocks for the lifetime of the listener; returns immediately with an
    /// error if the listener cannot be established.
    async fn read(&self, handler: ReadHandler) -> Result<(), BindingError>;
}
