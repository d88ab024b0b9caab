//! # RelayKit Protocols
//!
//! Core protocol definitions (traits) for RelayKit message bindings.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`Binding`] - Base trait: configure a binding from metadata
//! - [`OutputBinding`] - Outbound: relay messages to an external system
//! - [`InputBinding`] - Inbound: listen for messages and forward them to a handler

pub mod binding;
pub mod error;
pub mod metadata;

// Re-export core traits and types
pub use binding::{
    Binding, InputBinding, InvokeRequest, InvokeResponse, OperationKind, OutputBinding,
    ReadHandler, ReadHandlerFuture, ReadResponse,
};
pub use error::BindingError;
pub use metadata::{Metadata, decode_properties};
