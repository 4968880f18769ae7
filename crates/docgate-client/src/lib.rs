//! Tenant-scoped document store gateway.
//!
//! This crate provides:
//! - Resource addressing for namespaced collections (`{base}/api/{ns}_{collection}`)
//! - An HTTP transport that attaches the tenant header to every request
//! - A document gateway with create-or-update (save-with-fallback) semantics
//! - Change notifications via observer handles or a broadcast channel
//! - Tracing spans and metrics for every request

pub mod config;
pub mod error;
pub mod gateway;
pub mod locator;
pub mod metrics;
pub mod notify;
pub mod transport;

#[cfg(test)]
mod client_tests;

pub use config::{GatewayConfig, SaveMode, DEFAULT_TENANT_HEADER};
pub use error::{GatewayError, GatewayResult};
pub use gateway::DocumentGateway;
pub use locator::TenantContext;
pub use notify::{ChangeCallback, ChangeNotifier, Subscription};
pub use transport::HttpTransport;

pub use docgate_models::{ChangeEvent, ChangeKind, Document, DocumentId, Record};
