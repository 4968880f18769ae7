//! Shared data models for the docgate document gateway.
//!
//! This crate provides Serde-serializable types for:
//! - Document identifiers and the `Document` trait
//! - Generic records with an optional identity
//! - Change events emitted after mutations

pub mod change;
pub mod document;

// Re-export common types
pub use change::{ChangeEvent, ChangeKind};
pub use document::{Document, DocumentId, Record};
