//! Change notification models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A document was created or updated
    Saved,
    /// A document was deleted
    Removed,
    /// Views were asked to re-read the collection without a mutation
    Refreshed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Saved => "saved",
            ChangeKind::Removed => "removed",
            ChangeKind::Refreshed => "refreshed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invalidation signal for a collection.
///
/// Carries no document payload. Subscribers re-read the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Logical collection name (without namespace prefix)
    pub collection: String,
    pub kind: ChangeKind,
    pub occurred_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(collection: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            collection: collection.into(),
            kind,
            occurred_at: Utc::now(),
        }
    }
}
