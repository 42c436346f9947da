//! One-line status notices for the presentation layer

use serde::{Deserialize, Serialize};

/// Catalog mutation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

/// Why a mutation stayed local
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalReason {
    /// Session was already offline; no remote call was made
    Offline,
    /// The remote call failed and the session went offline
    ConnectionLost,
}

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Status notice emitted by the sync controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Catalog loaded without images
    DegradedCatalog,
    /// Catalog table does not exist; sample catalog shown
    MissingBackingStore,
    /// Store unreachable; sample catalog shown
    CatalogUnavailable,
    /// Mutation reached the remote store
    Saved { action: Mutation },
    /// Mutation applied locally only
    LocalOnly { action: Mutation, reason: LocalReason },
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::Saved { .. } => NoticeLevel::Info,
            Notice::DegradedCatalog | Notice::CatalogUnavailable | Notice::LocalOnly { .. } => {
                NoticeLevel::Warning
            }
            Notice::MissingBackingStore => NoticeLevel::Error,
        }
    }

    /// Human-readable text
    pub fn message(&self) -> &'static str {
        match self {
            Notice::DegradedCatalog => {
                "Loaded catalog in text-only mode. The store connection is slow or the images \
                 are too large, so item details were loaded without images."
            }
            Notice::MissingBackingStore => {
                "Catalog table is missing. Create it in the store, then retry the connection."
            }
            Notice::CatalogUnavailable => {
                "Could not reach the catalog store. Showing sample items until you reconnect."
            }
            Notice::Saved { action } => match action {
                Mutation::Create => "New item added successfully.",
                Mutation::Update => "Item updated successfully.",
                Mutation::Delete => "Item deleted.",
            },
            Notice::LocalOnly { action, reason } => match (reason, action) {
                (LocalReason::Offline, Mutation::Create) => {
                    "You are offline. Item NOT saved to the store. Please reconnect."
                }
                (LocalReason::Offline, Mutation::Update) => {
                    "You are offline. Changes are NOT saved to the store. Please reconnect."
                }
                (LocalReason::Offline, Mutation::Delete) => "Offline mode: item deleted locally.",
                (LocalReason::ConnectionLost, Mutation::Create) => {
                    "Connection error. Item added locally."
                }
                (LocalReason::ConnectionLost, Mutation::Update) => {
                    "Connection lost during save. Change is local only."
                }
                (LocalReason::ConnectionLost, Mutation::Delete) => {
                    "Connection lost. Item deleted locally."
                }
            },
        }
    }

    /// Whether the notice reports a mutation that did not reach the store
    pub fn is_local_only(&self) -> bool {
        matches!(self, Notice::LocalOnly { .. })
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
