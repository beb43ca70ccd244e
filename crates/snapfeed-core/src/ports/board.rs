//! Board port definition
//!
//! The remote kanban board exposes two operations: create a card and upload
//! an attachment to an existing card. Neither is retried or deduplicated at
//! this layer; retries, if desired, belong to the coordinator.

use async_trait::async_trait;
use thiserror::Error;

/// Placeholder sent instead of an empty card title.
pub const NO_SUMMARY_PLACEHOLDER: &str = "[no summary]";

/// Placeholder sent instead of an empty card body.
pub const NO_DETAIL_PLACEHOLDER: &str = "[no detail]";

/// Request payload for card creation.
///
/// The screenshot rides with creation as a distinct artifact, separate from
/// the post-hoc attachment uploads.
#[derive(Debug, Clone)]
pub struct CreateCard {
    /// Card title
    pub title: String,
    /// Rendered card body
    pub body: String,
    /// Label ids to attach
    pub label_ids: Vec<String>,
    /// Destination list id
    pub list_id: String,
    /// Optional inline screenshot (PNG bytes)
    pub screenshot: Option<Vec<u8>>,
}

impl CreateCard {
    /// Substitutes placeholder literals for empty title/body so the remote
    /// system never receives an empty required field.
    pub fn with_placeholders(mut self) -> Self {
        if self.title.trim().is_empty() {
            self.title = NO_SUMMARY_PLACEHOLDER.to_string();
        }
        if self.body.trim().is_empty() {
            self.body = NO_DETAIL_PLACEHOLDER.to_string();
        }
        self
    }
}

/// Identifier of a created card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRef {
    /// Remote card id
    pub id: String,
}

/// Errors surfaced by board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Transport-level failure (connection, TLS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// The board answered with a non-success status
    #[error("board rejected request (status {status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message taken from the response body
        message: String,
    },
}

/// Port for remote board operations
#[async_trait]
pub trait BoardPort: Send + Sync {
    /// Creates a card and returns its identifier.
    async fn create_card(&self, card: CreateCard) -> Result<CardRef, BoardError>;

    /// Uploads one attachment to an existing card.
    ///
    /// One call per attachment; a failed call must not affect the outcome of
    /// previously completed calls.
    async fn add_attachment(
        &self,
        card_id: &str,
        data: Vec<u8>,
        mime_type: Option<&str>,
        name: &str,
    ) -> Result<(), BoardError>;
}
