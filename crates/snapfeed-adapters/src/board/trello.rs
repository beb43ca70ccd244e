//! Trello API adapter implementation
//!
//! Implements the BoardPort trait against the Trello REST API: card creation
//! with an optional inline screenshot, and per-card attachment uploads.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use snapfeed_core::ports::board::{BoardError, BoardPort, CardRef, CreateCard};
use snapfeed_core::token::SecretToken;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// File name used for the inline screenshot part
const SCREENSHOT_FILE_NAME: &str = "screenshot.png";

/// Trello board adapter
///
/// One card per report; attachments are uploaded to the created card one at
/// a time. No retries at this layer.
pub struct TrelloAdapter {
    client: Client,
    base_url: String,
    token: SecretToken,
}

impl TrelloAdapter {
    /// Creates a new Trello adapter.
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g. "https://api.trello.com/1")
    /// * `token` - Pre-obtained access token
    pub fn new(base_url: impl Into<String>, token: SecretToken) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Returns the card-creation endpoint URL
    fn cards_url(&self) -> String {
        format!("{}/cards", self.base_url)
    }

    /// Returns the attachment-upload endpoint URL for a card
    fn attachments_url(&self, card_id: &str) -> String {
        format!("{}/cards/{}/attachments", self.base_url, card_id)
    }

    /// Maps a non-success response to a rejection error
    fn rejection(status: u16, body: String) -> BoardError {
        let message = body.trim().to_string();
        BoardError::Rejected {
            status,
            message: if message.is_empty() {
                "Unknown error".to_string()
            } else {
                message
            },
        }
    }

    /// Builds the multipart form for card creation
    fn build_card_form(card: CreateCard) -> Result<Form, BoardError> {
        let mut form = Form::new()
            .text("name", card.title)
            .text("desc", card.body)
            .text("idList", card.list_id);

        if !card.label_ids.is_empty() {
            form = form.text("idLabels", card.label_ids.join(","));
        }

        if let Some(bytes) = card.screenshot {
            let part = Part::bytes(bytes)
                .file_name(SCREENSHOT_FILE_NAME)
                .mime_str("image/png")
                .map_err(|e| BoardError::Network(e.to_string()))?;
            form = form.part("fileSource", part);
        }

        Ok(form)
    }
}

#[async_trait]
impl BoardPort for TrelloAdapter {
    async fn create_card(&self, card: CreateCard) -> Result<CardRef, BoardError> {
        let card = card.with_placeholders();
        debug!(list_id = %card.list_id, has_screenshot = card.screenshot.is_some(), "Creating Trello card");

        let form = Self::build_card_form(card)?;
        let response = self
            .client
            .post(self.cards_url())
            .query(&[("token", self.token.expose())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send card creation request");
                BoardError::Network(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            let body: CardResponse = response
                .json()
                .await
                .map_err(|e| BoardError::Network(e.to_string()))?;
            debug!(card_id = %body.id, "Card created");
            Ok(CardRef { id: body.id })
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = %status, body = %body, "Card creation rejected");
            Err(Self::rejection(status.as_u16(), body))
        }
    }

    async fn add_attachment(
        &self,
        card_id: &str,
        data: Vec<u8>,
        mime_type: Option<&str>,
        name: &str,
    ) -> Result<(), BoardError> {
        debug!(card_id, name, size = data.len(), "Uploading attachment");

        let mut part = Part::bytes(data).file_name(name.to_string());
        if let Some(mime) = mime_type {
            part = part
                .mime_str(mime)
                .map_err(|e| BoardError::Network(e.to_string()))?;
        }

        let mut form = Form::new().part("file", part).text("name", name.to_string());
        if let Some(mime) = mime_type {
            form = form.text("mimeType", mime.to_string());
        }

        let response = self
            .client
            .post(self.attachments_url(card_id))
            .query(&[("token", self.token.expose())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, name, "Failed to send attachment request");
                BoardError::Network(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = %status, body = %body, name, "Attachment upload rejected");
            Err(Self::rejection(status.as_u16(), body))
        }
    }
}

// === Response Types ===

#[derive(Debug, Deserialize)]
struct CardResponse {
    id: String,
}
