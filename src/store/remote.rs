//! HTTP client for the remote document endpoint.
//!
//! The endpoint stores the whole dataset as one JSON document: `GET` returns it,
//! `POST` replaces it. Only the status code of a `POST` matters.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{Dataset, Event, HelpOffer};

/// Remote endpoint errors. Callers treat every variant as "remote unavailable".
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Client could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("Remote returned HTTP {0}")]
    Status(u16),

    /// Body was not the expected document
    #[error("Malformed remote document: {0}")]
    Malformed(String),
}

/// The document as the endpoint returns it. Either collection may be missing.
#[derive(Debug, Deserialize)]
struct RemoteDocument {
    #[serde(default)]
    events: Option<Vec<Event>>,
    #[serde(default)]
    help: Option<Vec<HelpOffer>>,
}

#[derive(Debug, Clone)]
pub struct RemoteEndpoint {
    client: Client,
    url: String,
}

impl RemoteEndpoint {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("inhelp-backend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Config(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch the dataset. `Ok(None)` means the endpoint holds no collections.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<Option<Dataset>, RemoteError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        if !body.is_object() {
            debug!("Remote document is not an object, treating as empty");
            return Ok(None);
        }

        let document: RemoteDocument =
            serde_json::from_value(body).map_err(|e| RemoteError::Malformed(e.to_string()))?;

        match (document.events, document.help) {
            (None, None) => Ok(None),
            (events, help) => Ok(Some(Dataset::new(
                events.unwrap_or_default(),
                help.unwrap_or_default(),
            ))),
        }
    }

    /// Replace the remote document with `dataset`.
    #[instrument(skip(self, dataset), fields(url = %self.url, records = dataset.len()))]
    pub async fn push(&self, dataset: &Dataset) -> Result<(), RemoteError> {
        let body =
            serde_json::to_string(dataset).map_err(|e| RemoteError::Malformed(e.to_string()))?;

        // The spreadsheet script reads the raw request body as text.
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteError::Status(status.as_u16()))
        }
    }
}
