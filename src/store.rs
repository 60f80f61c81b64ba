//! Client for the remote message store.
//!
//! The store serves pending messages on `GET` and accepts new ones on
//! `POST`, both at the same URL and both behind a bearer token. A `GET`
//! consumes what it returns.

use std::time::Duration;

use thiserror::Error;

use crate::config::FlashScopeConfig;
use crate::models::FlashMessage;

pub mod wire;
use wire::WireFormat;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("message store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("message store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed message store body: {0}")]
    Body(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct MessageStore {
    client: reqwest::Client,
    url: String,
    token: String,
    format: WireFormat,
}

impl MessageStore {
    pub fn new(config: &FlashScopeConfig) -> Result<MessageStore, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(MessageStore {
            client,
            url: config.api_url.clone(),
            token: config.token.clone(),
            format: config.wire_format,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Pulls every pending message out of the store.
    pub async fn fetch(&self) -> Result<Vec<FlashMessage>, StoreError> {
        let resp = self
            .client
            .get(&self.url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let body = Self::checked_body(resp).await?;
        let messages = self.format.decode(&body)?;
        log::debug!("fetched {} message(s) from {}", messages.len(), self.url);
        Ok(messages)
    }

    /// Hands `messages` to the store as one JSON array.
    pub async fn push(&self, messages: &[FlashMessage]) -> Result<(), StoreError> {
        let payload = self.format.encode(messages)?;
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        Self::checked_body(resp).await?;
        log::debug!("pushed {} message(s) to {}", messages.len(), self.url);
        Ok(())
    }

    async fn checked_body(resp: reqwest::Response) -> Result<Vec<u8>, StoreError> {
        let status = resp.status();
        let body = resp.bytes().await?;
        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(StoreError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    }
}
