use std::time::Duration;

use reqwest::{header, Client};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::models::{EmailMessage, ThreadNode};

pub struct ArchiveClient {
    client: Client,
    base_url: String,
}

impl ArchiveClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gradpress/0.1"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(timeout_secs))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub async fn get_thread(&self, thread_id: &str) -> Result<ThreadNode> {
        tracing::info!("Fetching thread: {}", thread_id);
        self.get_json("thread.lua", thread_id).await
    }

    pub async fn get_email(&self, email_id: &str) -> Result<EmailMessage> {
        tracing::debug!("Fetching email: {}", email_id);
        self.get_json("email.lua", email_id).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, id: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.client.get(&url).query(&[("id", id)]).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ArchiveApi(format!(
                "Failed to fetch {} for {}: {} - {}",
                endpoint, id, status, body
            )));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
