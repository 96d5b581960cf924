use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use prizeflow_domain::notification::NotificationChannel;

use crate::domain::repository::SmsTransport;

/// JSON-over-HTTP message provider client.
#[derive(Clone)]
pub struct HttpSmsTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender_id: String,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    to: &'a str,
    from: &'a str,
    channel: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    #[serde(alias = "sid", alias = "message_id")]
    id: String,
}

impl HttpSmsTransport {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        sender_id: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build message provider client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            sender_id: sender_id.into(),
        })
    }
}

impl SmsTransport for HttpSmsTransport {
    async fn send(
        &self,
        channel: NotificationChannel,
        phone: &str,
        body: &str,
    ) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&SendMessageRequest {
                to: phone,
                from: &self.sender_id,
                channel: channel.as_str(),
                body,
            })
            .send()
            .await
            .context("send message to provider")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("message provider returned {status}: {detail}");
        }

        let parsed: SendMessageResponse = response
            .json()
            .await
            .context("parse message provider response")?;
        Ok(parsed.id)
    }
}
