use std::time::Duration;

use async_trait::async_trait;
use common::{GatewayError, SendResult, SmsGateway, SmsMessage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// HTTP client for the external SMS gateway.
///
/// A non-2xx answer is a permanent rejection for the delivery attempt;
/// anything that keeps the answer from arriving at all is transient.
pub struct HttpSmsGateway {
    base_url: String,
    dlr_webhook_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    message_id: String,
    to: &'a str,
    body: &'a str,
    dlr_webhook_url: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    provider_id: String,
}

impl HttpSmsGateway {
    pub fn new(
        base_url: impl Into<String>,
        dlr_webhook_url: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into(),
            dlr_webhook_url: dlr_webhook_url.into(),
            client,
        })
    }
}

#[async_trait]
impl SmsGateway for HttpSmsGateway {
    async fn send(&self, msg: &SmsMessage) -> Result<SendResult, GatewayError> {
        let payload = SendRequest {
            message_id: msg.id.to_string(),
            to: &msg.to,
            body: &msg.body,
            dlr_webhook_url: &self.dlr_webhook_url,
        };

        let response = self
            .client
            .post(format!("{}/send", self.base_url))
            // Lets a conforming gateway de-duplicate resubmits of the same message.
            .header("Idempotency-Key", payload.message_id.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK && status != reqwest::StatusCode::ACCEPTED {
            return Err(GatewayError::Rejected(format!("gateway returned {status}")));
        }

        let body: SendResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        debug!(msg_id = %msg.id, provider_id = %body.provider_id, "gateway accepted message");
        Ok(SendResult {
            provider_id: body.provider_id,
        })
    }
}
