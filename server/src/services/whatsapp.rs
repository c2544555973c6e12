//! WhatsApp client
//!
//! Thin delegating client for the messaging provider's REST API.

use serde::Deserialize;

use crate::core::config::WhatsappConfig;
use crate::utils::AppError;

#[derive(Debug, Deserialize)]
struct SendResponse {
    messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

/// WhatsApp messaging client
#[derive(Clone)]
pub struct WhatsappService {
    http: reqwest::Client,
    config: WhatsappConfig,
}

impl std::fmt::Debug for WhatsappService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsappService")
            .field("phone_id", &self.config.phone_id)
            .finish_non_exhaustive()
    }
}

impl WhatsappService {
    pub fn new(config: WhatsappConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Send a product price quote to a customer number.
    ///
    /// Returns the provider's message id.
    pub async fn send_price_quote(
        &self,
        to: &str,
        product_name: &str,
        price: f64,
    ) -> Result<String, AppError> {
        let url = format!(
            "{}/{}/messages",
            self.config.base_url, self.config.phone_id
        );
        let body = serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": {
                "body": format!("{product_name} is available for ₦{price:.2}. Reply to place an order!"),
            },
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("WhatsApp request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "WhatsApp returned {status}: {text}"
            )));
        }

        let parsed: SendResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("WhatsApp response malformed: {e}")))?;

        parsed
            .messages
            .into_iter()
            .next()
            .map(|m| m.id)
            .ok_or_else(|| AppError::Upstream("WhatsApp response missing message id".to_string()))
    }
}
