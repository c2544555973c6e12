//! Paystack client
//!
//! Thin delegating client for the payment gateway's REST API. No retries:
//! a failed upstream call surfaces as an upstream error immediately.

use serde::{Deserialize, Serialize};

use crate::core::config::PaystackConfig;
use crate::utils::AppError;

/// Gateway response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

/// Result of initializing a checkout transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializedTransaction {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// Dedicated virtual account issued for a customer
#[derive(Debug, Clone, Deserialize)]
pub struct DedicatedAccount {
    pub bank: BankInfo,
    pub account_number: String,
    pub account_name: String,
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BankInfo {
    pub name: String,
}

/// Paystack REST client
#[derive(Clone)]
pub struct PaystackService {
    http: reqwest::Client,
    config: PaystackConfig,
}

impl std::fmt::Debug for PaystackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaystackService")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl PaystackService {
    pub fn new(config: PaystackConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Initialize a card/bank checkout transaction.
    ///
    /// `amount_kobo` is the charge amount in the gateway's minor unit.
    pub async fn initialize_transaction(
        &self,
        email: &str,
        amount_kobo: i64,
        reference: &str,
    ) -> Result<InitializedTransaction, AppError> {
        let body = serde_json::json!({
            "email": email,
            "amount": amount_kobo,
            "reference": reference,
        });
        self.post("/transaction/initialize", &body).await
    }

    /// Create a dedicated virtual bank account for a customer.
    pub async fn create_virtual_account(
        &self,
        customer_code: &str,
        preferred_bank: &str,
    ) -> Result<DedicatedAccount, AppError> {
        let body = serde_json::json!({
            "customer": customer_code,
            "preferred_bank": preferred_bank,
        });
        self.post("/dedicated_account", &body).await
    }

    /// Fetch the gateway's view of a transaction.
    ///
    /// Returns the raw data payload; callers read `status` / `channel`
    /// out of it and keep the rest for reconciliation.
    pub async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<serde_json::Value, AppError> {
        let url = format!(
            "{}/transaction/verify/{reference}",
            self.config.base_url
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.secret_key)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Paystack request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Paystack returned {status}: {text}"
            )));
        }

        let envelope: Envelope<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Paystack response malformed: {e}")))?;

        if !envelope.status {
            return Err(AppError::Upstream(format!(
                "Paystack rejected the request: {}",
                envelope.message
            )));
        }
        envelope
            .data
            .ok_or_else(|| AppError::Upstream("Paystack response missing data".to_string()))
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let url = format!("{}{path}", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Paystack request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Paystack returned {status}: {text}"
            )));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Paystack response malformed: {e}")))?;

        if !envelope.status {
            return Err(AppError::Upstream(format!(
                "Paystack rejected the request: {}",
                envelope.message
            )));
        }
        envelope
            .data
            .ok_or_else(|| AppError::Upstream("Paystack response missing data".to_string()))
    }
}
