use std::time::Duration;

use anyhow::Context;

use reqwest::{Client, StatusCode};

use secrecy::{ExposeSecret, Secret};

use serde::{Deserialize, Serialize};

use url::Url;

const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Gateway handle for a pending payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// Handed to the browser to confirm the payment
    pub client_secret: Option<String>,
    pub status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment gateway request failed")]
    Request(#[from] reqwest::Error),
    #[error("Invalid payment gateway endpoint")]
    Endpoint(#[from] url::ParseError),
    #[error("Payment gateway rejected the request with status {status}: {message}")]
    Rejected { status: StatusCode, message: String },
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    message: Option<String>,
}

/// Client for the hosted payment gateway's REST API
#[derive(Debug)]
pub struct PaymentClient {
    client: Client,
    api_base_url: Url,
    secret_key: Secret<String>,
    currency: String,
}

impl PaymentClient {
    pub fn new(
        api_base_url: Url,
        secret_key: Secret<String>,
        currency: String,
        api_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        Ok(Self {
            client,
            api_base_url,
            secret_key,
            currency,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PaymentError> {
        Ok(self.api_base_url.join(path)?)
    }

    /// Request a payment intent for `amount` minor currency units
    #[tracing::instrument(name = "Create payment intent", skip(self, idempotency_key))]
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        order_number: &str,
        idempotency_key: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = self.endpoint("v1/payment_intents")?;
        let amount = amount.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", self.currency.as_str()),
            ("metadata[order_number]", order_number),
            ("automatic_payment_methods[enabled]", "true"),
        ];

        let response = self
            .client
            .post(url)
            .bearer_auth(self.secret_key.expose_secret())
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .form(&form)
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Current state of an existing payment intent
    #[tracing::instrument(name = "Retrieve payment intent", skip(self))]
    pub async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        let url = self.endpoint(&format!("v1/payment_intents/{}", id))?;

        let response = self
            .client
            .get(url)
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn parse(response: reqwest::Response) -> Result<PaymentIntent, PaymentError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .json::<GatewayErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| "no error message".into());

        Err(PaymentError::Rejected { status, message })
    }
}
