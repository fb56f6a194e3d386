use std::time::Duration;

use anyhow::Context;

use reqwest::{Client, StatusCode};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use url::Url;

use crate::model::{
    ContactForm, ContactReceipt, Course, OrderDetails, OrderSubmission, PlacedOrder,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("Storefront API request failed")]
    Request(#[from] reqwest::Error),
    #[error("Invalid storefront API endpoint")]
    Endpoint(#[from] url::ParseError),
    #[error("Storefront API responded {status}: {message}")]
    Status { status: StatusCode, message: String },
}

pub type ApiResult<T> = Result<T, ApiClientError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client the checkout flow uses to talk to the storefront REST API
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: Client,
    api_base_url: Url,
}

impl StorefrontClient {
    pub fn new(api_base_url: Url, api_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        Ok(Self {
            client,
            api_base_url,
        })
    }

    #[tracing::instrument(name = "Fetch courses", skip(self))]
    pub async fn courses(&self) -> ApiResult<Vec<Course>> {
        let url = self.api_base_url.join("api/courses")?;
        Self::parse(self.client.get(url).send().await?).await
    }

    #[tracing::instrument(name = "Fetch course", skip(self))]
    pub async fn course(&self, id: i32) -> ApiResult<Course> {
        let url = self.api_base_url.join(&format!("api/courses/{}", id))?;
        Self::parse(self.client.get(url).send().await?).await
    }

    #[tracing::instrument(name = "Submit order", skip(self, submission))]
    pub async fn submit_order(&self, submission: &OrderSubmission) -> ApiResult<PlacedOrder> {
        let url = self.api_base_url.join("api/orders")?;
        Self::parse(self.client.post(url).json(submission).send().await?).await
    }

    #[tracing::instrument(name = "Fetch order", skip(self))]
    pub async fn order(&self, order_number: &str) -> ApiResult<OrderDetails> {
        let url = self
            .api_base_url
            .join(&format!("api/orders/{}", order_number))?;
        Self::parse(self.client.get(url).send().await?).await
    }

    #[tracing::instrument(name = "Send contact message", skip(self, form))]
    pub async fn send_contact(&self, form: &ContactForm) -> ApiResult<ContactReceipt> {
        let url = self.api_base_url.join("api/contact")?;
        Self::parse(self.client.post(url).json(form).send().await?).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| status.to_string());

        Err(ApiClientError::Status { status, message })
    }
}
