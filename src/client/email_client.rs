use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use reqwest::Client;

use serde::Serialize;

use secrecy::Secret;

use url::Url;

use crate::domain::EmailAddress;

const POSTMARK_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// Outgoing email contents
#[derive(Debug, Clone)]
pub struct Email {
    pub recipient: EmailAddress,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    /// Address that replies should go to, instead of the sender
    pub reply_to: Option<EmailAddress>,
}

/// Client for the transactional email REST API
#[derive(Debug)]
pub struct EmailClient {
    client: Client,
    sender: EmailAddress,

    api_send_email_url: Url,
    api_auth_token: EmailAuthorizationToken,
}

impl EmailClient {
    pub fn new(
        sender: EmailAddress,
        api_timeout: Duration,
        api_base_url: Url,
        api_auth_token: EmailAuthorizationToken,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let api_send_email_url = api_base_url
            .join("email")
            .context("Failed to create send email endpoint URL")?;

        Ok(Self {
            client,
            sender,
            api_send_email_url,
            api_auth_token,
        })
    }

    #[tracing::instrument(name = "Send email", skip(self, email), fields(recipient = %email.recipient))]
    pub async fn send(&self, email: &Email) -> reqwest::Result<()> {
        use secrecy::ExposeSecret;

        let body = SendEmailRequest {
            to: email.recipient.as_ref(),
            from: self.sender.as_ref(),
            reply_to: email.reply_to.as_ref().map(AsRef::as_ref),
            subject: &email.subject,
            html_body: &email.html_body,
            text_body: &email.text_body,
        };

        self.client
            .post(self.api_send_email_url.clone())
            .header(POSTMARK_TOKEN_HEADER, self.api_auth_token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct EmailAuthorizationToken(Secret<String>);

impl FromStr for EmailAuthorizationToken {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Infallible> {
        Ok(Self(Secret::new(value.to_string())))
    }
}

impl From<Secret<String>> for EmailAuthorizationToken {
    fn from(value: Secret<String>) -> Self {
        Self(value)
    }
}

impl secrecy::ExposeSecret<String> for EmailAuthorizationToken {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    to: &'a str,
    from: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}
