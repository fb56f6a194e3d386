use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use rust_decimal::Decimal;

use secrecy::Secret;

use serde::Deserialize;
use serde_aux::prelude::*;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

use url::Url;

use crate::domain::EmailAddress;

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    /// Without a database the in-memory store is used
    pub database: Option<DatabaseSettings>,
    pub email: EmailSettings,
    pub payment: PaymentSettings,
    pub identity: IdentitySettings,
    pub checkout: CheckoutSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        // Get the path to the settings directory
        let path = env::current_dir()?.join("settings");
        // Get the current environment based on the `APP_ENV` environment variable, default to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }
    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            // Include the base settings
            .add_source(File::from(base_path.join("base")).required(true))
            // Include the runtime settings
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // Override/include any settings from environment variables
            // NOTE: Should be used for any prod secrets. Takes the form `APP_<settings category>__<setting name>`.
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
    host: String,
    name: String,
    username: String,
    password: Secret<String>,
    require_ssl: bool,
}

impl DatabaseSettings {
    /// The database connection options, without specifying the database name
    pub fn without_db(&self) -> PgConnectOptions {
        use secrecy::ExposeSecret;

        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .port(self.port)
            .host(&self.host)
            .ssl_mode(ssl_mode)
            .username(&self.username)
            .password(self.password.expose_secret())
    }
    /// The database connection options, with the database name
    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailSettings {
    sender: String,
    contact_recipient: String,
    api_base_url: String,
    api_auth_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
}

impl EmailSettings {
    /// The email address to send application emails from
    pub fn sender(&self) -> anyhow::Result<EmailAddress> {
        self.sender
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse email sender address: {}", e))
    }
    /// The site owner's address that receives contact form messages
    pub fn contact_recipient(&self) -> anyhow::Result<EmailAddress> {
        self.contact_recipient
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse contact recipient address: {}", e))
    }
    /// The email REST API timeout duration
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
    /// The base URL for the email REST service
    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_base_url).context("Failed to parse email base URL")
    }
    /// The authentication token to include when making email requests
    pub fn api_auth_token(&self) -> Secret<String> {
        self.api_auth_token.clone()
    }
}

#[derive(Debug, Deserialize)]
pub struct PaymentSettings {
    api_base_url: String,
    secret_key: Secret<String>,
    currency: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
}

impl PaymentSettings {
    /// The base URL for the payment gateway REST service
    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_base_url).context("Failed to parse payment gateway base URL")
    }
    pub fn secret_key(&self) -> Secret<String> {
        self.secret_key.clone()
    }
    /// ISO currency code, lower-case, that orders are charged in
    pub fn currency(&self) -> String {
        self.currency.to_lowercase()
    }
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
}

#[derive(Debug, Deserialize)]
pub struct IdentitySettings {
    session_secret: Secret<String>,
    webhook_secret: Secret<String>,
}

impl IdentitySettings {
    /// Key that session tokens are signed with
    pub fn session_secret(&self) -> &Secret<String> {
        &self.session_secret
    }
    /// `whsec_` secret for identity-provider webhooks
    pub fn webhook_secret(&self) -> &Secret<String> {
        &self.webhook_secret
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSettings {
    /// Fraction of the subtotal charged as tax, e.g. `0.06`
    pub tax_rate: Decimal,
    /// Site code at the front of every order number
    pub order_number_prefix: String,
}
