use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use sqlx::PgPool;

use storefront::app::{self, AppContext};
use storefront::auth::SessionIdentityProvider;
use storefront::client::{EmailClient, PaymentClient};
use storefront::controller::contact::ContactRecipient;
use storefront::crypto::{SigningKey, WebhookVerifier};
use storefront::settings::{DatabaseSettings, Settings};
use storefront::store::{MemoryStore, PgStore, Store};
use storefront::telemetry;

async fn connect_store(database: Option<&DatabaseSettings>) -> anyhow::Result<Arc<dyn Store>> {
    let Some(database) = database else {
        tracing::warn!("No database configured, using the in-memory store");
        return Ok(Arc::new(MemoryStore::with_sample_catalog()));
    };

    let pool = PgPool::connect_with(database.with_db())
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(Arc::new(PgStore::new(pool)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber("info".into(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().context("Failed to load settings")?;

    let store = connect_store(settings.database.as_ref()).await?;

    let signing_key = SigningKey::new(settings.identity.session_secret())?;
    let identity = Arc::new(SessionIdentityProvider::new(signing_key, store.clone()));
    let webhook_verifier = WebhookVerifier::new(settings.identity.webhook_secret())?;

    let email_client = EmailClient::new(
        settings.email.sender()?,
        settings.email.api_timeout(),
        settings.email.api_base_url()?,
        settings.email.api_auth_token().into(),
    )?;
    let payment_client = PaymentClient::new(
        settings.payment.api_base_url()?,
        settings.payment.secret_key(),
        settings.payment.currency(),
        settings.payment.api_timeout(),
    )?;

    let ctx = AppContext {
        store,
        identity,
        email_client,
        payment_client,
        webhook_verifier,
        contact_recipient: ContactRecipient(settings.email.contact_recipient()?),
        checkout: settings.checkout,
    };

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    app::run(listener, ctx)?.await.context("Failed to run app")
}
