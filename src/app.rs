use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{get, HttpRequest, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::auth::IdentityProvider;
use crate::client::{EmailClient, PaymentClient};
use crate::controller::contact::ContactRecipient;
use crate::controller::{admin, contact, courses, orders, users, webhooks};
use crate::crypto::WebhookVerifier;
use crate::error::RestError;
use crate::settings::CheckoutSettings;
use crate::store::Store;

/// Everything the request handlers share
pub struct AppContext {
    pub store: Arc<dyn Store>,
    pub identity: Arc<dyn IdentityProvider>,
    pub email_client: EmailClient,
    pub payment_client: PaymentClient,
    pub webhook_verifier: WebhookVerifier,
    pub contact_recipient: ContactRecipient,
    pub checkout: CheckoutSettings,
}

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Render malformed JSON bodies through the API error type
fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %err, "Rejected malformed JSON body");
    RestError::from(err).into()
}

/// Run the application on a specified TCP listener
pub fn run(listener: TcpListener, ctx: AppContext) -> anyhow::Result<Server> {
    // Wrap application data
    let store: web::Data<dyn Store> = web::Data::from(ctx.store);
    let identity: web::Data<dyn IdentityProvider> = web::Data::from(ctx.identity);
    let email_client = web::Data::new(ctx.email_client);
    let payment_client = web::Data::new(ctx.payment_client);
    let webhook_verifier = web::Data::new(ctx.webhook_verifier);
    let contact_recipient = web::Data::new(ctx.contact_recipient);
    let checkout = web::Data::new(ctx.checkout);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(store.clone())
            .app_data(identity.clone())
            .app_data(email_client.clone())
            .app_data(payment_client.clone())
            .app_data(webhook_verifier.clone())
            .app_data(contact_recipient.clone())
            .app_data(checkout.clone())
            .service(health_check)
            .service(
                web::scope("/api")
                    .service(courses::scope())
                    .service(orders::scope())
                    .service(contact::scope())
                    .service(admin::scope())
                    .service(users::scope())
                    .service(webhooks::scope()),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
