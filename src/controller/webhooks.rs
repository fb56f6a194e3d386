use actix_web::dev::HttpServiceFactory;
use actix_web::{post, web, HttpRequest, HttpResponse, Responder};

use chrono::Utc;

use serde::Deserialize;

use crate::crypto::{WebhookError, WebhookHeaders, WebhookVerifier};
use crate::error::{RestError, RestResult};
use crate::model::{NewUser, Role, UserUpdate};
use crate::store::Store;

/// Identity-provider event envelope
#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct EmailAddressData {
    email_address: String,
}

/// User payload of `user.created` and `user.updated`
#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailAddressData>,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
}

impl UserData {
    fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .first()
            .map(|email| email.email_address.as_str())
            .filter(|email| !email.is_empty())
    }
}

/// Payload of `user.deleted`
#[derive(Debug, Deserialize)]
struct DeletedUserData {
    id: String,
}

impl From<WebhookError> for RestError {
    fn from(e: WebhookError) -> Self {
        match e {
            WebhookError::MissingHeader(_) | WebhookError::InvalidTimestamp => {
                Self::BadRequest(e.to_string())
            }
            WebhookError::StaleTimestamp | WebhookError::SignatureMismatch => {
                Self::Unauthorized(e.to_string())
            }
        }
    }
}

fn parse_data<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> RestResult<T> {
    serde_json::from_value(data)
        .map_err(|e| RestError::BadRequest(format!("Malformed webhook payload: {}", e)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[tracing::instrument(name = "Handle user.created", skip(store, user), fields(external_id = %user.id))]
async fn user_created(store: &dyn Store, user: UserData) -> RestResult<()> {
    if store.user_by_external_id(&user.id).await?.is_some() {
        tracing::info!("User already synced");
        return Ok(());
    }

    let email = user.primary_email().unwrap_or_default().to_string();
    store
        .insert_user(NewUser {
            external_id: user.id,
            email,
            first_name: non_empty(user.first_name),
            last_name: non_empty(user.last_name),
            profile_image_url: non_empty(user.image_url),
            role: Role::User,
        })
        .await?;

    Ok(())
}

#[tracing::instrument(name = "Handle user.updated", skip(store, user), fields(external_id = %user.id))]
async fn user_updated(store: &dyn Store, user: UserData) -> RestResult<()> {
    let update = UserUpdate {
        email: user.primary_email().map(str::to_string),
        first_name: non_empty(user.first_name),
        last_name: non_empty(user.last_name),
        profile_image_url: non_empty(user.image_url),
    };

    if store.update_user(&user.id, update).await?.is_none() {
        tracing::warn!("Update for a user that was never synced, ignoring");
    }

    Ok(())
}

#[tracing::instrument(name = "Handle user.deleted", skip(store, user), fields(external_id = %user.id))]
async fn user_deleted(store: &dyn Store, user: DeletedUserData) -> RestResult<()> {
    if !store.delete_user(&user.id).await? {
        tracing::info!("Deleted user was not stored locally");
    }

    Ok(())
}

/// Receive a signed user lifecycle event from the identity provider
#[tracing::instrument(name = "Receive identity webhook", skip(req, body, store, verifier))]
#[post("/identity")]
async fn identity(
    req: HttpRequest,
    body: web::Bytes,
    store: web::Data<dyn Store>,
    verifier: web::Data<WebhookVerifier>,
) -> RestResult<impl Responder> {
    let store = store.get_ref();

    let headers = WebhookHeaders::from_headers(req.headers())?;
    verifier.verify(&headers, &body, Utc::now())?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| RestError::BadRequest(format!("Malformed webhook payload: {}", e)))?;

    match event.event_type.as_str() {
        "user.created" => user_created(store, parse_data(event.data)?).await?,
        "user.updated" => user_updated(store, parse_data(event.data)?).await?,
        "user.deleted" => user_deleted(store, parse_data(event.data)?).await?,
        other => tracing::info!(event_type = other, "Ignoring unhandled webhook event"),
    }

    Ok(HttpResponse::Ok().finish())
}

/// Webhook endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/webhooks").service(identity)
}
