use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpResponse, Responder};

use crate::auth::Authenticated;
use crate::error::{RestError, RestResult};
use crate::store::Store;

/// The caller's local user record
#[tracing::instrument(name = "Fetch current user", skip(store))]
#[get("/current")]
async fn current(
    Authenticated(identity): Authenticated,
    store: web::Data<dyn Store>,
) -> RestResult<impl Responder> {
    let user = store
        .user_by_external_id(&identity.external_id)
        .await?
        .ok_or_else(|| RestError::NotFound("User has not been synced yet".into()))?;

    Ok(HttpResponse::Ok().json(user))
}

/// User API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/users").service(current)
}
