use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpResponse, Responder};

use serde::Serialize;

use crate::auth::Administrator;
use crate::error::RestResult;
use crate::store::Store;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminCheck {
    is_admin: bool,
}

/// Confirms the caller holds the admin role
#[tracing::instrument(name = "Check admin access")]
#[get("/check")]
async fn check(_admin: Administrator) -> RestResult<impl Responder> {
    Ok(HttpResponse::Ok().json(AdminCheck { is_admin: true }))
}

/// Dashboard figures
#[tracing::instrument(name = "Fetch analytics", skip(store))]
#[get("/analytics")]
async fn analytics(_admin: Administrator, store: web::Data<dyn Store>) -> RestResult<impl Responder> {
    Ok(HttpResponse::Ok().json(store.analytics().await?))
}

#[tracing::instrument(name = "List users", skip(store))]
#[get("/users")]
async fn users(_admin: Administrator, store: web::Data<dyn Store>) -> RestResult<impl Responder> {
    Ok(HttpResponse::Ok().json(store.list_users().await?))
}

#[tracing::instrument(name = "List orders", skip(store))]
#[get("/orders")]
async fn orders(_admin: Administrator, store: web::Data<dyn Store>) -> RestResult<impl Responder> {
    Ok(HttpResponse::Ok().json(store.list_orders().await?))
}

#[tracing::instrument(name = "List contact messages", skip(store))]
#[get("/contacts")]
async fn contacts(_admin: Administrator, store: web::Data<dyn Store>) -> RestResult<impl Responder> {
    Ok(HttpResponse::Ok().json(store.list_contacts().await?))
}

/// Admin dashboard API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/admin")
        .service(check)
        .service(analytics)
        .service(users)
        .service(orders)
        .service(contacts)
}
