use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpResponse, Responder};

use crate::error::{RestError, RestResult};
use crate::store::Store;

/// List every course in the catalog
#[tracing::instrument(name = "List courses", skip(store))]
#[get("")]
async fn list(store: web::Data<dyn Store>) -> RestResult<impl Responder> {
    let courses = store.list_courses().await?;

    Ok(HttpResponse::Ok().json(courses))
}

/// Fetch a single course by id
#[tracing::instrument(name = "Fetch a course", skip(store))]
#[get("/{id}")]
async fn fetch(store: web::Data<dyn Store>, path: web::Path<(String,)>) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();
    let id: i32 = id
        .parse()
        .map_err(|_| RestError::BadRequest(format!("{} is not a valid course id", id)))?;

    let course = store
        .course_by_id(id)
        .await?
        .ok_or_else(|| RestError::NotFound(format!("Course {} not found", id)))?;

    Ok(HttpResponse::Ok().json(course))
}

/// Course catalog API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/courses").service(list).service(fetch)
}
