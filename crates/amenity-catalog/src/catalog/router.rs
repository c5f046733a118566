use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::error;

use super::domain::{Amenity, AmenityView, AvailabilityFilter, UserId};
use super::repository::AmenityRepository;
use super::service::{AmenityCatalogService, CatalogServiceError};
use crate::auth::{require_caller, Authenticator, Caller};

/// Router builder exposing the amenity list and submission endpoints.
///
/// Every route requires an authenticated caller. There is intentionally no
/// per-amenity detail route.
pub fn amenity_router<R>(
    service: Arc<AmenityCatalogService<R>>,
    authenticator: Arc<dyn Authenticator>,
) -> Router
where
    R: AmenityRepository + 'static,
{
    Router::new()
        .route("/amenities", get(list_handler::<R>).post(create_handler::<R>))
        .route("/amenities/for_house", get(list_for_house_handler::<R>))
        .route(
            "/amenities/for_house_space",
            get(list_for_house_space_handler::<R>),
        )
        .route("/amenities/batch_create", post(batch_create_handler::<R>))
        .route_layer(middleware::from_fn_with_state(authenticator, require_caller))
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<AmenityCatalogService<R>>>,
    Caller(user): Caller,
) -> Response
where
    R: AmenityRepository + 'static,
{
    list_response(&service, &user, AvailabilityFilter::Any)
}

pub(crate) async fn list_for_house_handler<R>(
    State(service): State<Arc<AmenityCatalogService<R>>>,
    Caller(user): Caller,
) -> Response
where
    R: AmenityRepository + 'static,
{
    list_response(&service, &user, AvailabilityFilter::House)
}

pub(crate) async fn list_for_house_space_handler<R>(
    State(service): State<Arc<AmenityCatalogService<R>>>,
    Caller(user): Caller,
) -> Response
where
    R: AmenityRepository + 'static,
{
    list_response(&service, &user, AvailabilityFilter::HouseSpace)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<AmenityCatalogService<R>>>,
    Caller(user): Caller,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: AmenityRepository + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_body(rejection),
    };

    match service.create(&user, &payload) {
        Ok(amenity) => (StatusCode::CREATED, Json(amenity.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn batch_create_handler<R>(
    State(service): State<Arc<AmenityCatalogService<R>>>,
    Caller(user): Caller,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: AmenityRepository + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_body(rejection),
    };

    match service.batch_create(&user, &payload) {
        Ok(created) => {
            let views: Vec<AmenityView> = created.iter().map(Amenity::view).collect();
            (StatusCode::CREATED, Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn list_response<R>(
    service: &AmenityCatalogService<R>,
    user: &UserId,
    filter: AvailabilityFilter,
) -> Response
where
    R: AmenityRepository + 'static,
{
    match service.list(user, filter) {
        Ok(groups) => (StatusCode::OK, Json(groups)).into_response(),
        Err(err) => error_response(err),
    }
}

fn malformed_body(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
        "fields": [],
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn error_response(err: CatalogServiceError) -> Response {
    match err {
        CatalogServiceError::Validation(validation) => {
            let payload = json!({
                "error": validation.to_string(),
                "fields": validation.fields,
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        CatalogServiceError::Repository(repository) => {
            error!(error = %repository, "amenity store failure");
            let payload = json!({
                "error": repository.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
