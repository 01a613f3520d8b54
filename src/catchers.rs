//! Error catchers keep the `{"data": ...}` envelope on responses that never
//! reach a handler. Guard rejections stash their message in the request's
//! local cache; without one, the status picks a fixed body.

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Catcher, Request, catch};

use crate::error::INTERNAL_ERROR_MESSAGE;
use crate::models::DataResponse;
use crate::session::{GuardRejection, NOT_LOGGED_IN};

#[catch(400)]
fn bad_request(request: &Request<'_>) -> Json<DataResponse<String>> {
    let rejection = request.local_cache(GuardRejection::default);
    Json(DataResponse::new(rejection.message_or("Bad Request")))
}

#[catch(401)]
fn unauthorized(request: &Request<'_>) -> Json<DataResponse<String>> {
    let rejection = request.local_cache(GuardRejection::default);
    Json(DataResponse::new(rejection.message_or(NOT_LOGGED_IN)))
}

#[catch(404)]
fn not_found() -> Json<DataResponse<String>> {
    Json(DataResponse::new("Resource not found".to_string()))
}

#[catch(500)]
fn internal_error() -> Json<DataResponse<String>> {
    Json(DataResponse::new(INTERNAL_ERROR_MESSAGE.to_string()))
}

#[catch(default)]
fn fallback(status: Status, _request: &Request<'_>) -> Json<DataResponse<String>> {
    Json(DataResponse::new(status.reason_lossy().to_string()))
}

pub fn catchers() -> Vec<Catcher> {
    rocket::catchers![bad_request, unauthorized, not_found, internal_error, fallback]
}
