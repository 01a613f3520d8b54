use std::io::Cursor;

use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::{Request, Response};
use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse, Responses};
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::response::OpenApiResponderInner;

use crate::models::DataResponse;
use crate::session::{ALREADY_LOGGED_IN, NOT_LOGGED_IN, SessionError};

/// Body sent for any failure the client cannot act on.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again";

#[derive(Debug)]
pub enum ApiError {
    DatabaseError(sqlx::Error),
    SessionFailure(SessionError),
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    InternalError(String),
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let (status, message) = match self {
            ApiError::DatabaseError(err) => {
                log::error!("database error: {err}");
                (Status::InternalServerError, INTERNAL_ERROR_MESSAGE.into())
            }
            ApiError::SessionFailure(err) => {
                log::error!("session failure: {err}");
                (Status::InternalServerError, INTERNAL_ERROR_MESSAGE.into())
            }
            ApiError::BadRequest(msg) => {
                log::debug!("bad request: {msg}");
                (Status::BadRequest, msg)
            }
            ApiError::Unauthorized(msg) => {
                log::debug!("unauthorized: {msg}");
                (Status::Unauthorized, msg)
            }
            ApiError::NotFound(msg) => {
                log::debug!("not found: {msg}");
                (Status::NotFound, msg)
            }
            ApiError::InternalError(msg) => {
                log::error!("internal error: {msg}");
                (Status::InternalServerError, msg)
            }
        };

        let json = serde_json::to_string(&DataResponse::new(message)).unwrap_or_else(|_| {
            r#"{"data":"An unexpected error occurred. Please try again"}"#.to_string()
        });

        Response::build()
            .status(status)
            .header(rocket::http::ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            _ => ApiError::DatabaseError(err),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::TokenMissing | SessionError::TokenInvalid => {
                ApiError::Unauthorized(NOT_LOGGED_IN.to_string())
            }
            SessionError::GuardMismatch => ApiError::BadRequest(ALREADY_LOGGED_IN.to_string()),
            SessionError::Sqlx(err) => ApiError::DatabaseError(err),
            other => ApiError::SessionFailure(other),
        }
    }
}

impl OpenApiResponderInner for ApiError {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();
        for (status, description) in [
            ("400", "Request data failed validation, or a session was already active."),
            ("401", "No valid session accompanied the request."),
            ("404", "The referenced resource does not exist."),
            ("500", "The request could not be processed."),
        ] {
            responses.responses.insert(
                status.to_string(),
                RefOr::Object(OpenApiResponse {
                    description: description.to_string(),
                    ..Default::default()
                }),
            );
        }
        Ok(responses)
    }
}
