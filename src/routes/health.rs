//! Service health endpoint used for readiness checks and tests.

use rocket::serde::json::Json;
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};

use crate::models::DataResponse;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint. Reachable without a session.
#[openapi(tag = "Health")]
#[get("/health")]
pub fn health_check() -> Json<DataResponse<HealthResponse>> {
    Json(DataResponse::new(HealthResponse {
        status: "ok".to_string(),
    }))
}
