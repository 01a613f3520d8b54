//! Account routes: registration, login, logout, and profile management.
//!
//! Registration and login sit behind [`RequireNoSession`], so a browser that
//! still holds a live session gets turned away before any body parsing.

use rocket::State;
use rocket::http::CookieJar;
use rocket::serde::json::Json;
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::Deserialize;

use crate::credentials::CredentialStore;
use crate::error::ApiError;
use crate::models::{DataResponse, User};
use crate::routes::helpers::{email_is_valid, password_is_valid};
use crate::session::{
    LogoutSession, OptionalSession, RequireNoSession, SessionCookieGateway, SessionUser,
};

const LOGIN_FAILED: &str = "invalid email or password combination";
const REGISTER_FAILED: &str = "Unable to create new user account. Please try again";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Create a new user account
#[openapi(tag = "Users")]
#[post("/user", data = "<payload>")]
pub async fn register(
    _no_session: RequireNoSession,
    store: &State<CredentialStore>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<Json<DataResponse<String>>, ApiError> {
    let payload = match payload {
        Some(payload) => payload.into_inner(),
        None => return Err(ApiError::BadRequest("Request body cannot be null".to_string())),
    };

    let email = payload.email.unwrap_or_default();
    if email.is_empty() {
        return Err(ApiError::BadRequest("Email cannot be empty".to_string()));
    }
    if !email_is_valid(&email) {
        return Err(ApiError::BadRequest("Invalid email format detected".to_string()));
    }

    let password = payload.password.unwrap_or_default();
    if password.is_empty() {
        return Err(ApiError::BadRequest("Password cannot be empty".to_string()));
    }
    if !password_is_valid(&password) {
        return Err(ApiError::BadRequest("Invalid password format detected".to_string()));
    }

    let first_name = payload.first_name.unwrap_or_default();
    if first_name.is_empty() {
        return Err(ApiError::BadRequest("First Name cannot be empty".to_string()));
    }

    let last_name = payload.last_name.unwrap_or_default();
    if last_name.is_empty() {
        return Err(ApiError::BadRequest("Last Name cannot be empty".to_string()));
    }

    let user = store
        .create_account(&email, &password, &first_name, &last_name)
        .await
        .map_err(|err| {
            log::error!("account creation failed: {err}");
            ApiError::InternalError(REGISTER_FAILED.to_string())
        })?;

    log::info!("created account {} for {}", user.id, user.email);

    Ok(Json(DataResponse::new(
        "Successfully created new user".to_string(),
    )))
}

/// Log in with email and password
#[openapi(tag = "Users")]
#[post("/user/login", data = "<payload>")]
pub async fn login(
    _no_session: RequireNoSession,
    gateway: &State<SessionCookieGateway>,
    store: &State<CredentialStore>,
    cookies: &CookieJar<'_>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<DataResponse<User>>, ApiError> {
    let payload = match payload {
        Some(payload) => payload.into_inner(),
        None => return Err(ApiError::BadRequest("Request body cannot be null".to_string())),
    };

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    // Blank submissions take the same path as a wrong password.
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Unauthorized(LOGIN_FAILED.to_string()));
    }

    let user = store
        .verify_credentials(&email, &password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(LOGIN_FAILED.to_string()))?;

    gateway.issue(cookies, &user)?;

    log::info!("user {} logged in", user.id);

    Ok(Json(DataResponse::new(user)))
}

/// Log out and revoke the session cookie
#[openapi(tag = "Users")]
#[post("/user/logout")]
pub async fn logout(
    session: LogoutSession,
    gateway: &State<SessionCookieGateway>,
    cookies: &CookieJar<'_>,
) -> Json<DataResponse<String>> {
    gateway.revoke(cookies);

    log::info!("user {} logged out", session.0.id);

    Json(DataResponse::new("Successfully logged out".to_string()))
}

/// Get the logged-in user's profile
#[openapi(tag = "Users")]
#[get("/user")]
pub async fn get_profile(
    session: SessionUser,
    store: &State<CredentialStore>,
) -> Result<Json<DataResponse<User>>, ApiError> {
    let user = store
        .fetch_user(session.0.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(DataResponse::new(user)))
}

/// Report the current session without requiring one
#[openapi(tag = "Users")]
#[get("/user/session")]
pub async fn current_session(session: OptionalSession) -> Json<DataResponse<Option<User>>> {
    Json(DataResponse::new(session.0))
}

/// Update the logged-in user's name
#[openapi(tag = "Users")]
#[put("/user", data = "<payload>")]
pub async fn update_profile(
    session: SessionUser,
    store: &State<CredentialStore>,
    payload: Option<Json<ProfileUpdateRequest>>,
) -> Result<Json<DataResponse<User>>, ApiError> {
    let payload = match payload {
        Some(payload) => payload.into_inner(),
        None => return Err(ApiError::BadRequest("Request body cannot be null".to_string())),
    };

    let first_name = payload.first_name.unwrap_or_default();
    if first_name.is_empty() {
        return Err(ApiError::BadRequest("First Name cannot be empty".to_string()));
    }

    let last_name = payload.last_name.unwrap_or_default();
    if last_name.is_empty() {
        return Err(ApiError::BadRequest("Last Name cannot be empty".to_string()));
    }

    let user = store
        .update_profile(session.0.id, &first_name, &last_name)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(DataResponse::new(user)))
}

/// Change the logged-in user's password
#[openapi(tag = "Users")]
#[put("/user/password", data = "<payload>")]
pub async fn update_password(
    session: SessionUser,
    store: &State<CredentialStore>,
    payload: Option<Json<PasswordUpdateRequest>>,
) -> Result<Json<DataResponse<String>>, ApiError> {
    let payload = match payload {
        Some(payload) => payload.into_inner(),
        None => return Err(ApiError::BadRequest("Request body cannot be null".to_string())),
    };

    let current = payload.current_password.unwrap_or_default();
    if current.is_empty() {
        return Err(ApiError::BadRequest("Password cannot be empty".to_string()));
    }

    let replacement = payload.new_password.unwrap_or_default();
    if replacement.is_empty() {
        return Err(ApiError::BadRequest("Password cannot be empty".to_string()));
    }
    if !password_is_valid(&replacement) {
        return Err(ApiError::BadRequest("Invalid password format detected".to_string()));
    }

    let updated = store
        .update_password(session.0.id, &current, &replacement)
        .await?;

    if !updated {
        return Err(ApiError::BadRequest("unable to update password".to_string()));
    }

    Ok(Json(DataResponse::new(
        "Successfully updated password".to_string(),
    )))
}
