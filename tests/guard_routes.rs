//! Session guard behavior exercised over real HTTP dispatch: cookie issuance,
//! sliding refresh, rejection bodies, and logout teardown.

use jsonwebtoken::{Algorithm, Header, Validation, encode};
use rocket::http::{Cookie, SameSite, Status};
use rocket::routes;
use rocket::serde::json::Json;
use time::Duration;
use todo_api_server::error::ApiError;
use todo_api_server::models::{DataResponse, User};
use todo_api_server::routes::users::{current_session, logout};
use todo_api_server::session::{
    RequireNoSession, SESSION_COOKIE_NAME, SessionClaims, SessionUser, TokenCodec,
};
use todo_api_server::test_support::{TestRocketBuilder, test_keys, test_user};

#[rocket::get("/whoami")]
fn whoami(session: SessionUser) -> Json<DataResponse<User>> {
    Json(DataResponse::new(session.0))
}

#[rocket::post("/gate")]
fn gate(_no_session: RequireNoSession) -> Json<DataResponse<String>> {
    Json(DataResponse::new("open".to_string()))
}

#[rocket::get("/explode")]
fn explode(_session: SessionUser) -> Result<Json<DataResponse<String>>, ApiError> {
    Err(ApiError::NotFound("nothing here".to_string()))
}

fn guard_client() -> rocket::local::blocking::Client {
    TestRocketBuilder::new()
        .mount_api_routes(routes![whoami, gate, explode, current_session, logout])
        .blocking_client()
}

fn signed_token() -> String {
    let codec = TokenCodec::new(test_keys());
    codec.sign(&test_user()).expect("signed session token")
}

fn token_with_timestamps(iat: i64, exp: i64) -> String {
    let claims = SessionClaims {
        user: test_user(),
        iat,
        exp,
    };
    encode(
        &Header::new(Algorithm::RS256),
        &claims,
        &test_keys().encoding_key,
    )
    .expect("encoded claims")
}

fn decode_claims(token: &str) -> SessionClaims {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.leeway = 0;
    jsonwebtoken::decode::<SessionClaims>(token, &test_keys().decoding_key, &validation)
        .expect("decoded claims")
        .claims
}

#[test]
fn whoami_without_cookie_is_unauthorized() {
    let client = guard_client();

    let response = client.get("/api/whoami").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    assert!(response.cookies().get(SESSION_COOKIE_NAME).is_none());

    let payload: DataResponse<String> = response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data, "user not logged in");
}

#[test]
fn valid_session_passes_guard_and_refreshes_cookie() {
    let client = guard_client();
    let token = signed_token();

    let response = client
        .get("/api/whoami")
        .private_cookie(Cookie::new(SESSION_COOKIE_NAME, token))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let set_cookie_count = response
        .headers()
        .get("Set-Cookie")
        .filter(|header| header.contains(SESSION_COOKIE_NAME))
        .count();
    assert_eq!(set_cookie_count, 1, "exactly one refreshed session cookie");

    let refreshed = response
        .cookies()
        .get(SESSION_COOKIE_NAME)
        .expect("refreshed session cookie");
    assert_eq!(refreshed.max_age(), Some(Duration::seconds(15 * 60)));
    assert_eq!(refreshed.http_only(), Some(true));
    assert_eq!(refreshed.same_site(), Some(SameSite::Strict));
    assert_eq!(refreshed.path(), Some("/"));

    let payload: DataResponse<User> = response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data, test_user());
}

#[test]
fn refreshed_token_carries_a_later_issue_time() {
    let client = guard_client();
    let token = signed_token();
    let original_iat = decode_claims(&token).iat;

    // Issue times have second granularity, so force the clock forward.
    std::thread::sleep(std::time::Duration::from_millis(1100));

    let response = client
        .get("/api/whoami")
        .private_cookie(Cookie::new(SESSION_COOKIE_NAME, token.clone()))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let refreshed = response
        .cookies()
        .get_private(SESSION_COOKIE_NAME)
        .expect("refreshed session cookie");
    assert_ne!(refreshed.value(), token);
    assert!(decode_claims(refreshed.value()).iat > original_iat);
}

#[test]
fn chained_requests_refresh_the_cookie_every_hop() {
    let client = guard_client();
    let token = signed_token();
    let mut last_iat = decode_claims(&token).iat;

    let response = client
        .get("/api/whoami")
        .private_cookie(Cookie::new(SESSION_COOKIE_NAME, token))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    // Each hop rides the cookie the previous response staged in the
    // tracked client's jar.
    for _ in 0..3 {
        std::thread::sleep(std::time::Duration::from_millis(1100));

        let response = client.get("/api/whoami").dispatch();
        assert_eq!(response.status(), Status::Ok);

        let set_cookie_count = response
            .headers()
            .get("Set-Cookie")
            .filter(|header| header.contains(SESSION_COOKIE_NAME))
            .count();
        assert_eq!(set_cookie_count, 1, "exactly one cookie per hop");

        let refreshed = response
            .cookies()
            .get_private(SESSION_COOKIE_NAME)
            .expect("refreshed session cookie");
        let iat = decode_claims(refreshed.value()).iat;
        assert!(iat > last_iat, "each hop re-signs with a later issue time");
        last_iat = iat;
    }
}

#[test]
fn stale_token_is_rejected_even_before_expiry() {
    let client = guard_client();
    let now = chrono::Utc::now().timestamp();
    let token = token_with_timestamps(now - 901, now + 600);

    let response = client
        .get("/api/whoami")
        .private_cookie(Cookie::new(SESSION_COOKIE_NAME, token))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    assert!(
        response.cookies().get(SESSION_COOKIE_NAME).is_none(),
        "rejected sessions are not refreshed"
    );

    let payload: DataResponse<String> = response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data, "user not logged in");
}

#[test]
fn expired_token_is_rejected() {
    let client = guard_client();
    let now = chrono::Utc::now().timestamp();
    let token = token_with_timestamps(now - 1000, now - 100);

    let response = client
        .get("/api/whoami")
        .private_cookie(Cookie::new(SESSION_COOKIE_NAME, token))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
}

#[test]
fn forged_cookie_reads_as_no_session() {
    let client = guard_client();

    // A plain cookie is not sealed with the server key, so it never
    // reaches token verification.
    let response = client
        .get("/api/whoami")
        .cookie(Cookie::new(SESSION_COOKIE_NAME, "garbage"))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);

    let response = client
        .post("/api/gate")
        .cookie(Cookie::new(SESSION_COOKIE_NAME, "garbage"))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
}

#[test]
fn active_session_blocks_login_only_routes() {
    let client = guard_client();
    let token = signed_token();

    let response = client
        .post("/api/gate")
        .private_cookie(Cookie::new(SESSION_COOKIE_NAME, token))
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);

    let payload: DataResponse<String> = response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data, "user already logged in");
}

#[test]
fn guest_passes_login_only_routes() {
    let client = guard_client();

    let response = client.post("/api/gate").dispatch();
    assert_eq!(response.status(), Status::Ok);

    let payload: DataResponse<String> = response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data, "open");
}

#[test]
fn invalid_token_passes_login_only_routes() {
    let client = guard_client();
    let now = chrono::Utc::now().timestamp();
    let token = token_with_timestamps(now - 1000, now - 100);

    let response = client
        .post("/api/gate")
        .private_cookie(Cookie::new(SESSION_COOKIE_NAME, token))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
}

#[test]
fn logout_without_session_is_unauthorized() {
    let client = guard_client();

    let response = client.post("/api/user/logout").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);

    let payload: DataResponse<String> = response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data, "user not logged in");
}

#[test]
fn logout_clears_the_session_cookie() {
    let client = guard_client();
    let token = signed_token();

    let response = client
        .post("/api/user/logout")
        .private_cookie(Cookie::new(SESSION_COOKIE_NAME, token))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let removal = response
        .cookies()
        .get(SESSION_COOKIE_NAME)
        .expect("removal cookie");
    assert_eq!(removal.value(), "");
    assert_eq!(removal.max_age(), Some(Duration::ZERO));

    let payload: DataResponse<String> = response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data, "Successfully logged out");

    // The tracked client applied the removal, so the session is gone.
    let follow_up = client.get("/api/whoami").dispatch();
    assert_eq!(follow_up.status(), Status::Unauthorized);
}

#[test]
fn session_probe_reports_current_user() {
    let client = guard_client();
    let token = signed_token();

    let response = client
        .get("/api/user/session")
        .private_cookie(Cookie::new(SESSION_COOKIE_NAME, token))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let payload: DataResponse<Option<User>> = response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data, Some(test_user()));
}

#[test]
fn session_probe_reports_null_without_session() {
    let client = guard_client();

    let response = client.get("/api/user/session").dispatch();
    assert_eq!(response.status(), Status::Ok);

    let payload: DataResponse<Option<User>> = response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data, None);
}

#[test]
fn handler_errors_still_carry_the_refreshed_cookie() {
    let client = guard_client();
    let token = signed_token();

    let response = client
        .get("/api/explode")
        .private_cookie(Cookie::new(SESSION_COOKIE_NAME, token))
        .dispatch();
    assert_eq!(response.status(), Status::NotFound);
    assert!(
        response.cookies().get(SESSION_COOKIE_NAME).is_some(),
        "refresh happens before the handler runs"
    );
}
