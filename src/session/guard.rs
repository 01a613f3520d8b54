use rocket::http::{CookieJar, Status};
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use rocket_okapi::request::OpenApiFromRequest;

use crate::models::User;
use crate::session::SessionError;
use crate::session::cookie::SessionCookieGateway;
use crate::session::token::VerifyResult;

/// What the request's cookie jar tells us about the session.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No session cookie, or one whose seal was broken.
    NoToken,
    /// A sealed cookie arrived but the token inside failed verification.
    TokenInvalid,
    /// A verified token carrying this user.
    TokenValid(User),
}

/// The four stances a route can take toward the session.
///
/// Policies differ only in which states they accept and whether passing
/// through re-stamps the session. All decisions funnel through [`apply`],
/// so the acceptance and rejection arms of each policy come from one match
/// and cannot drift apart.
///
/// [`apply`]: GuardPolicy::apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Requires a live session and slides its window forward.
    Authenticated,
    /// Requires the absence of a live session. Used by login and
    /// registration. Never refreshes.
    Unauthenticated,
    /// Requires a live session but leaves it alone, so revocation is the
    /// only cookie the response carries.
    Logout,
    /// Observes the session without gating or refreshing.
    Inspect,
}

#[derive(Debug)]
pub enum GuardDecision {
    Proceed { user: Option<User>, refresh: bool },
    Reject(SessionError),
}

impl GuardPolicy {
    pub fn apply(self, state: SessionState) -> GuardDecision {
        match (self, state) {
            (GuardPolicy::Authenticated, SessionState::TokenValid(user)) => {
                GuardDecision::Proceed {
                    user: Some(user),
                    refresh: true,
                }
            }
            (GuardPolicy::Authenticated, SessionState::NoToken) => {
                GuardDecision::Reject(SessionError::TokenMissing)
            }
            (GuardPolicy::Authenticated, SessionState::TokenInvalid) => {
                GuardDecision::Reject(SessionError::TokenInvalid)
            }

            (GuardPolicy::Unauthenticated, SessionState::TokenValid(_)) => {
                GuardDecision::Reject(SessionError::GuardMismatch)
            }
            (GuardPolicy::Unauthenticated, SessionState::NoToken)
            | (GuardPolicy::Unauthenticated, SessionState::TokenInvalid) => {
                GuardDecision::Proceed {
                    user: None,
                    refresh: false,
                }
            }

            (GuardPolicy::Logout, SessionState::TokenValid(user)) => GuardDecision::Proceed {
                user: Some(user),
                refresh: false,
            },
            (GuardPolicy::Logout, SessionState::NoToken) => {
                GuardDecision::Reject(SessionError::TokenMissing)
            }
            (GuardPolicy::Logout, SessionState::TokenInvalid) => {
                GuardDecision::Reject(SessionError::TokenInvalid)
            }

            (GuardPolicy::Inspect, SessionState::TokenValid(user)) => GuardDecision::Proceed {
                user: Some(user),
                refresh: false,
            },
            (GuardPolicy::Inspect, SessionState::NoToken)
            | (GuardPolicy::Inspect, SessionState::TokenInvalid) => GuardDecision::Proceed {
                user: None,
                refresh: false,
            },
        }
    }
}

/// Classifies the request's session by reading the cookie and verifying the
/// token inside it.
pub fn session_state(gateway: &SessionCookieGateway, cookies: &CookieJar<'_>) -> SessionState {
    let token = match gateway.read(cookies) {
        Some(token) => token,
        None => return SessionState::NoToken,
    };

    match gateway.codec().verify(&token) {
        VerifyResult::Valid(user) => SessionState::TokenValid(user),
        VerifyResult::Invalid => SessionState::TokenInvalid,
    }
}

/// Rejection message stashed in the request's local cache so the error
/// catcher can echo the exact body the guard decided on.
#[derive(Debug, Clone, Default)]
pub struct GuardRejection(pub Option<String>);

impl GuardRejection {
    pub fn message_or(&self, fallback: &str) -> String {
        self.0.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Runs `policy` against the request. On a refreshing pass-through the
/// replacement cookie is staged here, before the handler runs, so it rides
/// out on the response whatever status the handler picks.
async fn gate(
    request: &Request<'_>,
    policy: GuardPolicy,
) -> Result<Option<User>, (Status, SessionError)> {
    let gateway = match request
        .guard::<&State<SessionCookieGateway>>()
        .await
        .succeeded()
    {
        Some(gateway) => gateway,
        None => {
            let err = SessionError::Config("session gateway missing from state".into());
            return Err((err.status(), err));
        }
    };

    match policy.apply(session_state(gateway, request.cookies())) {
        GuardDecision::Proceed { user, refresh } => {
            if refresh {
                if let Some(user) = &user {
                    if let Err(err) = gateway.issue(request.cookies(), user) {
                        log::error!("failed to refresh session for user {}: {err}", user.id);
                        return Err((err.status(), err));
                    }
                }
            }
            Ok(user)
        }
        GuardDecision::Reject(err) => {
            let status = err.status();
            request.local_cache(|| GuardRejection(Some(err.to_string())));
            Err((status, err))
        }
    }
}

/// Request guard for routes that need a logged-in user.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct SessionUser(pub User);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionUser {
    type Error = SessionError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match gate(request, GuardPolicy::Authenticated).await {
            Ok(Some(user)) => Outcome::Success(SessionUser(user)),
            Ok(None) => {
                let err = SessionError::Config("authenticated gate passed without a user".into());
                Outcome::Error((err.status(), err))
            }
            Err((status, err)) => Outcome::Error((status, err)),
        }
    }
}

/// Request guard for routes only reachable while logged out. List it before
/// any body parameter so the session check runs first.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct RequireNoSession;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequireNoSession {
    type Error = SessionError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match gate(request, GuardPolicy::Unauthenticated).await {
            Ok(_) => Outcome::Success(RequireNoSession),
            Err((status, err)) => Outcome::Error((status, err)),
        }
    }
}

/// Request guard for logout: proves the session without renewing it.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct LogoutSession(pub User);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for LogoutSession {
    type Error = SessionError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match gate(request, GuardPolicy::Logout).await {
            Ok(Some(user)) => Outcome::Success(LogoutSession(user)),
            Ok(None) => {
                let err = SessionError::Config("logout gate passed without a user".into());
                Outcome::Error((err.status(), err))
            }
            Err((status, err)) => Outcome::Error((status, err)),
        }
    }
}

/// Request guard that reports the session without enforcing one.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct OptionalSession(pub Option<User>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalSession {
    type Error = SessionError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match gate(request, GuardPolicy::Inspect).await {
            Ok(user) => Outcome::Success(OptionalSession(user)),
            Err((status, err)) => Outcome::Error((status, err)),
        }
    }
}
