use rocket::http::{Cookie, CookieJar, SameSite};
use time::Duration as TimeDuration;

use crate::models::User;
use crate::session::SessionResult;
use crate::session::token::{SESSION_MAX_AGE_SECS, TokenCodec};

/// Name of the session cookie. Browsers echo it back on every request.
pub const SESSION_COOKIE_NAME: &str = "userSession";

/// Moves session tokens between the codec and the cookie jar.
///
/// The token rides in a private cookie, so the jar authenticates the cookie
/// itself before the RS256 signature inside is ever checked. A cookie whose
/// seal fails reads back as absent, not as an invalid token.
pub struct SessionCookieGateway {
    codec: TokenCodec,
    cookie_secure: bool,
}

impl SessionCookieGateway {
    pub fn new(codec: TokenCodec, cookie_secure: bool) -> Self {
        Self {
            codec,
            cookie_secure,
        }
    }

    /// Signs a fresh token for `user` and stages it as the one outbound
    /// session cookie. Adding under the same name replaces any cookie staged
    /// earlier in the request, so a response never carries two.
    pub fn issue(&self, cookies: &CookieJar<'_>, user: &User) -> SessionResult<()> {
        let token = self.codec.sign(user)?;
        cookies.add_private(self.build_cookie(token));
        Ok(())
    }

    /// Returns the raw token from the request, if the jar holds one with an
    /// intact seal.
    pub fn read(&self, cookies: &CookieJar<'_>) -> Option<String> {
        cookies
            .get_private(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
    }

    /// Stages a removal cookie (Max-Age zero) for the session.
    pub fn revoke(&self, cookies: &CookieJar<'_>) {
        cookies.remove_private(Cookie::build(SESSION_COOKIE_NAME).path("/"));
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    fn build_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.cookie_secure)
            .max_age(TimeDuration::seconds(SESSION_MAX_AGE_SECS))
            .build()
    }
}
