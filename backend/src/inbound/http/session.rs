//! Request identity resolution.
//!
//! A token may arrive through three channels, tried strictly in order:
//! `Authorization: Bearer` header, the `token` cookie, then a `token` query
//! parameter. The first channel that yields a token wins; channels are never
//! merged. Verification failures resolve to "no identity" rather than an
//! error so read paths keep working for anonymous clients; page handlers
//! additionally learn when a *cookie* token was stale so they can clear the
//! cookie pair.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::debug;

use crate::domain::{AuthenticatedUser, Error, TokenIssuer};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;

/// Name of the cookie holding the signed token.
pub const TOKEN_COOKIE: &str = "token";
/// Name of the companion cookie holding display-only user data.
pub const USER_COOKIE: &str = "user";

/// Channel a token was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `Authorization: Bearer <token>` header.
    BearerHeader,
    /// `token` cookie.
    Cookie,
    /// `token` query parameter.
    Query,
}

fn bearer_token(req: &HttpRequest) -> Option<(String, TokenSource)> {
    let header = req.headers().get(actix_web::http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some((token.to_owned(), TokenSource::BearerHeader))
}

fn cookie_token(req: &HttpRequest) -> Option<(String, TokenSource)> {
    let cookie = req.cookie(TOKEN_COOKIE)?;
    let token = cookie.value().trim();
    if token.is_empty() {
        return None;
    }
    Some((token.to_owned(), TokenSource::Cookie))
}

fn query_token(req: &HttpRequest) -> Option<(String, TokenSource)> {
    url::form_urlencoded::parse(req.query_string().as_bytes())
        .find(|(key, value)| key.as_ref() == "token" && !value.is_empty())
        .map(|(_, value)| (value.into_owned(), TokenSource::Query))
}

/// Ordered token extraction strategies; first non-empty result wins.
const TOKEN_SOURCES: [fn(&HttpRequest) -> Option<(String, TokenSource)>; 3] =
    [bearer_token, cookie_token, query_token];

/// Pull a raw token and its source out of a request, if any is present.
#[must_use]
pub fn extract_token(req: &HttpRequest) -> Option<(String, TokenSource)> {
    TOKEN_SOURCES.iter().find_map(|extract| extract(req))
}

/// Identity resolved for the current request.
///
/// Extracting this never fails for anonymous or bad-token requests; handlers
/// opt into enforcement through [`RequestIdentity::require`] and
/// [`RequestIdentity::require_admin`].
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    identity: Option<AuthenticatedUser>,
    stale_cookie: bool,
}

impl RequestIdentity {
    /// Resolve the identity for a request using the given verifier.
    #[must_use]
    pub fn resolve(req: &HttpRequest, tokens: &TokenIssuer) -> Self {
        let Some((token, source)) = extract_token(req) else {
            return Self {
                identity: None,
                stale_cookie: false,
            };
        };

        match tokens.verify(&token) {
            Ok(identity) => Self {
                identity: Some(identity),
                stale_cookie: false,
            },
            Err(error) => {
                debug!(%error, ?source, "token verification failed");
                Self {
                    identity: None,
                    stale_cookie: source == TokenSource::Cookie,
                }
            }
        }
    }

    /// The verified identity, when one was presented.
    #[must_use]
    pub const fn identity(&self) -> Option<&AuthenticatedUser> {
        self.identity.as_ref()
    }

    /// Whether a cookie-sourced token failed verification; page routes use
    /// this to clear the dead cookie pair.
    #[must_use]
    pub const fn stale_cookie(&self) -> bool {
        self.stale_cookie
    }

    /// Require an authenticated identity or fail with `401 Unauthorized`.
    pub fn require(&self) -> Result<&AuthenticatedUser, Error> {
        self.identity()
            .ok_or_else(|| Error::unauthorized("authentication required"))
    }

    /// Require the administrator tier or fail with 401/403.
    pub fn require_admin(&self) -> Result<&AuthenticatedUser, Error> {
        let identity = self.require()?;
        if !identity.is_admin() {
            return Err(Error::forbidden("admin access required"));
        }
        Ok(identity)
    }
}

impl FromRequest for RequestIdentity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolved = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| Self::resolve(req, &state.tokens))
            .ok_or_else(|| ApiError::from(Error::internal("HttpState is not configured")));
        ready(resolved)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::password;
    use crate::domain::user::{Email, Role, Username};
    use crate::domain::User;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use chrono::Duration;
    use rstest::rstest;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret", Duration::hours(1))
    }

    fn token_for(role: Role) -> String {
        let user = User::register(
            Username::new("gourmand").expect("valid username"),
            Email::new("gourmand@example.com").expect("valid email"),
            role,
            password::hash("longenough").expect("hashing succeeds"),
        );
        issuer().issue(&user).expect("token issues")
    }

    #[rstest]
    fn bearer_header_resolves_identity() {
        let token = token_for(Role::User);
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();

        let resolved = RequestIdentity::resolve(&req, &issuer());
        assert!(resolved.identity().is_some());
        assert!(!resolved.stale_cookie());
    }

    #[rstest]
    fn cookie_resolves_identity() {
        let token = token_for(Role::User);
        let req = TestRequest::default()
            .cookie(Cookie::new(TOKEN_COOKIE, token))
            .to_http_request();

        let resolved = RequestIdentity::resolve(&req, &issuer());
        assert!(resolved.identity().is_some());
    }

    #[rstest]
    fn query_parameter_resolves_identity() {
        let token = token_for(Role::User);
        let req = TestRequest::default()
            .uri(&format!("/?token={token}"))
            .to_http_request();

        let resolved = RequestIdentity::resolve(&req, &issuer());
        assert!(resolved.identity().is_some());
    }

    #[rstest]
    fn header_wins_over_cookie() {
        let good = token_for(Role::Admin);
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {good}")))
            .cookie(Cookie::new(TOKEN_COOKIE, "garbage"))
            .to_http_request();

        let resolved = RequestIdentity::resolve(&req, &issuer());
        let identity = resolved.identity().expect("header token verified");
        assert!(identity.is_admin());
        // The cookie channel was never consulted, so it is not flagged stale.
        assert!(!resolved.stale_cookie());
    }

    #[rstest]
    fn stale_cookie_is_flagged() {
        let req = TestRequest::default()
            .cookie(Cookie::new(TOKEN_COOKIE, "garbage"))
            .to_http_request();

        let resolved = RequestIdentity::resolve(&req, &issuer());
        assert!(resolved.identity().is_none());
        assert!(resolved.stale_cookie());
    }

    #[rstest]
    fn stale_query_token_is_not_flagged() {
        let req = TestRequest::default()
            .uri("/?token=garbage")
            .to_http_request();

        let resolved = RequestIdentity::resolve(&req, &issuer());
        assert!(resolved.identity().is_none());
        assert!(!resolved.stale_cookie());
    }

    #[rstest]
    fn anonymous_request_has_no_identity() {
        let req = TestRequest::default().to_http_request();
        let resolved = RequestIdentity::resolve(&req, &issuer());
        assert!(resolved.identity().is_none());
        assert!(resolved.require().is_err());
    }

    #[rstest]
    fn user_tier_cannot_pass_admin_gate() {
        let token = token_for(Role::User);
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();

        let resolved = RequestIdentity::resolve(&req, &issuer());
        let err = resolved.require_admin().expect_err("user is not admin");
        assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
    }
}
