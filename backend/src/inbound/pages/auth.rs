//! Authentication pages and the cookie-backed session flow.
//!
//! Login and registration submit to the JSON API from the browser; the
//! resulting token comes back to `POST /auth/set-session`, which stores the
//! `token`/`user` cookie pair. Logout clears the pair and `GET /auth/check`
//! lets page scripts probe the current session.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use super::forms::SetSessionForm;
use super::{respond, session_cookies, views};
use crate::inbound::http::session::RequestIdentity;
use crate::inbound::http::state::HttpState;

/// Query string carrying a flash error message.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    /// Message displayed above the form.
    pub error: Option<String>,
}

fn flash_banner(query: &FlashQuery) -> String {
    query
        .error
        .as_deref()
        .map(|message| format!(r#"<p class="error">{}</p>"#, views::escape(message)))
        .unwrap_or_default()
}

/// Login form.
#[get("/login")]
pub async fn login_page(identity: RequestIdentity, query: web::Query<FlashQuery>) -> HttpResponse {
    let body = format!(
        r#"{flash}<h1>Log in</h1>
<form id="login" method="post" action="/auth/set-session">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<input type="hidden" name="token">
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/auth/register">Register</a>.</p>"#,
        flash = flash_banner(&query),
    );
    respond(
        &identity,
        views::html(views::layout("Log in", identity.identity(), &body)),
    )
}

/// Registration form.
#[get("/register")]
pub async fn register_page(
    identity: RequestIdentity,
    query: web::Query<FlashQuery>,
) -> HttpResponse {
    let body = format!(
        r#"{flash}<h1>Register</h1>
<form id="register" method="post" action="/auth/set-session">
<label>Username <input name="username" required></label>
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<input type="hidden" name="token">
<button type="submit">Register</button>
</form>"#,
        flash = flash_banner(&query),
    );
    respond(
        &identity,
        views::html(views::layout("Register", identity.identity(), &body)),
    )
}

/// Store the cookie pair for a token obtained from the API, then go home.
#[post("/set-session")]
pub async fn set_session(
    state: web::Data<HttpState>,
    form: web::Form<SetSessionForm>,
) -> HttpResponse {
    let body = form.into_inner();
    let Some(token) = body.token.filter(|value| !value.trim().is_empty()) else {
        return views::redirect("/auth/login?error=Session+failed");
    };

    let (token_cookie, user_cookie) = session_cookies(token, body.user, state.cookies);
    let mut response = views::redirect("/");
    if response.add_cookie(&token_cookie).is_err() || response.add_cookie(&user_cookie).is_err() {
        tracing::warn!("failed to attach session cookies");
        return views::redirect("/auth/login?error=Session+failed");
    }
    response
}

/// Clear the session cookie pair and go home.
#[get("/logout")]
pub async fn logout() -> HttpResponse {
    let (token_cookie, user_cookie) = super::removal_cookies();
    let mut response = views::redirect("/");
    if response.add_removal_cookie(&token_cookie).is_err()
        || response.add_removal_cookie(&user_cookie).is_err()
    {
        tracing::warn!("failed to clear session cookies");
    }
    response
}

/// Session probe payload returned by `GET /auth/check`.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    /// Whether a verifiable token accompanied the request.
    #[serde(rename = "loggedIn")]
    pub logged_in: bool,
    /// Resolved identity when logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<CheckUser>,
}

/// Identity subset exposed to page scripts.
#[derive(Debug, Serialize)]
pub struct CheckUser {
    /// Stable user identifier.
    pub id: String,
    /// Authorization tier.
    pub role: String,
    /// Email address.
    pub email: String,
}

/// Quick login check for page scripts.
#[get("/check")]
pub async fn check(identity: RequestIdentity) -> HttpResponse {
    let payload = identity.identity().map_or(
        CheckResponse {
            logged_in: false,
            user: None,
        },
        |user| CheckResponse {
            logged_in: true,
            user: Some(CheckUser {
                id: user.id.to_string(),
                role: user.role.to_string(),
                email: user.email.clone(),
            }),
        },
    );
    respond(&identity, HttpResponse::Ok().json(payload))
}
