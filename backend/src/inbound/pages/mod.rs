//! Server-rendered page adapter.
//!
//! Pages share the repositories and token machinery with the JSON API but
//! differ in how failures surface: missing authentication redirects to the
//! login page instead of producing a 401, authorization and store failures
//! render error views, and query parameters degrade permissively to their
//! defaults instead of rejecting the request.

pub mod auth;
pub mod forms;
pub mod restaurants;
pub(crate) mod views;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{get, web, HttpResponse};

use crate::inbound::http::session::{RequestIdentity, TOKEN_COOKIE, USER_COOKIE};
use crate::inbound::http::state::CookiePolicy;

/// Register the page routes on an application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(
            web::scope("/auth")
                .service(auth::login_page)
                .service(auth::register_page)
                .service(auth::set_session)
                .service(auth::check)
                .service(auth::logout),
        )
        .service(
            web::scope("/restaurants")
                .service(restaurants::search_page)
                .service(restaurants::search_results)
                .service(restaurants::create_page)
                .service(restaurants::create_submit)
                .service(restaurants::edit_page)
                .service(restaurants::update_submit)
                .service(restaurants::delete_confirm)
                .service(restaurants::delete_submit)
                .service(restaurants::details_page),
        );
}

/// Landing page.
#[get("/")]
async fn home(identity: RequestIdentity) -> HttpResponse {
    let body = "<h1>Restaurant directory</h1>\
<p>Browse the directory from the <a href=\"/restaurants/search\">search page</a>, \
or <a href=\"/restaurants/create\">add a restaurant</a> once logged in.</p>";
    respond(
        &identity,
        views::html(views::layout("Restaurant directory", identity.identity(), body)),
    )
}

/// Fallback for unmatched routes; renders an error view instead of a bare
/// framework 404.
pub async fn not_found() -> HttpResponse {
    views::error_page(StatusCode::NOT_FOUND, "Page not found.")
}

/// Build the `token`/`user` cookie pair set after login.
pub(crate) fn session_cookies(
    token: String,
    user_json: Option<String>,
    policy: CookiePolicy,
) -> (Cookie<'static>, Cookie<'static>) {
    let max_age = actix_web::cookie::time::Duration::hours(policy.max_age_hours);
    let token_cookie = Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .finish();
    // Display-only; readable by page scripts, so never authoritative.
    let user_cookie = Cookie::build(USER_COOKIE, user_json.unwrap_or_default())
        .path("/")
        .http_only(false)
        .secure(policy.secure)
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .finish();
    (token_cookie, user_cookie)
}

/// Removal cookies clearing the session pair.
pub(crate) fn removal_cookies() -> (Cookie<'static>, Cookie<'static>) {
    let mut token_cookie = Cookie::new(TOKEN_COOKIE, "");
    token_cookie.set_path("/");
    token_cookie.make_removal();
    let mut user_cookie = Cookie::new(USER_COOKIE, "");
    user_cookie.set_path("/");
    user_cookie.make_removal();
    (token_cookie, user_cookie)
}

/// Attach stale-cookie cleanup to a page response when the presented cookie
/// token failed verification, so the client is not stuck with a dead token.
pub(crate) fn respond(identity: &RequestIdentity, mut response: HttpResponse) -> HttpResponse {
    if identity.stale_cookie() {
        let (token_cookie, user_cookie) = removal_cookies();
        if response.add_removal_cookie(&token_cookie).is_err()
            || response.add_removal_cookie(&user_cookie).is_err()
        {
            tracing::warn!("failed to attach session removal cookies");
        }
    }
    response
}
