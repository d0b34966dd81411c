//! Integration coverage for the server-rendered page surface: redirects,
//! admin gating, bracketed form handling, and cookie lifecycle.

mod support;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::test as actix_test;
use backend::domain::user::Role;
use serde_json::Value;

use support::{seed_restaurant, test_app, test_context, token_for};

fn location(response: &actix_web::dev::ServiceResponse) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

fn set_cookie_headers(response: &actix_web::dev::ServiceResponse) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|value| value.to_str().ok())
        .map(str::to_owned)
        .collect()
}

#[actix_web::test]
async fn home_renders_for_anonymous_visitors() {
    let ctx = test_context();
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = actix_test::read_body(response).await;
    let html = std::str::from_utf8(&body).expect("utf8 body");
    assert!(html.contains("Restaurant directory"));
    assert!(html.contains("/auth/login"));
}

#[actix_web::test]
async fn create_page_redirects_anonymous_visitors_to_login() {
    let ctx = test_context();
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/restaurants/create")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login");
}

#[actix_web::test]
async fn bracketed_form_create_persists_and_redirects() {
    let ctx = test_context();
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;
    let token = token_for(&ctx.tokens, Role::User);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/restaurants")
            .cookie(Cookie::new("token", token))
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(
                "name=Form+Bistro&rating=4.1&address%5Bstreet%5D=2+Rue+Vide&address%5Bcity%5D=Nice\
                 &address%5Bcountry%5D=France&cuisines=French%2CSeafood&amenities=Terrace\
                 &hasWifi=on&location=Old+town&geo%5Blat%5D=43.7&geo%5Blng%5D=7.26\
                 &priceRange=%24%24&averageCostForTwo=55&currency=EUR",
            )
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/restaurants/search/results");
    assert_eq!(ctx.restaurants.len(), 1);
}

#[actix_web::test]
async fn invalid_form_rerenders_with_field_errors() {
    let ctx = test_context();
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;
    let token = token_for(&ctx.tokens, Role::User);

    // No cuisines and no price range: the form page comes back annotated.
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/restaurants")
            .cookie(Cookie::new("token", token))
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("name=Half+Finished&address%5Bcity%5D=Nice")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = actix_test::read_body(response).await;
    let html = std::str::from_utf8(&body).expect("utf8 body");
    assert!(html.contains("cuisines"));
    assert!(html.contains("priceRange"));
    assert!(html.contains("Half Finished"));
    assert_eq!(ctx.restaurants.len(), 0);
}

#[actix_web::test]
async fn edit_page_enforces_the_admin_tier() {
    let ctx = test_context();
    let seeded = seed_restaurant(&ctx.restaurants, "Guarded", "Paris", "French", 4.0);
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;

    let anonymous = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/restaurants/{}/edit", seeded.id))
            .to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::FOUND);
    assert_eq!(
        location(&anonymous),
        "/auth/login?error=Please+login+to+continue"
    );

    let user_token = token_for(&ctx.tokens, Role::User);
    let forbidden = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/restaurants/{}/edit", seeded.id))
            .cookie(Cookie::new("token", user_token))
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let admin_token = token_for(&ctx.tokens, Role::Admin);
    let allowed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/restaurants/{}/edit", seeded.id))
            .cookie(Cookie::new("token", admin_token))
            .to_request(),
    )
    .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    let body = actix_test::read_body(allowed).await;
    let html = std::str::from_utf8(&body).expect("utf8 body");
    assert!(html.contains("Guarded"));
}

#[actix_web::test]
async fn admin_update_applies_page_defaults_and_redirects() {
    let ctx = test_context();
    let seeded = seed_restaurant(&ctx.restaurants, "Before", "Paris", "French", 4.0);
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;
    let admin_token = token_for(&ctx.tokens, Role::Admin);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/restaurants/{}/update", seeded.id))
            .cookie(Cookie::new("token", admin_token))
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(
                "name=After&rating=4.6&address%5Bstreet%5D=1+Main+St&address%5Bcity%5D=Paris\
                 &address%5Bcountry%5D=France&cuisines=French&location=Downtown\
                 &geo%5Blat%5D=48.85&geo%5Blng%5D=2.35&averageCostForTwo=70",
            )
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/restaurants/{}", seeded.id));

    assert_eq!(ctx.restaurants.len(), 1);
}

#[actix_web::test]
async fn delete_flow_confirms_then_removes() {
    let ctx = test_context();
    let seeded = seed_restaurant(&ctx.restaurants, "Doomed", "Paris", "French", 4.0);
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;
    let admin_token = token_for(&ctx.tokens, Role::Admin);

    let confirm = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/restaurants/{}/delete", seeded.id))
            .cookie(Cookie::new("token", admin_token.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(confirm.status(), StatusCode::OK);
    let body = actix_test::read_body(confirm).await;
    assert!(std::str::from_utf8(&body).expect("utf8 body").contains("Doomed"));

    let commit = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/restaurants/{}/delete", seeded.id))
            .cookie(Cookie::new("token", admin_token))
            .to_request(),
    )
    .await;
    assert_eq!(commit.status(), StatusCode::FOUND);
    assert_eq!(location(&commit), "/restaurants/search/results");
    assert_eq!(ctx.restaurants.len(), 0);
}

#[actix_web::test]
async fn details_page_renders_reviews_and_404s_for_unknown_ids() {
    let ctx = test_context();
    let seeded = seed_restaurant(&ctx.restaurants, "Reviewed", "Paris", "French", 4.0);
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;

    let found = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/restaurants/{}", seeded.id))
            .to_request(),
    )
    .await;
    assert_eq!(found.status(), StatusCode::OK);

    let missing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/restaurants/3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_results_degrade_malformed_parameters_to_defaults() {
    let ctx = test_context();
    seed_restaurant(&ctx.restaurants, "Kept", "Paris", "French", 4.0);
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/restaurants/search/results?page=abc&perPage=0&minRating=nine")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = actix_test::read_body(response).await;
    assert!(std::str::from_utf8(&body).expect("utf8 body").contains("Kept"));
}

#[actix_web::test]
async fn store_outage_renders_an_error_view() {
    let ctx = test_context();
    ctx.restaurants.take_down();
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/restaurants/search/results")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = actix_test::read_body(response).await;
    assert!(std::str::from_utf8(&body)
        .expect("utf8 body")
        .contains("Database not available"));
}

#[actix_web::test]
async fn stale_cookie_tokens_are_cleared_on_page_responses() {
    let ctx = test_context();
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/")
            .cookie(Cookie::new("token", "expired-garbage"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookie_headers(&response);
    assert!(
        cookies.iter().any(|cookie| cookie.starts_with("token=")),
        "token removal cookie expected, got {cookies:?}"
    );
    assert!(cookies.iter().any(|cookie| cookie.starts_with("user=")));
}

#[actix_web::test]
async fn set_session_stores_the_cookie_pair() {
    let ctx = test_context();
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;
    let token = token_for(&ctx.tokens, Role::User);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/auth/set-session")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(format!("token={token}&user=%7B%7D"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    let cookies = set_cookie_headers(&response);
    assert!(cookies.iter().any(|cookie| cookie.starts_with("token=")
        && cookie.contains("HttpOnly")));
    assert!(cookies.iter().any(|cookie| cookie.starts_with("user=")
        && !cookie.contains("HttpOnly")));
}

#[actix_web::test]
async fn set_session_without_token_bounces_back_to_login() {
    let ctx = test_context();
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/auth/set-session")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("user=%7B%7D")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login?error=Session+failed");
}

#[actix_web::test]
async fn logout_clears_the_cookie_pair_and_goes_home() {
    let ctx = test_context();
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/auth/logout")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    let cookies = set_cookie_headers(&response);
    assert_eq!(cookies.len(), 2);
}

#[actix_web::test]
async fn auth_check_reports_session_state() {
    let ctx = test_context();
    let app = actix_test::init_service(test_app(ctx.state.clone())).await;

    let anonymous = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/auth/check").to_request(),
    )
    .await;
    let anonymous_body: Value = actix_test::read_body_json(anonymous).await;
    assert_eq!(
        anonymous_body.get("loggedIn").and_then(Value::as_bool),
        Some(false)
    );

    let token = token_for(&ctx.tokens, Role::Admin);
    let logged_in = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/auth/check?token={token}"))
            .to_request(),
    )
    .await;
    let logged_in_body: Value = actix_test::read_body_json(logged_in).await;
    assert_eq!(
        logged_in_body.get("loggedIn").and_then(Value::as_bool),
        Some(true)
    );
    assert_eq!(
        logged_in_body.pointer("/user/role").and_then(Value::as_str),
        Some("admin")
    );
}
