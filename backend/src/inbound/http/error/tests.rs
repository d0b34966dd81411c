//! Regression coverage for error envelope rendering and port-error mapping.

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::Value;

use super::*;

async fn body_json(error: ApiError) -> (StatusCode, Value) {
    let response = error.error_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body()).await.expect("body bytes");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST, "invalid_request")]
#[case(Error::unauthorized("who?"), StatusCode::UNAUTHORIZED, "unauthorized")]
#[case(Error::forbidden("no"), StatusCode::FORBIDDEN, "forbidden")]
#[case(Error::not_found("gone"), StatusCode::NOT_FOUND, "not_found")]
#[case(
    Error::service_unavailable("db down"),
    StatusCode::SERVICE_UNAVAILABLE,
    "service_unavailable"
)]
#[actix_web::test]
async fn codes_map_to_statuses(
    #[case] domain_error: Error,
    #[case] expected_status: StatusCode,
    #[case] expected_code: &str,
) {
    let (status, body) = body_json(ApiError::from(domain_error)).await;
    assert_eq!(status, expected_status);
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(false));
    assert_eq!(body.get("code").and_then(Value::as_str), Some(expected_code));
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let (status, body) = body_json(ApiError::from(Error::internal("secret detail"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Internal server error")
    );
    assert!(body.get("errors").is_none());
}

#[actix_web::test]
async fn validation_details_surface_as_errors_array() {
    let domain_error = Error::invalid_request("validation failed")
        .with_details(serde_json::json!([{ "field": "geo.lat" }]));
    let (status, body) = body_json(ApiError::from(domain_error)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body.get("errors").and_then(Value::as_array).expect("errors array");
    assert_eq!(
        errors.first().and_then(|entry| entry.get("field")).and_then(Value::as_str),
        Some("geo.lat")
    );
}

#[rstest]
fn duplicate_username_maps_to_structured_validation_error() {
    let error = map_user_persistence_error(UserPersistenceError::DuplicateUsername);
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details present");
    assert_eq!(
        details
            .as_array()
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.get("field"))
            .and_then(Value::as_str),
        Some("username")
    );
}

#[rstest]
fn connection_failures_map_to_service_unavailable() {
    let user_error =
        map_user_persistence_error(UserPersistenceError::connection("refused"));
    assert_eq!(user_error.code(), ErrorCode::ServiceUnavailable);

    let restaurant_error =
        map_restaurant_persistence_error(RestaurantPersistenceError::connection("refused"));
    assert_eq!(restaurant_error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(UserValidationError::InvalidEmail, "email")]
#[case(UserValidationError::EmptyPassword, "password")]
#[case(UserValidationError::InvalidRole, "role")]
#[case(UserValidationError::EmptyUsername, "username")]
fn user_validation_errors_name_their_field(
    #[case] error: UserValidationError,
    #[case] expected: &str,
) {
    assert_eq!(user_validation_field(&error), expected);
}
