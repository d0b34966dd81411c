//! HTTP error payloads and mapping from domain errors.
//!
//! Keep the domain free of transport concerns by translating
//! [`Error`](crate::domain::Error) into Actix responses here. Every error
//! response uses the API envelope `{success: false, code, message, errors?}`
//! plus a `traceId` tying the response to server logs.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::domain::ports::{RestaurantPersistenceError, UserPersistenceError};
use crate::domain::{
    Error, ErrorCode, RestaurantValidationError, UserValidationError,
};
use crate::middleware::trace::{TraceId, TRACE_ID_HEADER};

/// Error returned by API handlers; renders the JSON error envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
}

impl ApiError {
    /// Construct an API error from a domain failure, capturing any ambient
    /// trace identifier.
    #[must_use]
    pub fn from_domain(error: Error) -> Self {
        Self {
            code: error.code(),
            message: error.message().to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: error.details().cloned(),
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    const fn to_status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self::from_domain(value)
    }
}

impl From<actix_web::Error> for ApiError {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to API error");
        Self {
            code: ErrorCode::InternalError,
            message: "Internal server error".to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// JSON body rendered for every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    success: bool,
    code: ErrorCode,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<&'a str>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.to_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.clone()));
        }

        // Never leak internal detail to clients; the full message is logged
        // where the failure happened.
        let redact = matches!(self.code, ErrorCode::InternalError);
        let message = if redact {
            "Internal server error"
        } else {
            self.message.as_str()
        };
        builder.json(ErrorBody {
            success: false,
            code: self.code,
            message,
            errors: if redact { None } else { self.details.as_ref() },
            trace_id: self.trace_id.as_deref(),
        })
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Map user persistence failures onto domain errors.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::service_unavailable("database not available, please try again")
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(message)
        }
        UserPersistenceError::DuplicateUsername => Error::invalid_request("user already exists")
            .with_details(serde_json::json!([{
                "field": "username",
                "code": "duplicate",
                "message": "username is already taken",
            }])),
        UserPersistenceError::DuplicateEmail => Error::invalid_request("user already exists")
            .with_details(serde_json::json!([{
                "field": "email",
                "code": "duplicate",
                "message": "email is already registered",
            }])),
    }
}

/// Map restaurant persistence failures onto domain errors.
pub(crate) fn map_restaurant_persistence_error(error: RestaurantPersistenceError) -> Error {
    match error {
        RestaurantPersistenceError::Connection { message } => {
            error!(%message, "restaurant repository unavailable");
            Error::service_unavailable("database not available, please try again")
        }
        RestaurantPersistenceError::Query { message } => {
            error!(%message, "restaurant repository query failed");
            Error::internal(message)
        }
    }
}

/// Map a draft validation failure onto the 400 envelope with its per-field
/// issue list.
pub(crate) fn map_restaurant_validation_error(error: &RestaurantValidationError) -> Error {
    Error::invalid_request("validation failed").with_details(error.to_details())
}

/// Field name reported for each user validation failure.
pub(crate) const fn user_validation_field(error: &UserValidationError) -> &'static str {
    match error {
        UserValidationError::EmptyId | UserValidationError::InvalidId => "id",
        UserValidationError::EmptyUsername
        | UserValidationError::UsernameTooShort { .. }
        | UserValidationError::UsernameTooLong { .. }
        | UserValidationError::UsernameInvalidCharacters => "username",
        UserValidationError::InvalidEmail => "email",
        UserValidationError::InvalidRole => "role",
        UserValidationError::EmptyPassword | UserValidationError::PasswordTooShort { .. } => {
            "password"
        }
    }
}

/// Map a user-input validation failure onto the 400 envelope.
pub(crate) fn map_user_validation_error(error: &UserValidationError) -> Error {
    let field = user_validation_field(error);
    Error::invalid_request(error.to_string()).with_details(serde_json::json!([{
        "field": field,
        "code": "invalid_field",
        "message": error.to_string(),
    }]))
}

#[cfg(test)]
mod tests;
