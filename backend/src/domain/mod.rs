//! Domain primitives and aggregates.
//!
//! Purpose: define the strongly typed entities shared by the HTTP adapters
//! and the persistence layer. Types here are transport agnostic; each one
//! documents its invariants and serialisation contract in its own Rustdoc.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] — transport-agnostic failure payload.
//! - [`User`] and its value newtypes — validated identity data.
//! - [`TokenIssuer`] / [`AuthenticatedUser`] — signed session tokens.
//! - [`Restaurant`] and friends — the directory aggregate plus its draft
//!   validation pass.
//! - [`ports`] — async traits implemented by the outbound adapters.

pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod restaurant;
pub mod token;
pub mod user;

pub use self::auth::{LoginCredentials, RegistrationDetails, PASSWORD_MIN};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::restaurant::{
    Address, AddressDraft, FieldIssue, GeoDraft, GeoPoint, InvalidPriceRange, InvalidRestaurantId,
    PriceRange, Restaurant, RestaurantDraft, RestaurantFilter, RestaurantId,
    RestaurantValidationError, Review, ReviewDraft,
};
pub use self::token::{AuthenticatedUser, Claims, TokenError, TokenIssuer, DEFAULT_TTL_HOURS};
pub use self::user::{
    Email, PasswordHash, Role, User, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
