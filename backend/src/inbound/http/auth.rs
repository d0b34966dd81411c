//! Authentication API handlers.
//!
//! ```text
//! POST /api/auth/register {"username":"diner","email":"d@x.io","password":"…"}
//! POST /api/auth/login    {"email":"d@x.io","password":"…"}
//! POST /api/auth/logout
//! GET  /api/auth/profile
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    password, Error, LoginCredentials, RegistrationDetails, User,
};
use crate::inbound::http::error::{
    map_user_persistence_error, map_user_validation_error, ApiResult,
};
use crate::inbound::http::session::RequestIdentity;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Desired login name.
    pub username: String,
    /// Email address; lowercased before storage.
    pub email: String,
    /// Plaintext password; hashed before persistence.
    pub password: String,
    /// Optional role, `user` or `admin`; defaults to `user`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Account email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Profile payload embedded in auth responses; never carries the password.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    /// Stable user identifier.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Lowercased email address.
    pub email: String,
    /// Authorization tier.
    pub role: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            role: user.role().to_string(),
        }
    }
}

/// Response body for registration and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Human-readable acknowledgment.
    pub message: String,
    /// Signed session token.
    pub token: String,
    /// Profile of the authenticated user.
    pub user: UserProfile,
}

/// Response body for simple acknowledgments.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Human-readable acknowledgment.
    pub message: String,
}

/// Response body for the profile endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Stored profile minus the password digest.
    pub user: UserProfile,
}

fn issue_token(state: &HttpState, user: &User) -> Result<String, Error> {
    state
        .tokens
        .issue(user)
        .map_err(|err| Error::internal(format!("token issuance failed: {err}")))
}

/// Register a new account and issue its first session token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation failed or user exists", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let details = RegistrationDetails::try_from_parts(
        &body.username,
        &body.email,
        &body.password,
        body.role.as_deref(),
    )
    .map_err(|err| map_user_validation_error(&err))?;

    let digest = password::hash(details.password())
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;
    let user = User::register(
        details.username().clone(),
        details.email().clone(),
        details.role(),
        digest,
    );

    state
        .users
        .insert(&user)
        .await
        .map_err(map_user_persistence_error)?;

    let token = issue_token(&state, &user)?;
    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        message: "User registered successfully".to_owned(),
        token,
        user: UserProfile::from(&user),
    }))
}

/// Authenticate with email and password.
///
/// Unknown email and wrong password produce the same 401 so responses do not
/// reveal which accounts exist.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Malformed credentials", body = Error),
        (status = 401, description = "Invalid email or password", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password)
        .map_err(|err| map_user_validation_error(&err))?;

    let user = state
        .users
        .find_by_email(credentials.email())
        .await
        .map_err(map_user_persistence_error)?
        .ok_or_else(|| Error::unauthorized("invalid email or password"))?;

    if !password::verify(credentials.password(), user.password_hash()) {
        return Err(Error::unauthorized("invalid email or password").into());
    }

    let token = issue_token(&state, &user)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: "Login successful".to_owned(),
        token,
        user: UserProfile::from(&user),
    }))
}

/// Acknowledge a logout.
///
/// Tokens are stateless, so there is nothing to revoke server-side; clients
/// drop their copy (the page surface clears its cookies).
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(identity: RequestIdentity) -> ApiResult<HttpResponse> {
    identity.require()?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Logged out successfully".to_owned(),
    }))
}

/// Return the stored profile for the authenticated user.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Stored profile", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "profile"
)]
#[get("/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
) -> ApiResult<HttpResponse> {
    let authenticated = identity.require()?;
    let user = state
        .users
        .find_by_id(&authenticated.id)
        .await
        .map_err(map_user_persistence_error)?
        .ok_or_else(|| Error::not_found("user not found"))?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        success: true,
        user: UserProfile::from(&user),
    }))
}
