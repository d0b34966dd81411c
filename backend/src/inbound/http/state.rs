//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they only
//! depend on domain ports and stay testable against in-memory doubles.

use std::sync::Arc;

use crate::domain::ports::{RestaurantRepository, UserRepository};
use crate::domain::TokenIssuer;

/// Attributes applied to the session cookie pair.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    /// Whether cookies carry the `Secure` attribute (production mode).
    pub secure: bool,
    /// Cookie lifetime in hours; kept in step with the token expiry window.
    pub max_age_hours: i64,
}

/// Dependency bundle for HTTP and page handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User store.
    pub users: Arc<dyn UserRepository>,
    /// Restaurant store.
    pub restaurants: Arc<dyn RestaurantRepository>,
    /// Token issuer/verifier shared by both surfaces.
    pub tokens: TokenIssuer,
    /// Cookie attributes derived from configuration.
    pub cookies: CookiePolicy,
}

impl HttpState {
    /// Assemble the handler state from its parts.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        tokens: TokenIssuer,
        cookies: CookiePolicy,
    ) -> Self {
        Self {
            users,
            restaurants,
            tokens,
            cookies,
        }
    }
}
