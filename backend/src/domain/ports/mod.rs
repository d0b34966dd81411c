//! Ports: async traits the outbound adapters implement.
//!
//! Handlers depend on these abstractions rather than on Diesel so the whole
//! HTTP surface can be exercised against in-memory doubles.

mod restaurant_repository;
mod user_repository;

pub use restaurant_repository::{
    RestaurantPersistenceError, RestaurantRepository, SEARCH_RESULT_CAP,
};
pub use user_repository::{UserPersistenceError, UserRepository};
