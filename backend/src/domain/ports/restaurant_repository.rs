//! Port abstraction for restaurant persistence adapters and their errors.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::restaurant::{Restaurant, RestaurantFilter, RestaurantId};

/// Maximum result count for the lightweight filter search.
pub const SEARCH_RESULT_CAP: u32 = 20;

/// Persistence errors raised by restaurant repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RestaurantPersistenceError {
    /// Repository connection could not be established.
    #[error("restaurant repository connection failed: {message}")]
    Connection {
        /// Underlying driver message.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("restaurant repository query failed: {message}")]
    Query {
        /// Underlying driver message.
        message: String,
    },
}

impl RestaurantPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Store of restaurant records, shared by the API and page adapters.
///
/// Listing queries sort by rating descending then name ascending; the
/// repository owns the filter-to-query translation so both HTTP surfaces see
/// identical semantics.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Persist a newly created restaurant.
    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RestaurantPersistenceError>;

    /// Fetch a restaurant by identifier.
    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantPersistenceError>;

    /// Replace an existing record wholesale; `false` when the id is unknown.
    async fn replace(&self, restaurant: &Restaurant) -> Result<bool, RestaurantPersistenceError>;

    /// Delete a record; `false` when the id is unknown.
    async fn delete(&self, id: &RestaurantId) -> Result<bool, RestaurantPersistenceError>;

    /// Fetch one page of matches plus the total count for the filter.
    async fn page(
        &self,
        filter: &RestaurantFilter,
        request: PageRequest,
    ) -> Result<Page<Restaurant>, RestaurantPersistenceError>;

    /// Lightweight search: same filter semantics, no pagination, capped at
    /// [`SEARCH_RESULT_CAP`] results.
    async fn search(
        &self,
        filter: &RestaurantFilter,
    ) -> Result<Vec<Restaurant>, RestaurantPersistenceError>;
}
