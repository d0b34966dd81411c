//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{restaurants, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the restaurants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RestaurantRow {
    pub id: Uuid,
    pub name: String,
    pub rating: f64,
    pub street: String,
    pub city: String,
    pub country: String,
    pub cuisines: Vec<String>,
    pub amenities: Vec<String>,
    pub has_wifi: bool,
    pub image: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub reviews: serde_json::Value,
    pub price_range: String,
    pub average_cost_for_two: i32,
    pub currency: String,
    pub votes: i32,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new restaurant records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = restaurants)]
pub(crate) struct NewRestaurantRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub rating: f64,
    pub street: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub cuisines: &'a [String],
    pub amenities: &'a [String],
    pub has_wifi: bool,
    pub image: &'a str,
    pub location: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub reviews: serde_json::Value,
    pub price_range: &'a str,
    pub average_cost_for_two: i32,
    pub currency: &'a str,
    pub votes: i32,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for replacing an existing restaurant record.
///
/// Identity, creation timestamp, and provenance columns are deliberately
/// absent; a replace never rewrites them.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = restaurants)]
pub(crate) struct RestaurantUpdate<'a> {
    pub name: &'a str,
    pub rating: f64,
    pub street: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub cuisines: &'a [String],
    pub amenities: &'a [String],
    pub has_wifi: bool,
    pub image: &'a str,
    pub location: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub reviews: serde_json::Value,
    pub price_range: &'a str,
    pub average_cost_for_two: i32,
    pub currency: &'a str,
    pub votes: i32,
    pub updated_at: DateTime<Utc>,
}
