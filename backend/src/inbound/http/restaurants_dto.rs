//! Request and response payloads for the restaurant API.
//!
//! Request payloads are loose on purpose: every field is optional at the
//! serde layer so that omissions surface as per-field validation issues from
//! the draft pass rather than opaque deserialisation failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Address, AddressDraft, GeoDraft, GeoPoint, PriceRange, Restaurant, RestaurantDraft, Review,
    ReviewDraft,
};

/// Nested address payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AddressPayload {
    /// Street line.
    pub street: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// Country name.
    pub country: Option<String>,
}

/// Nested coordinates payload.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema)]
pub struct GeoPayload {
    /// Latitude in decimal degrees.
    pub lat: Option<f64>,
    /// Longitude in decimal degrees.
    pub lng: Option<f64>,
}

/// Embedded review payload accepted at creation time.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    /// Author identifier.
    pub user_id: Option<String>,
    /// Star rating from 1 to 5.
    pub stars: Option<i64>,
    /// Review body.
    pub text: Option<String>,
    /// Review timestamp; defaults to "now" when omitted.
    pub date: Option<DateTime<Utc>>,
}

impl From<ReviewPayload> for ReviewDraft {
    fn from(payload: ReviewPayload) -> Self {
        Self {
            user_id: payload.user_id,
            stars: payload.stars,
            text: payload.text,
            date: payload.date,
        }
    }
}

/// Body of `POST /api/restaurants`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    /// Display name.
    pub name: Option<String>,
    /// Rating in [0, 5]; defaults to 0.
    pub rating: Option<f64>,
    /// Embedded address; mandatory.
    pub address: Option<AddressPayload>,
    /// Cuisine tags; at least one required.
    pub cuisines: Option<Vec<String>>,
    /// Amenity tags.
    pub amenities: Option<Vec<String>>,
    /// Wifi flag; defaults to false.
    pub has_wifi: Option<bool>,
    /// Image URL; placeholder substituted when omitted.
    pub image: Option<String>,
    /// Free-text location label.
    pub location: Option<String>,
    /// Embedded coordinates; mandatory.
    pub geo: Option<GeoPayload>,
    /// Price tier symbol.
    pub price_range: Option<String>,
    /// Average cost for two.
    pub average_cost_for_two: Option<i64>,
    /// Currency code.
    pub currency: Option<String>,
    /// Embedded reviews to seed the record with.
    pub reviews: Option<Vec<ReviewPayload>>,
}

impl From<CreateRestaurantRequest> for RestaurantDraft {
    fn from(body: CreateRestaurantRequest) -> Self {
        let address = body.address.unwrap_or_default();
        let geo = body.geo.unwrap_or_default();
        Self {
            name: body.name,
            rating: body.rating,
            address: AddressDraft {
                street: address.street,
                city: address.city,
                country: address.country,
            },
            cuisines: body.cuisines.unwrap_or_default(),
            amenities: body.amenities.unwrap_or_default(),
            has_wifi: body.has_wifi.unwrap_or(false),
            image: body.image,
            location: body.location,
            geo: GeoDraft {
                lat: geo.lat,
                lng: geo.lng,
            },
            price_range: body.price_range,
            average_cost_for_two: body.average_cost_for_two,
            currency: body.currency,
            reviews: body
                .reviews
                .unwrap_or_default()
                .into_iter()
                .map(ReviewDraft::from)
                .collect(),
        }
    }
}

/// Body of `PUT /api/restaurants/{id}`; absent fields keep stored values.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantRequest {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement rating.
    pub rating: Option<f64>,
    /// Partial address update; absent parts keep stored values.
    pub address: Option<AddressPayload>,
    /// Replacement cuisine tags.
    pub cuisines: Option<Vec<String>>,
    /// Replacement amenity tags.
    pub amenities: Option<Vec<String>>,
    /// Replacement wifi flag.
    pub has_wifi: Option<bool>,
    /// Replacement image URL.
    pub image: Option<String>,
    /// Replacement location label.
    pub location: Option<String>,
    /// Partial coordinates update.
    pub geo: Option<GeoPayload>,
    /// Replacement price tier symbol.
    pub price_range: Option<String>,
    /// Replacement cost figure.
    pub average_cost_for_two: Option<i64>,
    /// Replacement currency code.
    pub currency: Option<String>,
}

impl UpdateRestaurantRequest {
    /// Merge this partial update over an existing record into a full draft
    /// for re-validation. Reviews, votes, and provenance are never touched
    /// by updates.
    #[must_use]
    pub fn merge_onto(self, existing: &Restaurant) -> RestaurantDraft {
        let address = self.address.unwrap_or_default();
        let geo = self.geo.unwrap_or_default();
        RestaurantDraft {
            name: self.name.or_else(|| Some(existing.name.clone())),
            rating: self.rating.or(Some(existing.rating)),
            address: AddressDraft {
                street: address
                    .street
                    .or_else(|| Some(existing.address.street.clone())),
                city: address.city.or_else(|| Some(existing.address.city.clone())),
                country: address
                    .country
                    .or_else(|| Some(existing.address.country.clone())),
            },
            cuisines: self.cuisines.unwrap_or_else(|| existing.cuisines.clone()),
            amenities: self.amenities.unwrap_or_else(|| existing.amenities.clone()),
            has_wifi: self.has_wifi.unwrap_or(existing.has_wifi),
            image: self.image.or_else(|| Some(existing.image.clone())),
            location: self.location.or_else(|| Some(existing.location.clone())),
            geo: GeoDraft {
                lat: geo.lat.or(Some(existing.geo.lat)),
                lng: geo.lng.or(Some(existing.geo.lng)),
            },
            price_range: self
                .price_range
                .or_else(|| Some(existing.price_range.as_symbol().to_owned())),
            average_cost_for_two: self
                .average_cost_for_two
                .or(Some(i64::from(existing.average_cost_for_two))),
            currency: self.currency.or_else(|| Some(existing.currency.clone())),
            reviews: Vec::new(),
        }
    }
}

/// Restaurant payload returned by every read endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDto {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Aggregate rating.
    pub rating: f64,
    /// Embedded address.
    pub address: Address,
    /// Cuisine tags.
    pub cuisines: Vec<String>,
    /// Amenity tags.
    pub amenities: Vec<String>,
    /// Wifi flag.
    pub has_wifi: bool,
    /// Image URL.
    pub image: String,
    /// Location label.
    pub location: String,
    /// Coordinates.
    pub geo: GeoPoint,
    /// Embedded reviews.
    pub reviews: Vec<Review>,
    /// Price tier symbol.
    pub price_range: PriceRange,
    /// Average cost for two.
    pub average_cost_for_two: u32,
    /// Currency code.
    pub currency: String,
    /// Vote count.
    pub votes: u32,
    /// Creator id, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Restaurant> for RestaurantDto {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id.to_string(),
            name: restaurant.name,
            rating: restaurant.rating,
            address: restaurant.address,
            cuisines: restaurant.cuisines,
            amenities: restaurant.amenities,
            has_wifi: restaurant.has_wifi,
            image: restaurant.image,
            location: restaurant.location,
            geo: restaurant.geo,
            reviews: restaurant.reviews,
            price_range: restaurant.price_range,
            average_cost_for_two: restaurant.average_cost_for_two,
            currency: restaurant.currency,
            votes: restaurant.votes,
            created_by: restaurant.created_by.map(|id| id.to_string()),
            created_at: restaurant.created_at,
            updated_at: restaurant.updated_at,
        }
    }
}
