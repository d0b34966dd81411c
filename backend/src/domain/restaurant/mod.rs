//! Restaurant aggregate: the directory's central record.
//!
//! A [`Restaurant`] is only ever constructed through validation: inbound
//! adapters assemble a [`RestaurantDraft`] from whatever loosely-typed input
//! they received (JSON body or bracketed form fields), and
//! [`Restaurant::from_draft`] / [`Restaurant::apply_draft`] run the single
//! consolidated validation pass before anything is persisted.

mod draft;
mod filter;
mod review;

pub use draft::{
    AddressDraft, FieldIssue, GeoDraft, RestaurantDraft, RestaurantValidationError, NAME_MAX,
};
pub use filter::RestaurantFilter;
pub use review::{Review, ReviewDraft, REVIEW_TEXT_MAX};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

/// Placeholder image used when a restaurant is created without one.
pub const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/400/300?food";

/// Stable restaurant identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RestaurantId(Uuid);

/// Error raised when a restaurant identifier fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("restaurant id must be a valid UUID")]
pub struct InvalidRestaurantId;

impl RestaurantId {
    /// Validate and construct a [`RestaurantId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, InvalidRestaurantId> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(InvalidRestaurantId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| InvalidRestaurantId)?;
        Ok(Self(parsed))
    }

    /// Wrap an already-parsed UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`RestaurantId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RestaurantId> for String {
    fn from(value: RestaurantId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for RestaurantId {
    type Error = InvalidRestaurantId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Postal address embedded in a restaurant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    /// Street line.
    pub street: String,
    /// City name; target of the `city` listing filter.
    pub city: String,
    /// Country name.
    pub country: String,
}

/// Geographic coordinates embedded in a restaurant record.
///
/// ## Invariants
/// - `lat` lies in [-90, 90] and `lng` in [-180, 180]; both are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

/// Price tier rendered as one to four currency symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PriceRange {
    /// Cheap eats.
    #[serde(rename = "$")]
    Budget,
    /// Mid-range.
    #[serde(rename = "$$")]
    Moderate,
    /// Upscale.
    #[serde(rename = "$$$")]
    Upscale,
    /// Fine dining.
    #[serde(rename = "$$$$")]
    Fine,
}

/// Error raised when a price tier string is not one of the four symbols.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("price range must be one of $, $$, $$$, $$$$")]
pub struct InvalidPriceRange;

impl PriceRange {
    /// Stable symbol representation used in storage and payloads.
    #[must_use]
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Upscale => "$$$",
            Self::Fine => "$$$$",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

impl FromStr for PriceRange {
    type Err = InvalidPriceRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "$" => Ok(Self::Budget),
            "$$" => Ok(Self::Moderate),
            "$$$" => Ok(Self::Upscale),
            "$$$$" => Ok(Self::Fine),
            _ => Err(InvalidPriceRange),
        }
    }
}

/// A restaurant directory record.
///
/// ## Invariants
/// - All fields satisfy the constraints enforced by the draft validation
///   pass; see [`RestaurantDraft`].
/// - `rating` lies in [0, 5]; `votes` and `average_cost_for_two` are
///   non-negative by construction.
/// - `reviews` are owned by this record and have no independent lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    /// Stable identifier, assigned at creation.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Aggregate rating in [0, 5].
    pub rating: f64,
    /// Mandatory embedded address.
    pub address: Address,
    /// Cuisine tags; at least one entry.
    pub cuisines: Vec<String>,
    /// Amenity tags.
    pub amenities: Vec<String>,
    /// Whether wifi is available.
    pub has_wifi: bool,
    /// Image URL; defaults to [`DEFAULT_IMAGE_URL`].
    pub image: String,
    /// Free-text location label.
    pub location: String,
    /// Mandatory geo-coordinates.
    pub geo: GeoPoint,
    /// Embedded reviews.
    pub reviews: Vec<Review>,
    /// Price tier.
    pub price_range: PriceRange,
    /// Average cost for two people, in `currency` units.
    pub average_cost_for_two: u32,
    /// Currency code for the cost figure.
    pub currency: String,
    /// Vote count backing the rating.
    pub votes: u32,
    /// Creator recorded at creation time; no referential integrity enforced.
    pub created_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// Validate a draft and build a new record with server-assigned id and
    /// timestamps.
    pub fn from_draft(
        draft: RestaurantDraft,
        created_by: Option<UserId>,
    ) -> Result<Self, RestaurantValidationError> {
        let parts = draft.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: RestaurantId::random(),
            name: parts.name,
            rating: parts.rating,
            address: parts.address,
            cuisines: parts.cuisines,
            amenities: parts.amenities,
            has_wifi: parts.has_wifi,
            image: parts.image,
            location: parts.location,
            geo: parts.geo,
            reviews: parts.reviews,
            price_range: parts.price_range,
            average_cost_for_two: parts.average_cost_for_two,
            currency: parts.currency,
            votes: 0,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate a draft and apply it to this record, preserving identity,
    /// reviews, votes, and provenance.
    pub fn apply_draft(self, draft: RestaurantDraft) -> Result<Self, RestaurantValidationError> {
        let parts = draft.validate()?;
        Ok(Self {
            name: parts.name,
            rating: parts.rating,
            address: parts.address,
            cuisines: parts.cuisines,
            amenities: parts.amenities,
            has_wifi: parts.has_wifi,
            image: parts.image,
            location: parts.location,
            geo: parts.geo,
            price_range: parts.price_range,
            average_cost_for_two: parts.average_cost_for_two,
            currency: parts.currency,
            updated_at: Utc::now(),
            ..self
        })
    }
}
