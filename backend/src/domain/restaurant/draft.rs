//! Draft input and the consolidated validation pass.
//!
//! Both the JSON API and the form-driven pages funnel their input through
//! [`RestaurantDraft`]. Validation walks every field, collecting all
//! failures rather than stopping at the first, so clients receive one
//! structured per-field error list.

use std::fmt;

use serde::Serialize;
use url::Url;

use super::review::{Review, ReviewDraft};
use super::{Address, GeoPoint, PriceRange, DEFAULT_IMAGE_URL};

/// Maximum restaurant name length in characters.
pub const NAME_MAX: usize = 100;

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Dotted path of the offending field, e.g. `geo.lat`.
    pub field: String,
    /// Stable machine-readable failure code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Validation failure carrying every field issue found in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantValidationError {
    issues: Vec<FieldIssue>,
}

impl RestaurantValidationError {
    /// The collected field issues, in draft-field order.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Issues serialised for an error response `errors` array.
    #[must_use]
    pub fn to_details(&self) -> serde_json::Value {
        serde_json::json!(self.issues)
    }
}

impl fmt::Display for RestaurantValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "restaurant validation failed ({} issues)", self.issues.len())
    }
}

impl std::error::Error for RestaurantValidationError {}

/// Collects field issues during a validation pass.
#[derive(Debug, Default)]
pub(super) struct IssueCollector {
    issues: Vec<FieldIssue>,
}

impl IssueCollector {
    pub(super) fn push(
        &mut self,
        field: impl Into<String>,
        code: &'static str,
        message: impl Into<String>,
    ) {
        self.issues.push(FieldIssue {
            field: field.into(),
            code,
            message: message.into(),
        });
    }

    fn missing(&mut self, field: &str) {
        self.push(field, "missing_field", format!("{field} is required"));
    }

    fn into_result(self) -> Result<(), RestaurantValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(RestaurantValidationError {
                issues: self.issues,
            })
        }
    }
}

/// Loosely-typed address input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressDraft {
    /// Street line, if supplied.
    pub street: Option<String>,
    /// City, if supplied.
    pub city: Option<String>,
    /// Country, if supplied.
    pub country: Option<String>,
}

/// Loosely-typed coordinate input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeoDraft {
    /// Latitude, if supplied and parseable.
    pub lat: Option<f64>,
    /// Longitude, if supplied and parseable.
    pub lng: Option<f64>,
}

/// Strongly typed intermediate built from request input, with defaulting
/// rules applied, awaiting the validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantDraft {
    /// Display name.
    pub name: Option<String>,
    /// Rating; absent means 0.
    pub rating: Option<f64>,
    /// Embedded address.
    pub address: AddressDraft,
    /// Cuisine tags as supplied.
    pub cuisines: Vec<String>,
    /// Amenity tags as supplied.
    pub amenities: Vec<String>,
    /// Wifi flag; defaults to false upstream.
    pub has_wifi: bool,
    /// Image URL; absent or blank takes the placeholder.
    pub image: Option<String>,
    /// Free-text location label.
    pub location: Option<String>,
    /// Embedded coordinates.
    pub geo: GeoDraft,
    /// Price tier symbol, parsed during validation.
    pub price_range: Option<String>,
    /// Average cost for two; negatives are rejected.
    pub average_cost_for_two: Option<i64>,
    /// Currency code.
    pub currency: Option<String>,
    /// Embedded review input; only honoured at creation time.
    pub reviews: Vec<ReviewDraft>,
}

/// Cleaned output of a successful validation pass.
pub(super) struct ValidatedParts {
    pub name: String,
    pub rating: f64,
    pub address: Address,
    pub cuisines: Vec<String>,
    pub amenities: Vec<String>,
    pub has_wifi: bool,
    pub image: String,
    pub location: String,
    pub geo: GeoPoint,
    pub price_range: PriceRange,
    pub average_cost_for_two: u32,
    pub currency: String,
    pub reviews: Vec<Review>,
}

fn required_trimmed(value: Option<&str>, field: &str, issues: &mut IssueCollector) -> String {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_owned(),
        _ => {
            issues.missing(field);
            String::new()
        }
    }
}

fn validate_image(value: Option<&str>, issues: &mut IssueCollector) -> String {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return DEFAULT_IMAGE_URL.to_owned();
    }
    let is_http = Url::parse(trimmed)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !is_http {
        issues.push(
            "image",
            "invalid_url",
            "image must be a valid http(s) URL",
        );
    }
    trimmed.to_owned()
}

fn validate_coordinate(
    value: Option<f64>,
    field: &str,
    bound: f64,
    issues: &mut IssueCollector,
) -> f64 {
    match value {
        Some(candidate) if candidate.is_finite() && (-bound..=bound).contains(&candidate) => {
            candidate
        }
        Some(_) => {
            issues.push(
                field,
                "out_of_range",
                format!("{field} must be between -{bound} and {bound}"),
            );
            0.0
        }
        None => {
            issues.missing(field);
            0.0
        }
    }
}

fn validate_tags(
    raw: Vec<String>,
    field: &'static str,
    require_one: bool,
    issues: &mut IssueCollector,
) -> Vec<String> {
    let mut empty_entry = false;
    let tags: Vec<String> = raw
        .into_iter()
        .map(|tag| {
            let trimmed = tag.trim().to_owned();
            if trimmed.is_empty() {
                empty_entry = true;
            }
            trimmed
        })
        .filter(|tag| !tag.is_empty())
        .collect();

    if require_one && empty_entry {
        issues.push(field, "empty_entry", format!("{field} must not contain empty entries"));
    }
    if require_one && tags.is_empty() && !empty_entry {
        issues.push(field, "empty_list", format!("at least one {field} entry is required"));
    }
    tags
}

impl RestaurantDraft {
    /// Run the consolidated validation pass, producing cleaned parts or the
    /// full issue list.
    pub(super) fn validate(self) -> Result<ValidatedParts, RestaurantValidationError> {
        let mut issues = IssueCollector::default();

        let name_raw = required_trimmed(self.name.as_deref(), "name", &mut issues);
        if name_raw.chars().count() > NAME_MAX {
            issues.push(
                "name",
                "too_long",
                format!("name must be at most {NAME_MAX} characters"),
            );
        }

        let rating = match self.rating {
            None => 0.0,
            Some(value) if value.is_finite() && (0.0..=5.0).contains(&value) => value,
            Some(_) => {
                issues.push("rating", "out_of_range", "rating must be between 0 and 5");
                0.0
            }
        };

        let street = required_trimmed(self.address.street.as_deref(), "address.street", &mut issues);
        let city = required_trimmed(self.address.city.as_deref(), "address.city", &mut issues);
        let country =
            required_trimmed(self.address.country.as_deref(), "address.country", &mut issues);

        let cuisines = validate_tags(self.cuisines, "cuisines", true, &mut issues);
        let amenities = validate_tags(self.amenities, "amenities", false, &mut issues);

        let image = validate_image(self.image.as_deref(), &mut issues);
        let location = required_trimmed(self.location.as_deref(), "location", &mut issues);

        let lat = validate_coordinate(self.geo.lat, "geo.lat", 90.0, &mut issues);
        let lng = validate_coordinate(self.geo.lng, "geo.lng", 180.0, &mut issues);

        let price_range = match self.price_range.as_deref().map(str::parse::<PriceRange>) {
            Some(Ok(tier)) => tier,
            Some(Err(err)) => {
                issues.push("priceRange", "invalid_price_range", err.to_string());
                PriceRange::Moderate
            }
            None => {
                issues.missing("priceRange");
                PriceRange::Moderate
            }
        };

        let average_cost_for_two = match self.average_cost_for_two {
            Some(value) => u32::try_from(value).unwrap_or_else(|_| {
                issues.push(
                    "averageCostForTwo",
                    "out_of_range",
                    "averageCostForTwo must be a non-negative integer",
                );
                0
            }),
            None => {
                issues.missing("averageCostForTwo");
                0
            }
        };

        let currency = required_trimmed(self.currency.as_deref(), "currency", &mut issues);

        let reviews: Vec<Review> = self
            .reviews
            .into_iter()
            .enumerate()
            .filter_map(|(index, review)| review.validate(index, &mut issues))
            .collect();

        issues.into_result()?;

        Ok(ValidatedParts {
            name: name_raw,
            rating,
            address: Address {
                street,
                city,
                country,
            },
            cuisines,
            amenities,
            has_wifi: self.has_wifi,
            image,
            location,
            geo: GeoPoint { lat, lng },
            price_range,
            average_cost_for_two,
            currency,
            reviews,
        })
    }
}
