//! Bracketed form payloads submitted by the HTML pages.
//!
//! Browsers post nested values with bracketed names (`address[city]`,
//! `geo[lat]`); serde renames map them onto one flat struct, and the
//! conversion into [`RestaurantDraft`] applies the page surface's permissive
//! defaulting before the shared validation pass runs.

use serde::Deserialize;

use crate::domain::{AddressDraft, GeoDraft, RestaurantDraft};

fn parse_f64_or(raw: Option<&str>, fallback: f64) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(fallback)
}

fn parse_i64_or(raw: Option<&str>, fallback: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(fallback)
}

fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim().to_owned();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

/// Restaurant create/update form with bracketed nested field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantForm {
    /// Display name.
    pub name: Option<String>,
    /// Rating as typed; unparseable input degrades to 0.
    pub rating: Option<String>,
    /// `address[street]` input.
    #[serde(rename = "address[street]")]
    pub address_street: Option<String>,
    /// `address[city]` input.
    #[serde(rename = "address[city]")]
    pub address_city: Option<String>,
    /// `address[country]` input.
    #[serde(rename = "address[country]")]
    pub address_country: Option<String>,
    /// Comma-separated cuisine tags.
    pub cuisines: Option<String>,
    /// Comma-separated amenity tags.
    pub amenities: Option<String>,
    /// Checkbox value; "on" when ticked.
    #[serde(rename = "hasWifi")]
    pub has_wifi: Option<String>,
    /// Image URL.
    pub image: Option<String>,
    /// Free-text location label.
    pub location: Option<String>,
    /// `geo[lat]` input; unparseable input degrades to 0.
    #[serde(rename = "geo[lat]")]
    pub geo_lat: Option<String>,
    /// `geo[lng]` input; unparseable input degrades to 0.
    #[serde(rename = "geo[lng]")]
    pub geo_lng: Option<String>,
    /// Price tier symbol.
    #[serde(rename = "priceRange")]
    pub price_range: Option<String>,
    /// Average cost for two; unparseable input degrades to 0.
    #[serde(rename = "averageCostForTwo")]
    pub average_cost_for_two: Option<String>,
    /// Currency code.
    pub currency: Option<String>,
}

impl RestaurantForm {
    fn base_draft(self) -> RestaurantDraft {
        RestaurantDraft {
            name: blank_to_none(self.name),
            rating: Some(parse_f64_or(self.rating.as_deref(), 0.0)),
            address: AddressDraft {
                street: blank_to_none(self.address_street),
                city: blank_to_none(self.address_city),
                country: blank_to_none(self.address_country),
            },
            cuisines: split_tags(self.cuisines.as_deref()),
            amenities: split_tags(self.amenities.as_deref()),
            has_wifi: self.has_wifi.as_deref() == Some("on"),
            image: blank_to_none(self.image),
            location: blank_to_none(self.location),
            geo: GeoDraft {
                lat: Some(parse_f64_or(self.geo_lat.as_deref(), 0.0)),
                lng: Some(parse_f64_or(self.geo_lng.as_deref(), 0.0)),
            },
            price_range: blank_to_none(self.price_range),
            average_cost_for_two: Some(parse_i64_or(self.average_cost_for_two.as_deref(), 0)),
            currency: blank_to_none(self.currency),
            reviews: Vec::new(),
        }
    }

    /// Draft for the create page; the price tier stays required.
    #[must_use]
    pub fn into_create_draft(self) -> RestaurantDraft {
        self.base_draft()
    }

    /// Draft for the update page; blank tier and currency take the page
    /// surface's historical defaults.
    #[must_use]
    pub fn into_update_draft(self) -> RestaurantDraft {
        let mut draft = self.base_draft();
        if draft.price_range.is_none() {
            draft.price_range = Some("$$".to_owned());
        }
        if draft.currency.is_none() {
            draft.currency = Some("USD".to_owned());
        }
        draft
    }
}

/// Session form posted after a successful client-side login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetSessionForm {
    /// Signed token issued by the API login endpoint.
    pub token: Option<String>,
    /// Display-only user JSON mirrored into the `user` cookie.
    pub user: Option<String>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn form() -> RestaurantForm {
        RestaurantForm {
            name: Some("Noodle Barn".to_owned()),
            rating: Some("4.2".to_owned()),
            address_street: Some("1 High St".to_owned()),
            address_city: Some("Leeds".to_owned()),
            address_country: Some("UK".to_owned()),
            cuisines: Some("Thai, Noodles , ".to_owned()),
            amenities: Some("".to_owned()),
            has_wifi: Some("on".to_owned()),
            image: Some("".to_owned()),
            location: Some("City centre".to_owned()),
            geo_lat: Some("53.8".to_owned()),
            geo_lng: Some("-1.55".to_owned()),
            price_range: Some("$$".to_owned()),
            average_cost_for_two: Some("30".to_owned()),
            currency: Some("GBP".to_owned()),
        }
    }

    #[rstest]
    fn comma_tags_are_split_and_trimmed() {
        let draft = form().into_create_draft();
        assert_eq!(draft.cuisines, vec!["Thai".to_owned(), "Noodles".to_owned()]);
        assert!(draft.amenities.is_empty());
    }

    #[rstest]
    fn checkbox_maps_to_bool() {
        let mut ticked = form();
        ticked.has_wifi = Some("on".to_owned());
        assert!(ticked.into_create_draft().has_wifi);

        let mut unticked = form();
        unticked.has_wifi = None;
        assert!(!unticked.into_create_draft().has_wifi);
    }

    #[rstest]
    fn unparseable_numerics_degrade_to_defaults() {
        let mut sloppy = form();
        sloppy.rating = Some("four".to_owned());
        sloppy.average_cost_for_two = Some("cheap".to_owned());
        let draft = sloppy.into_create_draft();
        assert_eq!(draft.rating, Some(0.0));
        assert_eq!(draft.average_cost_for_two, Some(0));
    }

    #[rstest]
    fn update_draft_substitutes_tier_and_currency_defaults() {
        let mut sparse = form();
        sparse.price_range = None;
        sparse.currency = Some("  ".to_owned());
        let draft = sparse.into_update_draft();
        assert_eq!(draft.price_range.as_deref(), Some("$$"));
        assert_eq!(draft.currency.as_deref(), Some("USD"));
    }

    #[rstest]
    fn create_draft_keeps_tier_required() {
        let mut sparse = form();
        sparse.price_range = None;
        assert_eq!(sparse.into_create_draft().price_range, None);
    }

    #[rstest]
    fn bracketed_names_deserialise() {
        let draft: RestaurantForm = serde_urlencoded::from_str(
            "name=Caff&address%5Bcity%5D=York&geo%5Blat%5D=53.9&hasWifi=on",
        )
        .expect("form parses");
        assert_eq!(draft.address_city.as_deref(), Some("York"));
        assert_eq!(draft.geo_lat.as_deref(), Some("53.9"));
    }
}
