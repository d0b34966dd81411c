//! Listing filter translated into store queries by the repository.

/// Optional constraints narrowing a restaurant listing.
///
/// `city` and `cuisine` are case-insensitive substring matches;
/// `min_rating` is an inclusive lower bound. Omitted fields impose no
/// constraint and present fields combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantFilter {
    /// Substring matched against the address city.
    pub city: Option<String>,
    /// Substring matched against any cuisine tag.
    pub cuisine: Option<String>,
    /// Inclusive lower bound on the rating.
    pub min_rating: Option<f64>,
}

impl RestaurantFilter {
    /// Filter with no constraints; matches everything.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Constrain the city match.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Constrain the cuisine match.
    #[must_use]
    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    /// Constrain the minimum rating.
    #[must_use]
    pub const fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }
}
