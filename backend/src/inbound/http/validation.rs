//! Shared validation helpers for inbound HTTP adapters.
//!
//! Listing parameters arrive as raw strings so that malformed numerics can
//! be rejected with a structured per-field error list instead of a framework
//! deserialisation failure. All fields are checked before returning, so one
//! response reports every problem.

use pagination::{PageRequest, MAX_PER_PAGE};

use crate::domain::restaurant::FieldIssue;
use crate::domain::{Error, InvalidRestaurantId, RestaurantFilter, RestaurantId};

/// Parse the `page` parameter; positive integers only.
pub(crate) fn parse_page(raw: Option<&str>, issues: &mut Vec<FieldIssue>) -> Option<u32> {
    let supplied = raw?;
    match supplied.trim().parse::<u32>() {
        Ok(value) if value >= 1 => Some(value),
        _ => {
            issues.push(FieldIssue {
                field: "page".to_owned(),
                code: "invalid_number",
                message: "page must be a positive integer".to_owned(),
            });
            None
        }
    }
}

/// Parse the `perPage` parameter; bounded to `[1, MAX_PER_PAGE]`.
pub(crate) fn parse_per_page(raw: Option<&str>, issues: &mut Vec<FieldIssue>) -> Option<u32> {
    let supplied = raw?;
    match supplied.trim().parse::<u32>() {
        Ok(value) if (1..=MAX_PER_PAGE).contains(&value) => Some(value),
        _ => {
            issues.push(FieldIssue {
                field: "perPage".to_owned(),
                code: "invalid_number",
                message: format!("perPage must be between 1 and {MAX_PER_PAGE}"),
            });
            None
        }
    }
}

/// Parse the `minRating` parameter; a float in `[0, 5]`.
pub(crate) fn parse_min_rating(raw: Option<&str>, issues: &mut Vec<FieldIssue>) -> Option<f64> {
    let supplied = raw?;
    match supplied.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && (0.0..=5.0).contains(&value) => Some(value),
        _ => {
            issues.push(FieldIssue {
                field: "minRating".to_owned(),
                code: "invalid_number",
                message: "minRating must be a number between 0 and 5".to_owned(),
            });
            None
        }
    }
}

/// Parse an optional text filter; present-but-blank values are rejected.
pub(crate) fn parse_filter_text(
    raw: Option<&str>,
    field: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    let supplied = raw?;
    let trimmed = supplied.trim();
    if trimmed.is_empty() {
        issues.push(FieldIssue {
            field: field.to_owned(),
            code: "empty_value",
            message: format!("{field} must not be empty"),
        });
        return None;
    }
    Some(trimmed.to_owned())
}

/// Collapse collected issues into one 400 error, if any were recorded.
pub(crate) fn reject_on_issues(issues: Vec<FieldIssue>) -> Result<(), Error> {
    if issues.is_empty() {
        return Ok(());
    }
    Err(Error::invalid_request("validation failed").with_details(serde_json::json!(issues)))
}

/// Build the filter and page request for a listing query, collecting every
/// field failure before rejecting.
pub(crate) fn parse_listing(
    page: Option<&str>,
    per_page: Option<&str>,
    city: Option<&str>,
    cuisine: Option<&str>,
    min_rating: Option<&str>,
) -> Result<(RestaurantFilter, PageRequest), Error> {
    let mut issues = Vec::new();

    let page = parse_page(page, &mut issues);
    let per_page = parse_per_page(per_page, &mut issues);
    let filter = RestaurantFilter {
        city: parse_filter_text(city, "city", &mut issues),
        cuisine: parse_filter_text(cuisine, "cuisine", &mut issues),
        min_rating: parse_min_rating(min_rating, &mut issues),
    };

    reject_on_issues(issues)?;

    let request = PageRequest::from_optional(page, per_page)
        .map_err(|err| Error::internal(format!("page bounds slipped past validation: {err}")))?;
    Ok((filter, request))
}

/// Parse a path identifier, mapping failures to a 400 distinct from 500.
pub(crate) fn parse_restaurant_id(raw: &str) -> Result<RestaurantId, Error> {
    RestaurantId::new(raw).map_err(|InvalidRestaurantId| {
        Error::invalid_request("invalid restaurant id").with_details(serde_json::json!([{
            "field": "id",
            "code": "invalid_id",
            "message": "restaurant id must be a valid UUID",
        }]))
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn listing_defaults_when_everything_is_omitted() {
        let (filter, request) =
            parse_listing(None, None, None, None, None).expect("empty query is valid");
        assert_eq!(filter, RestaurantFilter::unconstrained());
        assert_eq!(request, PageRequest::default());
    }

    #[rstest]
    #[case(Some("0"), "page")]
    #[case(Some("-2"), "page")]
    #[case(Some("abc"), "page")]
    fn bad_page_values_are_field_errors(#[case] page: Option<&str>, #[case] field: &str) {
        let err = parse_listing(page, None, None, None, None).expect_err("must reject");
        let details = err.details().expect("details present");
        assert_eq!(
            details
                .as_array()
                .and_then(|entries| entries.first())
                .and_then(|entry| entry.get("field"))
                .and_then(serde_json::Value::as_str),
            Some(field)
        );
    }

    #[rstest]
    #[case("0")]
    #[case("101")]
    #[case("ten")]
    fn bad_per_page_values_are_field_errors(#[case] per_page: &str) {
        assert!(parse_listing(None, Some(per_page), None, None, None).is_err());
    }

    #[rstest]
    #[case("5.1")]
    #[case("-0.5")]
    #[case("NaN")]
    #[case("four")]
    fn bad_min_rating_values_are_field_errors(#[case] min_rating: &str) {
        assert!(parse_listing(None, None, None, None, Some(min_rating)).is_err());
    }

    #[rstest]
    fn all_failures_are_reported_together() {
        let err = parse_listing(Some("x"), Some("0"), Some("  "), None, Some("9"))
            .expect_err("must reject");
        let count = err
            .details()
            .and_then(serde_json::Value::as_array)
            .map(Vec::len)
            .unwrap_or_default();
        assert_eq!(count, 4);
    }

    #[rstest]
    fn filters_are_trimmed() {
        let (filter, _) = parse_listing(None, None, Some(" Paris "), Some("thai"), Some("3.5"))
            .expect("valid query");
        assert_eq!(filter.city.as_deref(), Some("Paris"));
        assert_eq!(filter.cuisine.as_deref(), Some("thai"));
        assert_eq!(filter.min_rating, Some(3.5));
    }

    #[rstest]
    fn malformed_id_is_invalid_request() {
        let err = parse_restaurant_id("definitely-not-a-uuid").expect_err("must reject");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    }
}
