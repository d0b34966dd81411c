//! Minimal HTML rendering for the page surface.
//!
//! The page adapter's job is routing, authorization, form handling, and
//! cookie management; the markup itself is intentionally plain documents.
//! Everything user-supplied passes through [`escape`].

use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use crate::domain::restaurant::FieldIssue;
use crate::domain::{AuthenticatedUser, Restaurant};

/// Escape text for safe interpolation into HTML.
pub(crate) fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap body markup in the shared document shell with a small nav bar.
pub(crate) fn layout(title: &str, user: Option<&AuthenticatedUser>, body: &str) -> String {
    let session = user.map_or_else(
        || r#"<a href="/auth/login">Log in</a> <a href="/auth/register">Register</a>"#.to_owned(),
        |identity| {
            format!(
                r#"<span>{} ({})</span> <a href="/auth/logout">Log out</a>"#,
                escape(&identity.email),
                identity.role
            )
        },
    );
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<nav><a href="/">Home</a> <a href="/restaurants/search">Search</a> <a href="/restaurants/create">Add restaurant</a> {session}</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// 200 response carrying rendered HTML.
pub(crate) fn html(markup: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(markup)
}

/// Rendered error view with the given status.
pub(crate) fn error_page(status: StatusCode, message: &str) -> HttpResponse {
    let body = format!("<h1>Something went wrong</h1><p>{}</p>", escape(message));
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(layout("Error", None, &body))
}

/// 302 redirect.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location.to_owned()))
        .finish()
}

/// Render a field-issue list as an error summary block.
pub(crate) fn issue_list(issues: &[FieldIssue]) -> String {
    if issues.is_empty() {
        return String::new();
    }
    let items: String = issues
        .iter()
        .map(|issue| format!("<li>{}: {}</li>", escape(&issue.field), escape(&issue.message)))
        .collect();
    format!(r#"<ul class="errors">{items}</ul>"#)
}

/// Render a restaurant summary card used in result listings.
pub(crate) fn restaurant_card(restaurant: &Restaurant) -> String {
    format!(
        r#"<article><h2><a href="/restaurants/{id}">{name}</a></h2><p>{city}, {country} — {cuisines} — {price} — rating {rating}</p></article>"#,
        id = restaurant.id,
        name = escape(&restaurant.name),
        city = escape(&restaurant.address.city),
        country = escape(&restaurant.address.country),
        cuisines = escape(&restaurant.cuisines.join(", ")),
        price = restaurant.price_range,
        rating = restaurant.rating,
    )
}

/// Render the full details view, reviews included.
pub(crate) fn restaurant_details(restaurant: &Restaurant, is_admin: bool) -> String {
    let reviews: String = restaurant
        .reviews
        .iter()
        .map(|review| {
            format!(
                "<li>{stars}/5 by {author} on {date}: {text}</li>",
                stars = review.stars,
                author = escape(&review.user_id),
                date = review.date.format("%Y-%m-%d"),
                text = escape(&review.text),
            )
        })
        .collect();
    let admin_links = if is_admin {
        format!(
            r#"<p><a href="/restaurants/{id}/edit">Edit</a> <a href="/restaurants/{id}/delete">Delete</a></p>"#,
            id = restaurant.id
        )
    } else {
        String::new()
    };
    format!(
        r#"<h1>{name}</h1>
<img src="{image}" alt="{name}">
<p>{street}, {city}, {country}</p>
<p>Location: {location} ({lat}, {lng})</p>
<p>Cuisines: {cuisines}</p>
<p>Amenities: {amenities}</p>
<p>Wifi: {wifi} — {price} — {cost} {currency} for two — rating {rating} ({votes} votes)</p>
{admin_links}
<h2>Reviews</h2><ul>{reviews}</ul>"#,
        name = escape(&restaurant.name),
        image = escape(&restaurant.image),
        street = escape(&restaurant.address.street),
        city = escape(&restaurant.address.city),
        country = escape(&restaurant.address.country),
        location = escape(&restaurant.location),
        lat = restaurant.geo.lat,
        lng = restaurant.geo.lng,
        cuisines = escape(&restaurant.cuisines.join(", ")),
        amenities = escape(&restaurant.amenities.join(", ")),
        wifi = if restaurant.has_wifi { "yes" } else { "no" },
        price = restaurant.price_range,
        cost = restaurant.average_cost_for_two,
        currency = escape(&restaurant.currency),
        rating = restaurant.rating,
        votes = restaurant.votes,
    )
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("<script>", "&lt;script&gt;")]
    #[case("a & b \"quoted\"", "a &amp; b &quot;quoted&quot;")]
    fn escape_neutralises_markup(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[rstest]
    fn layout_offers_login_when_anonymous() {
        let page = layout("Title", None, "<p>hi</p>");
        assert!(page.contains("/auth/login"));
        assert!(!page.contains("Log out"));
    }
}
