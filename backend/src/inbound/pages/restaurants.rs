//! Restaurant pages: search, details, and the admin-gated mutation flows.
//!
//! Unlike the API surface, query parameters here degrade permissively to
//! their defaults, missing authentication redirects to the login page, and
//! failures render error views. Drafts still run the same consolidated
//! validation pass as the API before anything is persisted.

use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse};
use pagination::{PageRequest, DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use serde::Deserialize;
use tracing::error;

use super::forms::RestaurantForm;
use super::{respond, views};
use crate::domain::ports::RestaurantPersistenceError;
use crate::domain::restaurant::FieldIssue;
use crate::domain::{Restaurant, RestaurantFilter, RestaurantId};
use crate::inbound::http::session::RequestIdentity;
use crate::inbound::http::state::HttpState;

/// Listing query accepted by the search results page.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// 1-indexed page number; invalid input falls back to 1.
    pub page: Option<String>,
    /// Page size; invalid input falls back to 10.
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
    /// City substring filter.
    pub city: Option<String>,
    /// Cuisine substring filter.
    pub cuisine: Option<String>,
    /// Minimum rating filter; invalid input is ignored.
    #[serde(rename = "minRating")]
    pub min_rating: Option<String>,
}

fn blank_to_none(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Permissive translation: defaults substituted, nothing rejected.
fn permissive_listing(query: &SearchQuery) -> (RestaurantFilter, PageRequest) {
    let page = query
        .page
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|value| *value >= 1)
        .unwrap_or(DEFAULT_PAGE);
    let per_page = query
        .per_page
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|value| (1..=MAX_PER_PAGE).contains(value))
        .unwrap_or(DEFAULT_PER_PAGE);
    let filter = RestaurantFilter {
        city: blank_to_none(query.city.as_deref()),
        cuisine: blank_to_none(query.cuisine.as_deref()),
        min_rating: query
            .min_rating
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && (0.0..=5.0).contains(value)),
    };
    let request = PageRequest::new(page, per_page).unwrap_or_default();
    (filter, request)
}

fn store_error_page(failure: RestaurantPersistenceError) -> HttpResponse {
    match failure {
        RestaurantPersistenceError::Connection { message } => {
            error!(%message, "restaurant store unavailable");
            views::error_page(
                StatusCode::SERVICE_UNAVAILABLE,
                "Database not available. Please try again later.",
            )
        }
        RestaurantPersistenceError::Query { message } => {
            error!(%message, "restaurant store query failed");
            views::error_page(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.")
        }
    }
}

/// Admin gate for the page surface: anonymous users are redirected to the
/// login page, authenticated non-admins get a rendered 403.
fn require_admin_page(identity: &RequestIdentity) -> Result<(), HttpResponse> {
    match identity.identity() {
        None => Err(views::redirect("/auth/login?error=Please+login+to+continue")),
        Some(user) if !user.is_admin() => Err(views::error_page(
            StatusCode::FORBIDDEN,
            "Access denied. Only admins can manage restaurants.",
        )),
        Some(_) => Ok(()),
    }
}

fn parse_id_page(raw: &str) -> Result<RestaurantId, HttpResponse> {
    RestaurantId::new(raw)
        .map_err(|_| views::error_page(StatusCode::BAD_REQUEST, "Invalid restaurant id."))
}

fn form_input(label: &str, name: &str, value: Option<&str>) -> String {
    format!(
        r#"<label>{label} <input name="{name}" value="{value}"></label>"#,
        label = views::escape(label),
        name = name,
        value = views::escape(value.unwrap_or_default()),
    )
}

fn restaurant_form_body(
    title: &str,
    action: &str,
    form: &RestaurantForm,
    issues: &[FieldIssue],
) -> String {
    let wifi_checked = if form.has_wifi.as_deref() == Some("on") {
        " checked"
    } else {
        ""
    };
    format!(
        r#"<h1>{title}</h1>
{errors}
<form method="post" action="{action}">
{name}
{rating}
{street}
{city}
{country}
{cuisines}
{amenities}
<label>Wifi <input type="checkbox" name="hasWifi"{wifi_checked}></label>
{image}
{location}
{lat}
{lng}
{price}
{cost}
{currency}
<button type="submit">Save</button>
</form>"#,
        title = views::escape(title),
        errors = views::issue_list(issues),
        action = action,
        name = form_input("Name", "name", form.name.as_deref()),
        rating = form_input("Rating", "rating", form.rating.as_deref()),
        street = form_input("Street", "address[street]", form.address_street.as_deref()),
        city = form_input("City", "address[city]", form.address_city.as_deref()),
        country = form_input("Country", "address[country]", form.address_country.as_deref()),
        cuisines = form_input("Cuisines (comma-separated)", "cuisines", form.cuisines.as_deref()),
        amenities = form_input("Amenities (comma-separated)", "amenities", form.amenities.as_deref()),
        image = form_input("Image URL", "image", form.image.as_deref()),
        location = form_input("Location", "location", form.location.as_deref()),
        lat = form_input("Latitude", "geo[lat]", form.geo_lat.as_deref()),
        lng = form_input("Longitude", "geo[lng]", form.geo_lng.as_deref()),
        price = form_input("Price range ($ to $$$$)", "priceRange", form.price_range.as_deref()),
        cost = form_input(
            "Average cost for two",
            "averageCostForTwo",
            form.average_cost_for_two.as_deref(),
        ),
        currency = form_input("Currency", "currency", form.currency.as_deref()),
    )
}

fn form_from_restaurant(restaurant: &Restaurant) -> RestaurantForm {
    RestaurantForm {
        name: Some(restaurant.name.clone()),
        rating: Some(restaurant.rating.to_string()),
        address_street: Some(restaurant.address.street.clone()),
        address_city: Some(restaurant.address.city.clone()),
        address_country: Some(restaurant.address.country.clone()),
        cuisines: Some(restaurant.cuisines.join(", ")),
        amenities: Some(restaurant.amenities.join(", ")),
        has_wifi: restaurant.has_wifi.then(|| "on".to_owned()),
        image: Some(restaurant.image.clone()),
        location: Some(restaurant.location.clone()),
        geo_lat: Some(restaurant.geo.lat.to_string()),
        geo_lng: Some(restaurant.geo.lng.to_string()),
        price_range: Some(restaurant.price_range.as_symbol().to_owned()),
        average_cost_for_two: Some(restaurant.average_cost_for_two.to_string()),
        currency: Some(restaurant.currency.clone()),
    }
}

fn results_url(query: &SearchQuery, page: u32, per_page: u32) -> String {
    let mut pairs = vec![("page", page.to_string()), ("perPage", per_page.to_string())];
    if let Some(city) = blank_to_none(query.city.as_deref()) {
        pairs.push(("city", city));
    }
    if let Some(cuisine) = blank_to_none(query.cuisine.as_deref()) {
        pairs.push(("cuisine", cuisine));
    }
    if let Some(min_rating) = blank_to_none(query.min_rating.as_deref()) {
        pairs.push(("minRating", min_rating));
    }
    let encoded: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("/restaurants/search/results?{encoded}")
}

/// Search form.
#[get("/search")]
pub async fn search_page(identity: RequestIdentity) -> HttpResponse {
    let body = r#"<h1>Search restaurants</h1>
<form method="get" action="/restaurants/search/results">
<label>City <input name="city"></label>
<label>Cuisine <input name="cuisine"></label>
<label>Minimum rating <input name="minRating"></label>
<button type="submit">Search</button>
</form>"#;
    respond(
        &identity,
        views::html(views::layout("Search", identity.identity(), body)),
    )
}

/// Search results with pagination links.
#[get("/search/results")]
pub async fn search_results(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let params = query.into_inner();
    let (filter, request) = permissive_listing(&params);

    let page = match state.restaurants.page(&filter, request).await {
        Ok(page) => page,
        Err(failure) => return respond(&identity, store_error_page(failure)),
    };

    let cards: String = page.items.iter().map(views::restaurant_card).collect();
    let mut nav = String::new();
    if page.info.has_prev {
        nav.push_str(&format!(
            r#"<a href="{}">Previous</a> "#,
            results_url(&params, page.info.page - 1, page.info.per_page)
        ));
    }
    if page.info.has_next {
        nav.push_str(&format!(
            r#"<a href="{}">Next</a>"#,
            results_url(&params, page.info.page + 1, page.info.per_page)
        ));
    }
    let body = format!(
        "<h1>Results</h1><p>{total} match(es), page {page} of {total_pages}</p>{cards}<nav>{nav}</nav>",
        total = page.info.total,
        page = page.info.page,
        total_pages = page.info.total_pages,
    );
    respond(
        &identity,
        views::html(views::layout("Search results", identity.identity(), &body)),
    )
}

/// Creation form; requires a logged-in user.
#[get("/create")]
pub async fn create_page(identity: RequestIdentity) -> HttpResponse {
    if identity.identity().is_none() {
        return respond(&identity, views::redirect("/auth/login"));
    }
    let body = restaurant_form_body(
        "Add a restaurant",
        "/restaurants",
        &RestaurantForm::default(),
        &[],
    );
    respond(
        &identity,
        views::html(views::layout("Add a restaurant", identity.identity(), &body)),
    )
}

/// Creation submit; re-renders the form with field issues on failure.
#[post("")]
pub async fn create_submit(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    form: web::Form<RestaurantForm>,
) -> HttpResponse {
    let Some(user) = identity.identity() else {
        return respond(&identity, views::redirect("/auth/login"));
    };

    let submitted = form.into_inner();
    let draft = submitted.clone().into_create_draft();
    let restaurant = match Restaurant::from_draft(draft, Some(user.id)) {
        Ok(restaurant) => restaurant,
        Err(failure) => {
            let body = restaurant_form_body(
                "Add a restaurant",
                "/restaurants",
                &submitted,
                failure.issues(),
            );
            return respond(
                &identity,
                views::html(views::layout("Add a restaurant", identity.identity(), &body)),
            );
        }
    };

    match state.restaurants.insert(&restaurant).await {
        Ok(()) => respond(&identity, views::redirect("/restaurants/search/results")),
        Err(failure) => respond(&identity, store_error_page(failure)),
    }
}

/// Details view.
#[get("/{id}")]
pub async fn details_page(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> HttpResponse {
    let id = match parse_id_page(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return respond(&identity, response),
    };

    match state.restaurants.find_by_id(&id).await {
        Ok(Some(restaurant)) => {
            let is_admin = identity.identity().is_some_and(|user| user.is_admin());
            let body = views::restaurant_details(&restaurant, is_admin);
            respond(
                &identity,
                views::html(views::layout(&restaurant.name, identity.identity(), &body)),
            )
        }
        Ok(None) => respond(
            &identity,
            views::error_page(StatusCode::NOT_FOUND, "Restaurant not found."),
        ),
        Err(failure) => respond(&identity, store_error_page(failure)),
    }
}

/// Edit form; admin only.
#[get("/{id}/edit")]
pub async fn edit_page(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(response) = require_admin_page(&identity) {
        return respond(&identity, response);
    }
    let id = match parse_id_page(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return respond(&identity, response),
    };

    match state.restaurants.find_by_id(&id).await {
        Ok(Some(restaurant)) => {
            let body = restaurant_form_body(
                "Edit restaurant",
                &format!("/restaurants/{id}/update"),
                &form_from_restaurant(&restaurant),
                &[],
            );
            respond(
                &identity,
                views::html(views::layout("Edit restaurant", identity.identity(), &body)),
            )
        }
        Ok(None) => respond(
            &identity,
            views::error_page(StatusCode::NOT_FOUND, "Restaurant not found."),
        ),
        Err(failure) => respond(&identity, store_error_page(failure)),
    }
}

/// Update submit; admin only.
#[post("/{id}/update")]
pub async fn update_submit(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
    form: web::Form<RestaurantForm>,
) -> HttpResponse {
    if let Err(response) = require_admin_page(&identity) {
        return respond(&identity, response);
    }
    let id = match parse_id_page(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return respond(&identity, response),
    };

    let existing = match state.restaurants.find_by_id(&id).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            return respond(
                &identity,
                views::error_page(StatusCode::NOT_FOUND, "Restaurant not found."),
            )
        }
        Err(failure) => return respond(&identity, store_error_page(failure)),
    };

    let submitted = form.into_inner();
    let updated = match existing.apply_draft(submitted.clone().into_update_draft()) {
        Ok(updated) => updated,
        Err(failure) => {
            let body = restaurant_form_body(
                "Edit restaurant",
                &format!("/restaurants/{id}/update"),
                &submitted,
                failure.issues(),
            );
            return respond(
                &identity,
                views::html(views::layout("Edit restaurant", identity.identity(), &body)),
            );
        }
    };

    match state.restaurants.replace(&updated).await {
        Ok(true) => respond(&identity, views::redirect(&format!("/restaurants/{id}"))),
        Ok(false) => respond(
            &identity,
            views::error_page(StatusCode::NOT_FOUND, "Restaurant not found."),
        ),
        Err(failure) => respond(&identity, store_error_page(failure)),
    }
}

/// Delete confirmation page; admin only.
#[get("/{id}/delete")]
pub async fn delete_confirm(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(response) = require_admin_page(&identity) {
        return respond(&identity, response);
    }
    let id = match parse_id_page(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return respond(&identity, response),
    };

    match state.restaurants.find_by_id(&id).await {
        Ok(Some(restaurant)) => {
            let body = format!(
                r#"<h1>Delete {name}?</h1>
<p>This cannot be undone.</p>
<form method="post" action="/restaurants/{id}/delete"><button type="submit">Delete</button></form>
<a href="/restaurants/{id}">Cancel</a>"#,
                name = views::escape(&restaurant.name),
            );
            respond(
                &identity,
                views::html(views::layout("Confirm deletion", identity.identity(), &body)),
            )
        }
        Ok(None) => respond(
            &identity,
            views::error_page(StatusCode::NOT_FOUND, "Restaurant not found."),
        ),
        Err(failure) => respond(&identity, store_error_page(failure)),
    }
}

/// Delete commit; admin only.
#[post("/{id}/delete")]
pub async fn delete_submit(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(response) = require_admin_page(&identity) {
        return respond(&identity, response);
    }
    let id = match parse_id_page(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return respond(&identity, response),
    };

    match state.restaurants.delete(&id).await {
        Ok(true) => respond(&identity, views::redirect("/restaurants/search/results")),
        Ok(false) => respond(
            &identity,
            views::error_page(StatusCode::NOT_FOUND, "Restaurant not found."),
        ),
        Err(failure) => respond(&identity, store_error_page(failure)),
    }
}
