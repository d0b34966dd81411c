//! Restaurant API handlers.
//!
//! ```text
//! GET    /api/restaurants?page=2&perPage=5&city=paris&cuisine=thai&minRating=4
//! GET    /api/restaurants/{id}
//! POST   /api/restaurants
//! PUT    /api/restaurants/{id}
//! DELETE /api/restaurants/{id}
//! GET    /api/restaurants/search/filters?city=paris
//! ```
//!
//! One authorization policy covers both HTTP surfaces: creation requires an
//! authenticated identity, update and delete require the admin tier.

use actix_web::{delete, get, post, put, web, HttpResponse};
use pagination::PageInfo;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Restaurant, RestaurantDraft};
use crate::inbound::http::auth::MessageResponse;
use crate::inbound::http::error::{
    map_restaurant_persistence_error, map_restaurant_validation_error, ApiResult,
};
use crate::inbound::http::restaurants_dto::{
    CreateRestaurantRequest, RestaurantDto, UpdateRestaurantRequest,
};
use crate::inbound::http::session::RequestIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_listing, parse_restaurant_id};

/// Raw listing query; numerics stay strings so malformed input yields a
/// structured 400 instead of a framework deserialisation error.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// 1-indexed page number.
    pub page: Option<String>,
    /// Page size, bounded to [1, 100].
    pub per_page: Option<String>,
    /// Case-insensitive substring match on the city.
    pub city: Option<String>,
    /// Case-insensitive substring match on the cuisine tags.
    pub cuisine: Option<String>,
    /// Inclusive lower bound on the rating.
    pub min_rating: Option<String>,
}

/// Response body for the paginated listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantListResponse {
    /// Always true on the success path.
    pub success: bool,
    /// One page of matches, rating descending then name ascending.
    pub data: Vec<RestaurantDto>,
    /// Pagination metadata for the whole result set.
    #[schema(value_type = Object)]
    pub pagination: PageInfo,
}

/// Response body for single-record operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Human-readable acknowledgment for mutations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The record itself.
    pub data: RestaurantDto,
}

/// Response body for the lightweight filter search.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Number of results returned (capped).
    pub count: usize,
    /// Matches, rating descending then name ascending.
    pub data: Vec<RestaurantDto>,
}

/// List restaurants with filtering and pagination.
#[utoipa::path(
    get,
    path = "/api/restaurants",
    responses(
        (status = 200, description = "One page of restaurants", body = RestaurantListResponse),
        (status = 400, description = "Invalid query parameters", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["restaurants"],
    operation_id = "listRestaurants",
    security([])
)]
#[get("")]
pub async fn list_restaurants(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<RestaurantListResponse>> {
    let params = query.into_inner();
    let (filter, request) = parse_listing(
        params.page.as_deref(),
        params.per_page.as_deref(),
        params.city.as_deref(),
        params.cuisine.as_deref(),
        params.min_rating.as_deref(),
    )?;

    let page = state
        .restaurants
        .page(&filter, request)
        .await
        .map_err(map_restaurant_persistence_error)?;

    Ok(web::Json(RestaurantListResponse {
        success: true,
        data: page.items.into_iter().map(RestaurantDto::from).collect(),
        pagination: page.info,
    }))
}

/// Lightweight search sharing the listing filter semantics, capped at 20
/// results.
#[utoipa::path(
    get,
    path = "/api/restaurants/search/filters",
    responses(
        (status = 200, description = "Capped search results", body = SearchResponse),
        (status = 400, description = "Invalid query parameters", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["restaurants"],
    operation_id = "searchRestaurants",
    security([])
)]
#[get("/search/filters")]
pub async fn search_filters(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<SearchResponse>> {
    let params = query.into_inner();
    let (filter, _) = parse_listing(
        None,
        None,
        params.city.as_deref(),
        params.cuisine.as_deref(),
        params.min_rating.as_deref(),
    )?;

    let matches = state
        .restaurants
        .search(&filter)
        .await
        .map_err(map_restaurant_persistence_error)?;

    Ok(web::Json(SearchResponse {
        success: true,
        count: matches.len(),
        data: matches.into_iter().map(RestaurantDto::from).collect(),
    }))
}

/// Fetch one restaurant by id.
#[utoipa::path(
    get,
    path = "/api/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant identifier")),
    responses(
        (status = 200, description = "The restaurant", body = RestaurantResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "No such restaurant", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["restaurants"],
    operation_id = "getRestaurant",
    security([])
)]
#[get("/{id}")]
pub async fn get_restaurant(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RestaurantResponse>> {
    let id = parse_restaurant_id(&path.into_inner())?;
    let restaurant = state
        .restaurants
        .find_by_id(&id)
        .await
        .map_err(map_restaurant_persistence_error)?
        .ok_or_else(|| Error::not_found("restaurant not found"))?;

    Ok(web::Json(RestaurantResponse {
        success: true,
        message: None,
        data: RestaurantDto::from(restaurant),
    }))
}

/// Create a restaurant; requires an authenticated identity, which is
/// recorded as the creator.
#[utoipa::path(
    post,
    path = "/api/restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 201, description = "Restaurant created", body = RestaurantResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["restaurants"],
    operation_id = "createRestaurant"
)]
#[post("")]
pub async fn create_restaurant(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    payload: web::Json<CreateRestaurantRequest>,
) -> ApiResult<HttpResponse> {
    let creator = identity.require()?.id;
    let draft = RestaurantDraft::from(payload.into_inner());
    let restaurant = Restaurant::from_draft(draft, Some(creator))
        .map_err(|err| map_restaurant_validation_error(&err))?;

    state
        .restaurants
        .insert(&restaurant)
        .await
        .map_err(map_restaurant_persistence_error)?;

    Ok(HttpResponse::Created().json(RestaurantResponse {
        success: true,
        message: Some("Restaurant created successfully".to_owned()),
        data: RestaurantDto::from(restaurant),
    }))
}

/// Update a restaurant; admin only. Absent body fields keep stored values,
/// and the merged record passes the full validation pass.
#[utoipa::path(
    put,
    path = "/api/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant identifier")),
    request_body = UpdateRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant updated", body = RestaurantResponse),
        (status = 400, description = "Validation failed or malformed id", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Admin tier required", body = Error),
        (status = 404, description = "No such restaurant", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["restaurants"],
    operation_id = "updateRestaurant"
)]
#[put("/{id}")]
pub async fn update_restaurant(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateRestaurantRequest>,
) -> ApiResult<web::Json<RestaurantResponse>> {
    identity.require_admin()?;
    let id = parse_restaurant_id(&path.into_inner())?;

    let existing = state
        .restaurants
        .find_by_id(&id)
        .await
        .map_err(map_restaurant_persistence_error)?
        .ok_or_else(|| Error::not_found("restaurant not found"))?;

    let draft = payload.into_inner().merge_onto(&existing);
    let updated = existing
        .apply_draft(draft)
        .map_err(|err| map_restaurant_validation_error(&err))?;

    let replaced = state
        .restaurants
        .replace(&updated)
        .await
        .map_err(map_restaurant_persistence_error)?;
    if !replaced {
        return Err(Error::not_found("restaurant not found").into());
    }

    Ok(web::Json(RestaurantResponse {
        success: true,
        message: Some("Restaurant updated successfully".to_owned()),
        data: RestaurantDto::from(updated),
    }))
}

/// Delete a restaurant; admin only.
#[utoipa::path(
    delete,
    path = "/api/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant identifier")),
    responses(
        (status = 200, description = "Restaurant deleted", body = MessageResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Admin tier required", body = Error),
        (status = 404, description = "No such restaurant", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["restaurants"],
    operation_id = "deleteRestaurant"
)]
#[delete("/{id}")]
pub async fn delete_restaurant(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    identity.require_admin()?;
    let id = parse_restaurant_id(&path.into_inner())?;

    let deleted = state
        .restaurants
        .delete(&id)
        .await
        .map_err(map_restaurant_persistence_error)?;
    if !deleted {
        return Err(Error::not_found("restaurant not found").into());
    }

    Ok(web::Json(MessageResponse {
        success: true,
        message: "Restaurant deleted successfully".to_owned(),
    }))
}
