//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the specification for the JSON API surface. Swagger
//! UI serves it in debug builds at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{
    AuthResponse, LoginRequest, MessageResponse, ProfileResponse, RegisterRequest, UserProfile,
};
use crate::inbound::http::restaurants::{
    RestaurantListResponse, RestaurantResponse, SearchResponse,
};
use crate::inbound::http::restaurants_dto::{
    AddressPayload, CreateRestaurantRequest, GeoPayload, RestaurantDto, ReviewPayload,
    UpdateRestaurantRequest,
};

/// Registers the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Signed token issued by POST /api/auth/login. Also accepted via the \
                         `token` cookie or `token` query parameter.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Restaurant directory API",
        description = "Registration, login, and restaurant CRUD with pagination and filtering."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::profile,
        crate::inbound::http::restaurants::list_restaurants,
        crate::inbound::http::restaurants::search_filters,
        crate::inbound::http::restaurants::get_restaurant,
        crate::inbound::http::restaurants::create_restaurant,
        crate::inbound::http::restaurants::update_restaurant,
        crate::inbound::http::restaurants::delete_restaurant,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        MessageResponse,
        ProfileResponse,
        UserProfile,
        CreateRestaurantRequest,
        UpdateRestaurantRequest,
        AddressPayload,
        GeoPayload,
        ReviewPayload,
        RestaurantDto,
        RestaurantListResponse,
        RestaurantResponse,
        SearchResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login, and profile"),
        (name = "restaurants", description = "Restaurant directory CRUD and search"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Coverage for OpenAPI document assembly.
    use super::*;

    #[test]
    fn document_registers_the_api_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/restaurants",
            "/api/restaurants/{id}",
            "/api/restaurants/search/filters",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn document_registers_the_error_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.keys().any(|name| name.contains("Error")));
    }
}
