//! JSON API adapter exposing the `/api` surface.

pub mod auth;
pub mod error;
pub mod health;
pub mod restaurants;
pub mod restaurants_dto;
pub mod session;
pub mod state;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the `/api` routes on an application.
///
/// Route order matters for the restaurant scope: the static
/// `/search/filters` path must be registered before the `/{id}` matcher.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .service(auth::register)
                    .service(auth::login)
                    .service(auth::logout)
                    .service(auth::profile),
            )
            .service(
                web::scope("/restaurants")
                    .service(restaurants::search_filters)
                    .service(restaurants::list_restaurants)
                    .service(restaurants::create_restaurant)
                    .service(restaurants::get_restaurant)
                    .service(restaurants::update_restaurant)
                    .service(restaurants::delete_restaurant),
            ),
    );
}
