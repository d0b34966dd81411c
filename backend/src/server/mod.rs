//! Server construction and middleware wiring.

mod config;

pub use config::{database_url_from_env, ServerConfig};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::TokenIssuer;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::state::{CookiePolicy, HttpState};
use crate::inbound::{http, pages};
use crate::middleware::Trace;
use crate::outbound::persistence::{DieselRestaurantRepository, DieselUserRepository};

/// Build the shared handler state from the configuration.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let tokens = TokenIssuer::new(
        &config.token_secret,
        chrono::Duration::hours(config.token_ttl_hours),
    );
    HttpState::new(
        Arc::new(DieselUserRepository::new(config.db_pool.clone())),
        Arc::new(DieselRestaurantRepository::new(config.db_pool.clone())),
        tokens,
        CookiePolicy {
            secure: config.cookie_secure,
            max_age_hours: config.token_ttl_hours,
        },
    )
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(http::configure)
        .service(ready)
        .service(live)
        .configure(pages::configure)
        .default_service(web::route().to(pages::not_found));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let server_health_state = health_state.clone();
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
