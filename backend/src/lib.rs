//! Restaurant directory backend.
//!
//! A CRUD web application serving a JSON API under `/api` and
//! server-rendered HTML pages, both backed by the same domain ports:
//! signed-token authentication, validated restaurant drafts, and
//! Diesel/PostgreSQL repositories with pagination and filtering.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware attaching a `trace-id` header.
pub use middleware::Trace;
