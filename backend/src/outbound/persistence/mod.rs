//! Diesel/PostgreSQL persistence adapters.

mod diesel_helpers;
mod diesel_restaurant_repository;
mod diesel_user_repository;
mod models;
mod pool;
pub mod schema;

pub use diesel_restaurant_repository::DieselRestaurantRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

/// Embedded schema migrations applied at startup.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply pending migrations before the pool starts serving requests.
///
/// Runs on a blocking thread because the migration harness drives a
/// synchronous connection wrapper.
///
/// # Errors
/// Returns [`PoolError::Build`] when connecting or migrating fails.
pub async fn run_migrations(database_url: &str) -> Result<(), PoolError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        use diesel::Connection;
        use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
        use diesel_async::AsyncPgConnection;

        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&url)
            .map_err(|err| PoolError::build(err.to_string()))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|err| PoolError::build(err.to_string()))
    })
    .await
    .map_err(|err| PoolError::build(err.to_string()))?
}
