//! Backend entry-point: wires tracing, migrations, the connection pool, and
//! the HTTP server.

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{run_migrations, DbPool, PoolConfig};
use backend::server::{create_server, database_url_from_env, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = database_url_from_env()?;
    run_migrations(&database_url)
        .await
        .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|err| std::io::Error::other(format!("pool construction failed: {err}")))?;

    let config = ServerConfig::from_env(pool)?;
    let health_state = web::Data::new(HealthState::new());

    info!(addr = %config.bind_addr(), "starting restaurant directory backend");
    let server = create_server(health_state, config)?;
    server.await
}
