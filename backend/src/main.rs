//! Backend entry-point: loads settings, applies migrations and serves the API.

mod server;

use std::io;
use std::process;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use car_listings::inbound::http::health::HealthState;
use car_listings::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use car_listings::outbound::storage::LocalImageStore;
use car_listings::settings::{AppSettings, RuntimeConfig};

use server::{ServerConfig, create_server};

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        error!(panic = %info, "unrecoverable fault, exiting");
        process::exit(1);
    }));
}

fn load_config() -> io::Result<RuntimeConfig> {
    let settings = AppSettings::load_from_iter(std::env::args_os()).map_err(|err| {
        error!(error = %err, "failed to load configuration");
        io::Error::other(err.to_string())
    })?;
    settings.validate().map_err(|err| {
        error!(error = %err, "invalid configuration");
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })
}

async fn build_server_config(config: RuntimeConfig) -> io::Result<ServerConfig> {
    let RuntimeConfig {
        database_url,
        signing_secret,
        bind_addr,
        upload_dir,
        db_max_connections,
    } = config;

    run_migrations(&database_url).await.map_err(|err| {
        error!(error = %err, "database migrations failed");
        io::Error::other(err)
    })?;

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(db_max_connections))
        .await
        .map_err(|err| {
            error!(error = %err, "failed to build connection pool");
            io::Error::other(err)
        })?;

    let image_store = LocalImageStore::open(&upload_dir).inspect_err(|err| {
        error!(error = %err, upload_dir = %upload_dir.display(), "cannot open upload directory");
    })?;

    Ok(ServerConfig::new(bind_addr, pool, image_store, signing_secret))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    install_panic_hook();

    let config = build_server_config(load_config()?).await?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    info!("server stopped");
    Ok(())
}
