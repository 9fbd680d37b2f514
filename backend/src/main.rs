//! Backend entry-point: loads settings, prepares the database and serves.

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use color_eyre::eyre::{Context as _, Result};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use trio::config::AppSettings;
use trio::inbound::http::health::HealthState;
use trio::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use trio::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("load settings")?;
    let database_url = settings.database_url()?.to_owned();
    let bind_addr = settings.bind_addr()?;
    let auth = settings.auth()?;

    if settings.run_migrations {
        run_pending_migrations(database_url.clone())
            .await
            .wrap_err("apply migrations")?;
    }

    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(settings.pool_max_size())
            .with_checkout_timeout(settings.pool_checkout_timeout()),
    )
    .await
    .wrap_err("create database pool")?;

    let base = ServerConfig::new(bind_addr, pool)
        .with_applications(settings.applications())
        .with_auth(auth);
    #[cfg(feature = "metrics")]
    let config = base.with_metrics(Some(make_metrics()?));
    #[cfg(not(feature = "metrics"))]
    let config = base;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("start server")?;
    server.await.wrap_err("serve")?;
    health_state.mark_unhealthy();
    info!("server stopped");
    Ok(())
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("trio")
        .endpoint("/metrics")
        .build()
        .map_err(|err| color_eyre::eyre::eyre!("configure Prometheus metrics: {err}"))
}
