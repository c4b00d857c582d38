use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use pricefeed::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let cache = Arc::new(cache_store::CacheStore::new(Duration::from_secs(
        app_config.cache.ttl_secs,
    )));
    let client = providers::http_client()?;
    let aggregator = Arc::new(aggregator::Aggregator::new(
        Arc::new(providers::AwsSource::new(
            client.clone(),
            app_config.providers.aws_region.clone(),
        )),
        Arc::new(providers::AzureSource::new(
            client.clone(),
            app_config.providers.azure_region.clone(),
        )),
        Arc::new(providers::GcpSource::new(
            client,
            app_config.providers.gcp_region.clone(),
        )),
        cache.clone(),
    ));
    let query = Arc::new(query::QueryService::new(cache.clone(), aggregator.clone()));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    // The worker's first tick is the startup aggregation; the listener binds
    // without waiting for it, and cold requests coalesce on the same cycle.
    let worker_handle = refresh_worker::spawn(
        refresh_worker::WorkerDeps {
            aggregator,
            cache,
            shutdown_rx,
        },
        refresh_worker::WorkerConfig {
            refresh_interval_secs: app_config.refresh.interval_secs,
            sweep_interval_secs: app_config.cache.sweep_interval_secs,
        },
    );

    let app = routes::app(query);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run server until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                        Ok(s) => s,
                        Err(_) => {
                            let _ = tokio::signal::ctrl_c().await;
                            return;
                        }
                    };
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    tokio::signal::ctrl_c().await
                }
            } => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
                let _ = worker_handle.await;
            }
        }
    }

    Ok(())
}
