use std::future::Future;
use std::net::SocketAddr;

mod app;
mod config;
mod db;
mod docs;
mod error;
mod response;
mod schema;
mod state;
mod telemetry;
mod users;

use crate::config::{AppConfig, LogConfig};
use crate::db::DataClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init(&LogConfig::from_env()?);
    telemetry::install_panic_hook();

    let code = supervise(run()).await;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

/// Runs the server on its own task so a panic outside a request still ends
/// the process with status 1.
async fn supervise<F>(server: F) -> i32
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    match tokio::spawn(server).await {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            tracing::error!(error = %format!("{e:#}"), "Server failed on startup");
            1
        }
        Err(e) => {
            tracing::error!(error = %e, "Uncaught exception, shutting down");
            1
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    if let Some(tz) = &config.timezone {
        tracing::info!(timezone = %tz, "process timezone");
    }

    let client = DataClient::connect(&config.database, config.max_connections).await?;

    // Run migrations if present
    if let Err(e) = client.migrate().await {
        tracing::warn!(error = %e, backend = ?client.backend(), "migration failed; continuing");
    }

    let app = app::build_app(AppState::init(client.clone()));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let served = app::serve(app, addr).await;

    client.close().await;
    served
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_shutdown_exits_zero() {
        assert_eq!(supervise(async { Ok::<(), anyhow::Error>(()) }).await, 0);
    }

    #[tokio::test]
    async fn startup_errors_exit_one() {
        assert_eq!(supervise(async { Err::<(), _>(anyhow::anyhow!("port in use")) }).await, 1);
    }

    #[tokio::test]
    async fn panics_outside_requests_exit_one() {
        let code = supervise(async {
            let ports: Vec<u16> = Vec::new();
            let _first = ports[0];
            Ok::<(), anyhow::Error>(())
        })
        .await;
        assert_eq!(code, 1);
    }
}
