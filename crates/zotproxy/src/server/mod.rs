mod cli;
mod routes;

pub use cli::App;
pub use routes::router;

use crate::config::Config;
use crate::prelude::{eprintln, *};
use crate::zotero::ZoteroClient;
use std::sync::Arc;

/// Immutable per-process state shared by every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: ZoteroClient,
    pub concurrency: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: ZoteroClient::new(config)?,
            concurrency: config.concurrency,
        })
    }
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::from(&global);
    let addr = format!("{}:{}", app.host, app.port);

    if global.verbose {
        eprintln!("Zotero API: {}", config.base_url);
        eprintln!("Group: {}", config.group);
        eprintln!("Upstream concurrency: {}", config.concurrency);
        eprintln!();
    }

    let state = Arc::new(AppState::new(&config)?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Listening on http://{addr} (group {})", config.group);
    if global.verbose {
        eprintln!("API live on http://{}", addr);
        eprintln!("Collections endpoint: http://{}/collections", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
