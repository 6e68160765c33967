use crate::prelude::*;
use clap::Parser;

mod aggregate;
mod collections;
mod config;
mod error;
mod prelude;
mod server;
mod zotero;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Recursive collection, item and bibliography views over a Zotero group library"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Zotero group whose library is exposed
    #[clap(long, env = "ZOTPROXY_GROUP", global = true, default_value = config::DEFAULT_GROUP)]
    group: String,

    /// Base URL of the Zotero web API
    #[clap(long, env = "ZOTPROXY_BASE_URL", global = true, default_value = config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Zotero API key, needed for private group libraries
    #[clap(long, env = "ZOTERO_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum number of per-collection upstream requests in flight
    #[clap(long, env = "ZOTPROXY_CONCURRENCY", global = true, default_value = "1")]
    concurrency: usize,

    /// Upstream request timeout in seconds
    #[clap(long, env = "ZOTPROXY_TIMEOUT_SECS", global = true, default_value = "30")]
    timeout_secs: u64,

    /// Whether to display additional information.
    #[clap(long, env = "ZOTPROXY_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Serve the collection endpoints over HTTP
    Serve(crate::server::App),

    /// Query collections, items and bibliographies from the terminal
    Collections(crate::collections::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Serve(sub_app) => crate::server::run(sub_app, app.global).await,
        SubCommands::Collections(sub_app) => crate::collections::run(sub_app, app.global).await,
    }
}
