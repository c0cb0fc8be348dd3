use book_catalog::config::Config;
use book_catalog::http::{AppState, HttpServer, HttpServerConfig};
use book_catalog::memory::InMemoryCatalog;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("book_catalog=info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    let state = AppState::new(InMemoryCatalog::seeded());
    let server_config = HttpServerConfig::new(config.server_host(), config.server_port());
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
