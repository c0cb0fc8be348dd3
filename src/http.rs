mod handler;

use crate::store::CatalogRepository;
use anyhow::Context;
use axum::Router;
use axum::routing::{get, put};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Debug)]
pub struct AppState<CR: CatalogRepository> {
    catalog: Arc<CR>,
}

impl<CR: CatalogRepository> AppState<CR> {
    pub fn new(catalog: CR) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

impl<CR: CatalogRepository> Clone for AppState<CR> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    host: String,
    port: u16,
}

impl HttpServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<CR: CatalogRepository>(
        state: AppState<CR>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;

        Ok(Self {
            router: router(state),
            listener,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self
            .listener
            .local_addr()
            .context("Failed to read listener address")?;
        tracing::info!("listening on {addr}");
        axum::serve(self.listener, self.router)
            .await
            .context("Received error from running server")?;
        Ok(())
    }
}

/// Builds the complete application router, request tracing included.
pub fn router<CR: CatalogRepository>(state: AppState<CR>) -> Router {
    Router::new()
        .nest("/api", api_routes::<CR>())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes<CR: CatalogRepository>() -> Router<AppState<CR>> {
    Router::new()
        .route(
            "/books",
            get(handler::list_books::<CR>).post(handler::create_book::<CR>),
        )
        .route("/books/filter", get(handler::filter_books::<CR>))
        .route("/books/{id}", put(handler::update_book::<CR>))
        .route("/authors/{id}", get(handler::find_author_details::<CR>))
        .route("/authors/{id}/books", get(handler::list_books_by_author::<CR>))
}
