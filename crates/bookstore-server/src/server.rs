//! HTTP server implementation using Axum.

use crate::handlers::{
    create_book, delete_book, get_all_books, get_book, handle_health, update_book,
};
use crate::middleware::{log_requests, validate_content_type};
use anyhow::{bail, Context};
use axum::{middleware::from_fn, routing::get, Router};
use bookstore_core::BookStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
pub struct AppState {
    /// Storage backend selected at startup.
    pub store: Arc<dyn BookStore>,
}

/// Build the router: `/health` plus the book routes behind request logging
/// and content-type validation.
pub fn build_router(state: Arc<AppState>) -> Router {
    let books = Router::new()
        .route("/book", get(get_all_books).post(create_book))
        .route(
            "/book/:id",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(log_requests))
                .layer(from_fn(validate_content_type)),
        );

    Router::new()
        .route("/health", get(handle_health))
        .merge(books)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A book store server that has not started listening yet.
pub struct BookStoreServer {
    addr: String,
    router: Router,
}

impl BookStoreServer {
    /// Create a server for `addr` (`host:port`, port 0 = auto-assign) backed
    /// by `store`.
    pub fn new(addr: impl Into<String>, store: Arc<dyn BookStore>) -> Self {
        Self {
            addr: addr.into(),
            router: build_router(Arc::new(AppState { store })),
        }
    }

    /// Bind the listener and start serving in the background.
    ///
    /// Bind failures are returned here; failures after startup surface
    /// through [`RunningServer::wait`].
    pub async fn listen_and_serve(self) -> anyhow::Result<RunningServer> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .with_context(|| format!("failed to bind {}", self.addr))?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // A dropped sender also stops the server.
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!("Server listening on {}", local_addr);

        Ok(RunningServer {
            local_addr,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }
}

/// Handle to a server started by [`BookStoreServer::listen_and_serve`].
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl RunningServer {
    /// The address actually bound (useful when port=0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Resolve when the server stops on its own.
    ///
    /// Cancel-safe: dropping the future leaves the server running.
    pub async fn wait(&mut self) -> anyhow::Result<()> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };
        let result = task.await;
        self.task = None;
        result.context("server task panicked")??;
        Ok(())
    }

    /// Stop accepting connections and wait up to `timeout` for in-flight
    /// requests to finish. The server is aborted if the timeout elapses.
    pub async fn shutdown(mut self, timeout: Duration) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let Some(task) = self.task.take() else {
            return Ok(());
        };
        let abort = task.abort_handle();

        match tokio::time::timeout(timeout, task).await {
            Ok(joined) => {
                joined.context("server task panicked")??;
                Ok(())
            }
            Err(_) => {
                abort.abort();
                bail!("graceful shutdown timed out after {:?}", timeout)
            }
        }
    }
}
