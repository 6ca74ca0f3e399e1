//! Bookstore Server - HTTP CRUD service for books.
//!
//! This binary wires a storage provider from `bookstore-core` into an Axum
//! router and serves it until SIGINT/SIGTERM.

mod handlers;
mod middleware;
mod server;

use anyhow::{Context, Result};
use bookstore_core::{
    register_builtin_providers, registry, BookStore, ProviderConfig, ServerConfig, StoreRegistry,
};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::server::BookStoreServer;

/// How the storage provider registry is set up at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RegistryStyle {
    /// A registry value owned by `main`.
    Explicit,
    /// The process-wide registry.
    Global,
}

#[derive(Parser, Debug)]
#[command(name = "bookstore-server")]
#[command(about = "HTTP CRUD service for books")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value_t = ServerConfig::DEFAULT_PORT)]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = ServerConfig::DEFAULT_HOST)]
    host: String,

    /// Name of the registered storage provider to serve from
    #[arg(long, default_value = ProviderConfig::DEFAULT)]
    provider: String,

    /// Which registry to resolve the provider through
    #[arg(long, value_enum, default_value_t = RegistryStyle::Explicit)]
    registry: RegistryStyle,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Resolve `provider` from `registry`, listing what is available on failure.
fn select_store(registry: &StoreRegistry, provider: &str) -> Result<Arc<dyn BookStore>> {
    registry.lookup(provider).with_context(|| {
        warn!("Storage provider '{}' is not registered", provider);
        format!(
            "cannot start with provider '{}' (registered: {})",
            provider,
            registry.names().join(", ")
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting bookstore server");

    let store = match args.registry {
        RegistryStyle::Explicit => {
            let registry = StoreRegistry::new();
            register_builtin_providers(&registry);
            select_store(&registry, &args.provider)?
        }
        RegistryStyle::Global => {
            register_builtin_providers(registry::global());
            select_store(registry::global(), &args.provider)?
        }
    };
    info!(
        "Using storage provider '{}' ({:?} registry)",
        args.provider, args.registry
    );

    let addr = format!("{}:{}", args.host, args.port);
    let mut server = match BookStoreServer::new(addr, store).listen_and_serve().await {
        Ok(server) => server,
        Err(e) => {
            warn!("Web server start failed: {:#}", e);
            return Err(e);
        }
    };
    info!("Web server start success");

    // Print port for supervisors and tests to read (intentional stdout)
    println!(
        "{}{}",
        ServerConfig::PORT_ANNOUNCE_PREFIX,
        server.local_addr().port()
    );

    let stopped_early = tokio::select! {
        result = server.wait() => Some(result),
        _ = shutdown_signal() => None,
    };

    if let Some(result) = stopped_early {
        warn!("Bookstore server stopped unexpectedly");
        return result.context("bookstore server error");
    }

    info!("Bookstore program is exiting...");
    match server.shutdown(ServerConfig::SHUTDOWN_TIMEOUT).await {
        Ok(()) => {
            info!("Bookstore program exit ok");
            Ok(())
        }
        Err(e) => {
            warn!("Bookstore program exit error: {:#}", e);
            Err(e)
        }
    }
}

/// Wait for SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["bookstore-server"]);
        assert_eq!(args.port, 8080);
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.provider, "mem");
        assert_eq!(args.registry, RegistryStyle::Explicit);
        assert!(!args.debug);
    }

    #[test]
    fn test_registry_style_flag() {
        let args = Args::parse_from(["bookstore-server", "--registry", "global", "-p", "0"]);
        assert_eq!(args.registry, RegistryStyle::Global);
        assert_eq!(args.port, 0);
    }

    #[test]
    fn test_select_store_unknown_provider() {
        let registry = StoreRegistry::new();
        register_builtin_providers(&registry);

        let err = select_store(&registry, "postgres").err().unwrap();
        let message = format!("{:#}", err);
        assert!(message.contains("registered: mem"));
        assert!(message.contains("unknown provider postgres"));
        assert!(select_store(&registry, "mem").is_ok());
    }
}
