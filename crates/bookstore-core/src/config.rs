//! Centralized configuration constants for the bookstore service.

use std::time::Duration;

/// HTTP server defaults.
pub struct ServerConfig;

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;
    /// How long graceful shutdown may take before in-flight requests are dropped.
    pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);
    /// Line prefix printed on stdout once the listener is bound.
    pub const PORT_ANNOUNCE_PREFIX: &'static str = "BOOKSTORE_PORT=";
}

/// Storage provider names.
pub struct ProviderConfig;

impl ProviderConfig {
    /// The in-memory reference backend.
    pub const MEMORY: &'static str = "mem";
    pub const DEFAULT: &'static str = Self::MEMORY;
}
