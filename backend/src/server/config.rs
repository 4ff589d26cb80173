//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use grievance_backend::inbound::http::RouteOptions;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_allow_origin: String,
    pub(crate) routes: RouteOptions,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr` that allows
    /// every origin and keeps optional routes disabled.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            cors_allow_origin: "*".to_owned(),
            routes: RouteOptions::default(),
        }
    }

    /// Restrict cross-origin callers to `origin`.
    #[must_use]
    pub fn with_cors_allow_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_allow_origin = origin.into();
        self
    }

    /// Register the sample data route when `enabled`.
    #[must_use]
    pub fn with_test_data(mut self, enabled: bool) -> Self {
        self.routes.test_data_enabled = enabled;
        self
    }
}
