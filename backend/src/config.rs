//! Server settings loaded via OrthoConfig.
//!
//! Values come from `GRIEVANCE_*` environment variables, command-line flags,
//! or a configuration file, with the defaults below filling any gaps.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATA_FILE: &str = "grievances.json";
const DEFAULT_CORS_ALLOW_ORIGIN: &str = "*";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The configured host is not an IP address.
    #[error("invalid listen host {host:?}: expected an IP address")]
    InvalidHost { host: String },
}

/// Configuration values for the grievance service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GRIEVANCE")]
pub struct GrievanceSettings {
    /// Listen address.
    pub host: Option<String>,
    /// Listen port.
    pub port: Option<u16>,
    /// Location of the JSON snapshot file.
    pub data_file: Option<PathBuf>,
    /// Expose `POST /api/test-data` for seeding sample grievances.
    #[ortho_config(default = false)]
    pub test_data_enabled: bool,
    /// Value sent in `Access-Control-Allow-Origin`.
    pub cors_allow_origin: Option<String>,
}

impl GrievanceSettings {
    /// Return the configured host, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the configured port, falling back to `5000`.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Return the snapshot path, falling back to `grievances.json` in the
    /// working directory.
    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }

    /// Return the allowed CORS origin, falling back to `*`.
    pub fn cors_allow_origin(&self) -> &str {
        self.cors_allow_origin
            .as_deref()
            .unwrap_or(DEFAULT_CORS_ALLOW_ORIGIN)
    }

    /// Socket address the server binds to.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidHost`] when the host is not an IP
    /// address.
    ///
    /// # Examples
    /// ```
    /// use grievance_backend::config::GrievanceSettings;
    ///
    /// let settings = GrievanceSettings {
    ///     host: Some("127.0.0.1".to_owned()),
    ///     port: Some(8080),
    ///     data_file: None,
    ///     test_data_enabled: false,
    ///     cors_allow_origin: None,
    /// };
    /// assert_eq!(settings.bind_addr()?.to_string(), "127.0.0.1:8080");
    /// # Ok::<(), grievance_backend::config::SettingsError>(())
    /// ```
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host();
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidHost {
            host: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port()))
    }
}
