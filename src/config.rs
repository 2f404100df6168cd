//! Connection configuration.
//!
//! [`ConnectionOptions`] collects what the caller supplied; every field is
//! optional. [`ConnectionConfig::resolve`] fills the gaps with defaults and
//! the ambient origin, producing the immutable configuration a client owns.
//!
//! # Example
//! ```
//! use wsclient::config::{ConnectionConfig, ConnectionOptions};
//! use wsclient::origin::NoAmbientOrigin;
//!
//! let options = ConnectionOptions::new().host("127.0.0.1").port(9000);
//! let config = ConnectionConfig::resolve(options, &NoAmbientOrigin);
//! assert_eq!(config.socket_url(), "ws://127.0.0.1:9000/server");
//! ```

use crate::base::neterror::NetError;
use crate::origin::{AmbientOriginProvider, NoAmbientOrigin};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_SOCKET_PATH: &str = "/server";
pub const DEFAULT_HTTP_PATH: &str = "/";

/// Caller-supplied connection options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub socket_path: Option<String>,
    pub http_path: Option<String>,
    pub secure: Option<bool>,
}

impl ConnectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the socket endpoint path.
    pub fn socket_path(mut self, path: impl Into<String>) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    /// Set the companion HTTP endpoint path.
    pub fn http_path(mut self, path: impl Into<String>) -> Self {
        self.http_path = Some(path.into());
        self
    }

    /// Force `wss`/`https` on or off instead of following the ambient origin.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Parse options from JSON (`{"host": "...", "socketPath": "...", ...}`).
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Resolved, immutable connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    port: Option<u16>,
    socket_path: String,
    http_path: String,
    secure: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::resolve(ConnectionOptions::default(), &NoAmbientOrigin)
    }
}

impl ConnectionConfig {
    /// Resolve options against defaults.
    ///
    /// Empty strings and a zero port count as "not supplied". `secure`
    /// falls back to `origin` only when it was not set explicitly.
    pub fn resolve(options: ConnectionOptions, origin: &dyn AmbientOriginProvider) -> Self {
        Self {
            host: non_empty_or(options.host, DEFAULT_HOST),
            port: options.port.filter(|p| *p != 0),
            socket_path: non_empty_or(options.socket_path, DEFAULT_SOCKET_PATH),
            http_path: non_empty_or(options.http_path, DEFAULT_HTTP_PATH),
            secure: options.secure.unwrap_or_else(|| origin.is_encrypted()),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn socket_path(&self) -> &str {
        &self.socket_path
    }

    pub fn http_path(&self) -> &str {
        &self.http_path
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// `{ws|wss}://{host}[:{port}]{socket_path}`
    pub fn socket_url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        self.build_url(scheme, &self.socket_path)
    }

    /// `{http|https}://{host}[:{port}]{http_path}`
    pub fn http_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        self.build_url(scheme, &self.http_path)
    }

    /// The socket URL, validated.
    pub fn parsed_socket_url(&self) -> Result<Url, NetError> {
        Url::parse(&self.socket_url()).map_err(|_| NetError::InvalidUrl)
    }

    // The port is rendered whenever one is configured, 80 and 443 included.
    fn build_url(&self, scheme: &str, path: &str) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}{}", scheme, self.host, port, path),
            None => format!("{}://{}{}", scheme, self.host, path),
        }
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::PageOrigin;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.host(), "localhost");
        assert_eq!(config.port(), None);
        assert_eq!(config.socket_path(), "/server");
        assert_eq!(config.http_path(), "/");
        assert!(!config.is_secure());
    }

    #[test]
    fn test_explicit_options() {
        let options = ConnectionOptions::new()
            .host("0.0.0.0")
            .port(8080)
            .socket_path("/serverz")
            .http_path("/healthz")
            .secure(true);
        let config = ConnectionConfig::resolve(options, &NoAmbientOrigin);

        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), Some(8080));
        assert_eq!(config.socket_path(), "/serverz");
        assert_eq!(config.http_path(), "/healthz");
        assert!(config.is_secure());
    }

    #[test]
    fn test_empty_values_fall_back() {
        let options = ConnectionOptions::new()
            .host("")
            .port(0)
            .socket_path("")
            .http_path("");
        let config = ConnectionConfig::resolve(options, &NoAmbientOrigin);
        assert_eq!(config, ConnectionConfig::default());
    }

    #[test]
    fn test_secure_from_ambient_origin() {
        let https = PageOrigin::from_protocol("https:");
        let config = ConnectionConfig::resolve(ConnectionOptions::new(), &https);
        assert!(config.is_secure());

        // Explicit setting wins over the page
        let config = ConnectionConfig::resolve(ConnectionOptions::new().secure(false), &https);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_urls_with_port() {
        let options = ConnectionOptions::new().host("127.0.0.1").port(9000).secure(false);
        let config = ConnectionConfig::resolve(options, &NoAmbientOrigin);
        assert_eq!(config.socket_url(), "ws://127.0.0.1:9000/server");
        assert_eq!(config.http_url(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_urls_secure_without_port() {
        let config = ConnectionConfig::resolve(ConnectionOptions::new().secure(true), &NoAmbientOrigin);
        assert_eq!(config.socket_url(), "wss://localhost/server");
        assert_eq!(config.http_url(), "https://localhost/");
    }

    #[test]
    fn test_default_looking_port_is_rendered() {
        let options = ConnectionOptions::new().host("example.com").port(80);
        let config = ConnectionConfig::resolve(options, &NoAmbientOrigin);
        assert_eq!(config.socket_url(), "ws://example.com:80/server");

        let options = ConnectionOptions::new().host("example.com").port(443).secure(true);
        let config = ConnectionConfig::resolve(options, &NoAmbientOrigin);
        assert_eq!(config.http_url(), "https://example.com:443/");
    }

    #[test]
    fn test_url_matrix() {
        for secure in [false, true] {
            for port in [None, Some(8080)] {
                let mut options = ConnectionOptions::new().host("h").secure(secure);
                if let Some(p) = port {
                    options = options.port(p);
                }
                let config = ConnectionConfig::resolve(options, &NoAmbientOrigin);
                let suffix = port.map(|p| format!(":{}", p)).unwrap_or_default();
                let (ws, http) = if secure { ("wss", "https") } else { ("ws", "http") };

                assert_eq!(config.socket_url(), format!("{}://h{}/server", ws, suffix));
                assert_eq!(config.http_url(), format!("{}://h{}/", http, suffix));
            }
        }
    }

    #[test]
    fn test_parsed_socket_url() {
        let url = ConnectionConfig::default().parsed_socket_url().unwrap();
        assert_eq!(url.scheme(), "ws");
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.path(), "/server");

        let options = ConnectionOptions::new().host("bad host");
        let config = ConnectionConfig::resolve(options, &NoAmbientOrigin);
        assert_eq!(config.parsed_socket_url(), Err(NetError::InvalidUrl));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_options_from_json() {
        let options = ConnectionOptions::from_json(
            r#"{"host": "10.0.0.1", "port": 7000, "socketPath": "/ws", "secure": true}"#,
        )
        .unwrap();
        assert_eq!(options.host.as_deref(), Some("10.0.0.1"));
        assert_eq!(options.port, Some(7000));
        assert_eq!(options.socket_path.as_deref(), Some("/ws"));
        assert_eq!(options.http_path, None);
        assert_eq!(options.secure, Some(true));

        let empty = ConnectionOptions::from_json("{}").unwrap();
        assert_eq!(empty, ConnectionOptions::default());
    }
}
