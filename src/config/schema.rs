//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

use crate::gateway::{GatewayOptions, TlsOptions};
use crate::upstream::Credentials;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener and routing options.
    pub gateway: GatewaySection,

    /// Backends registered at start-up.
    pub backends: Vec<BackendEntry>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// The gateway's own options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewaySection {
    /// Enable the plain-HTTP listener.
    pub http: bool,

    /// Enable the HTTPS listener (requires [gateway.tls]).
    pub https: bool,

    /// Bind host for the listeners.
    pub host: String,

    /// Host the route patterns are derived from.
    pub internal_host: String,

    /// HTTP port.
    pub port: u16,

    /// HTTPS port.
    pub https_port: u16,

    /// Accepted for compatibility; never consumed by registration or
    /// dispatch logic.
    pub retry_ms: u64,

    /// TLS material for the HTTPS listener.
    pub tls: Option<TlsConfig>,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            http: true,
            https: false,
            host: "localhost".to_string(),
            internal_host: "localhost".to_string(),
            port: 80,
            https_port: 443,
            retry_ms: 2000,
            tls: None,
        }
    }
}

impl GatewayConfig {
    /// Derive the runtime gateway options from the file schema.
    pub fn options(&self) -> GatewayOptions {
        GatewayOptions {
            http: self.gateway.http,
            https: self.gateway.https,
            host: self.gateway.host.clone(),
            internal_host: self.gateway.internal_host.clone(),
            port: self.gateway.port,
            https_port: self.gateway.https_port,
            retry_ms: self.gateway.retry_ms,
            tls: self.gateway.tls.as_ref().map(|tls| TlsOptions {
                cert_path: tls.cert_path.clone().into(),
                key_path: tls.key_path.clone().into(),
            }),
            request_timeout: std::time::Duration::from_secs(self.timeouts.request_secs),
        }
    }
}

/// TLS configuration for the HTTPS listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// One backend to register at start-up.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendEntry {
    /// Base URI of the backend (its `/.api-core` document is fetched from
    /// here).
    pub uri: String,

    /// Optional HTTP Basic credentials guarding this backend's rule.
    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,
}

/// HTTP Basic credentials for one backend rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    pub realm: String,
    pub user: String,
    pub pass: String,
}

impl From<CredentialsConfig> for Credentials {
    fn from(config: CredentialsConfig) -> Self {
        Credentials::new(config.realm, config.user, config.pass)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_documented_contract() {
        let section = GatewaySection::default();
        assert!(section.http);
        assert!(!section.https);
        assert_eq!(section.host, "localhost");
        assert_eq!(section.internal_host, "localhost");
        assert_eq!(section.port, 80);
        assert_eq!(section.https_port, 443);
    }

    #[test]
    fn test_minimal_toml_parses_with_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [gateway]
            port = 8080

            [[backends]]
            uri = "http://svc-a:3000"
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.port, 8080);
        assert!(config.gateway.http);
        assert_eq!(config.backends.len(), 1);
        assert!(config.backends[0].credentials.is_none());
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_credentials_parse() {
        let entry: BackendEntry = toml::from_str(
            r#"
            uri = "http://svc-a:3000"

            [credentials]
            realm = "gateway"
            user = "admin"
            pass = "s3cret"
            "#,
        )
        .unwrap();

        let credentials: Credentials = entry.credentials.unwrap().into();
        assert_eq!(credentials.realm, "gateway");
    }
}
