//! Semantic configuration checks, run after deserialization.

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("https is enabled but [gateway.tls] is missing")]
    MissingTls,

    #[error("http and https listeners share port {0}")]
    PortClash(u16),

    #[error("no listener is enabled; listen() would never become ready")]
    NoListeners,

    #[error("backend uri '{uri}' is invalid: {reason}")]
    InvalidBackendUri { uri: String, reason: String },

    #[error("credentials user '{0}' must not contain ':'")]
    InvalidCredentialsUser(String),
}

/// Validate semantic constraints the schema alone cannot express.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.gateway.https && config.gateway.tls.is_none() {
        errors.push(ValidationError::MissingTls);
    }

    if config.gateway.http
        && config.gateway.https
        && config.gateway.port == config.gateway.https_port
    {
        errors.push(ValidationError::PortClash(config.gateway.port));
    }

    if !config.gateway.http && !config.gateway.https {
        errors.push(ValidationError::NoListeners);
    }

    for backend in &config.backends {
        match Url::parse(&backend.uri) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::InvalidBackendUri {
                uri: backend.uri.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidBackendUri {
                uri: backend.uri.clone(),
                reason: e.to_string(),
            }),
        }

        if let Some(credentials) = &backend.credentials {
            if credentials.user.contains(':') {
                errors.push(ValidationError::InvalidCredentialsUser(
                    credentials.user.clone(),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
