//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → gateway options + backend registration list
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the rule table it produces is frozen
//!   at listen time, so there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BackendEntry, CredentialsConfig, GatewayConfig, GatewaySection, ObservabilityConfig,
    TimeoutConfig, TlsConfig,
};
pub use validation::{validate_config, ValidationError};
