//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (axum catch-all, request-id / trace / timeout layers)
//!     → request.rs (buffer body, derive href, detect upgrade attempts)
//!     → rule table dispatch (first match wins)
//!     → error.rs (plain-text status responses when nothing forwards)
//! ```

pub mod error;
pub mod request;
pub mod server;

pub use request::{GatewayRequest, MakeRequestUuid};
pub use server::{HttpServer, ServerOptions};
