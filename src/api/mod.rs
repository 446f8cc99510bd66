//! Backend API descriptor subsystem.
//!
//! # Data Flow
//! ```text
//! GET <uri>/.api-core (JSON)
//!     → model.rs (deserialize metadata, build Api descriptor)
//!     → request.rs (turn path segments into a typed ApiRequest)
//!     → error.rs (status-coded ApiError for schema violations)
//! ```
//!
//! # Design Decisions
//! - Api is immutable once built; registered APIs are never updated in place
//! - Edge order is preserved (it determines alternation order in routing)
//! - Parse errors carry an HTTP status so rules can surface them verbatim

pub mod error;
pub mod model;
pub mod request;

pub use error::{ApiError, BoxError};
pub use model::{Api, ApiEdge, ApiMetadata};
pub use request::{ApiRequest, ApiRequestPath, PathSegment};
