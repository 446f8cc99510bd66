//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Backend registration:
//!     Api descriptor (edge plural names) + internal host
//!     → matcher.rs (compile one combined alternation per backend)
//!
//! Incoming request:
//!     href → matcher.matches() → (resource, rest) captures or no match
//! ```
//!
//! # Design Decisions
//! - One pattern per backend, not one per edge: the rule table scan stays
//!   O(number of backends) instead of O(edges across all backends)
//! - Patterns are fixed at rule construction time; APIs are not updated
//!   in place
//! - Overlapping patterns between backends are not detected; the earlier
//!   rule in the table wins

pub mod matcher;

pub use matcher::{RouteError, RouteMatch, RouteMatcher};
