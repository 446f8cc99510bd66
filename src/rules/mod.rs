//! Dispatchable rules and the two-phase rule table.
//!
//! # Data Flow
//! ```text
//! Configuration phase:
//!     register_backend → ForwardRule → RuleTableBuilder (ordered append)
//!     register_action  → broadcast to every rule in the builder
//!     listen           → builder frozen into an immutable RuleTable
//!
//! Serving phase:
//!     GatewayRequest → table.dispatch → first rule returning a response
//! ```
//!
//! # Design Decisions
//! - One `Rule` trait covers API-backed, external-handler and
//!   caller-supplied rules; the table iterates them uniformly
//! - The builder → frozen-table handoff makes the configuration/serving
//!   phase boundary a type-level fact, not a documentation contract
//! - First match wins; the fallback, if any, is appended last

pub mod fallback;
pub mod forward;
pub mod rule;
pub mod table;

pub use fallback::FallbackRule;
pub use forward::ForwardRule;
pub use rule::{Rule, UnsupportedProtocol};
pub use table::{RuleTable, RuleTableBuilder};
