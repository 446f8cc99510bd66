//! Scope / action pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! Matched request
//!     → scope.rs (fresh Scope: parsed request, URL, guest identity)
//!     → action.rs (ordered ActionSet, each action transforms the Scope)
//!     → Ok(final Scope) or Err(ApiError) aborting the request
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: each action receives the Scope returned by the
//!   previous one, no two actions run concurrently for the same request
//! - Duplicate registration of the same action instance is a no-op,
//!   keyed by identity (Arc data pointer), not structural equality
//! - A failing action aborts the pipeline; the forward rule translates the
//!   error into a response and never reaches target selection

pub mod action;
pub mod scope;

pub use action::{Action, ActionSet};
pub use scope::{Identity, Scope};
