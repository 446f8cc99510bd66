//! Upstream targets and the forward step.
//!
//! # Data Flow
//! ```text
//! Forward rule matched + pipeline passed
//!     → target.rs (weighted pick of one upstream location)
//!     → auth.rs (optional HTTP Basic challenge)
//!     → forward.rs (fill {0}{1} template, proxy via the shared client)
//! ```
//!
//! # Design Decisions
//! - Each forward rule carries exactly one weighted target list; selection
//!   policy stays here, connection handling stays in the hyper client
//! - An empty pick is a legitimate outcome and becomes a 503 upstream
//! - Upstream connect failure becomes a 502, never a crash

pub mod auth;
pub mod forward;
pub mod target;

pub use auth::Credentials;
pub use forward::{build_client, ForwardClient};
pub use target::{Target, TargetList};
