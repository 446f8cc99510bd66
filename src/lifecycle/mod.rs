//! Lifecycle coordination.
//!
//! # Data Flow
//! ```text
//! listen():
//!     startup.rs — one StartSignal per enabled listener, the barrier
//!     fires the ready callback once every listener has bound
//!
//! ctrl-c / handle.shutdown():
//!     shutdown.rs — broadcast to every serving task, graceful drain
//! ```

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{StartBarrier, StartSignal};
