//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! start (controller.rs):
//!     stop previous transport → merge config → clear registry
//!     → run discovery → resolve transport → transport.start
//!
//! stop (controller.rs):
//!     current transport stopped, reference dropped
//!
//! shutdown (shutdown.rs):
//!     broadcast channel a serving transport listens on for graceful exit
//! ```
//!
//! # Design Decisions
//! - One mutex serializes every start and stop; bootstrap sequences never overlap
//! - The lock is held across the whole start, config and bind I/O included
//! - A failed start leaves nothing running; the previous transport is already down

pub mod controller;
pub mod shutdown;

pub use controller::{LifecycleController, StartError};
pub use shutdown::Shutdown;
