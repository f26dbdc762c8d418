//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (boot.rs):
//!     Load config → Validate → Attach listeners → Collect routes → Freeze
//!
//! Per request:
//!     Kernel.resolve → RouteMatch or typed failure (+ failure message)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: configuration first, then listener registration,
//!   then the collect round trip
//! - Boot-time errors stop startup; request-time errors are values

pub mod boot;

pub use boot::{Kernel, KernelBuilder};
