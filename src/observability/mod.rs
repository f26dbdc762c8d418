//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//! ```
//!
//! # Design Decisions
//! - Structured events with field syntax for machine parsing
//! - Dispatch and match boundaries log at debug; anomalies at warn

pub mod logging;

pub use logging::init_logging;
