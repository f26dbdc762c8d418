//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, pattern compilation)
//!     → KernelConfig + RouteCollection (validated, immutable)
//!     → contributed to the kernel via a ConfigRouteSource aggregate
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a full reboot
//! - All fields have defaults to allow minimal configs, except methods:
//!   every route declares its methods explicitly
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every semantic error, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{AliasConfig, KernelConfig, ObservabilityConfig, RouteConfig};
pub use validation::{build_routes, ValidationError};
