//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Configure the log level from config or environment
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - Initialization is idempotent so embedding applications and tests
//!   can call it freely

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `level` is the fallback filter when `RUST_LOG` is unset, e.g. the
/// configured `observability.log_level`. Repeated calls after the first
/// are no-ops.
pub fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("web_kernel={level}").into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
