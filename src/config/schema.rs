//! Configuration schema definitions.
//!
//! This module defines the declarative configuration for the kernel.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the kernel.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct KernelConfig {
    /// Route definitions, in precedence order.
    pub routes: Vec<RouteConfig>,

    /// Path aliases mapping a short path onto a canonical pattern.
    pub aliases: Vec<AliasConfig>,

    /// Reject conflicting alias registrations at boot.
    pub strict_aliases: bool,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A single route definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging. Defaults to the path.
    pub name: Option<String>,

    /// Path pattern with `{name}` / `{name:regex}` placeholders.
    pub path: String,

    /// Accepted HTTP methods. Must be declared explicitly; an empty
    /// list is rejected at boot.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Opaque controller binding returned verbatim on match.
    pub controller: String,
}

/// An alias entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AliasConfig {
    /// The alias path looked up before matching.
    pub alias: String,

    /// The canonical path pattern it rewrites to.
    pub target: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
