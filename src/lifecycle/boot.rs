//! Kernel boot sequence and per-request resolution.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     KernelBuilder::new()
//!     → attach aggregates / listeners (registration completes here)
//!     → boot(): routes.collect round trip, collection frozen
//!     → Kernel { dispatcher, matcher }
//!
//! Per request:
//!     kernel.resolve(path, method)
//!     → Ok(RouteMatch) for the transport layer
//!     → Err(MatchError) after emitting the matching failure message
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then listeners, then the collect
//!   round trip; matching never observes a half-built collection
//! - Registration is a boot-time activity; the registry is not meant to
//!   change while requests are in flight

use std::path::Path;

use crate::config::{self, ConfigError};
use crate::messaging::{Listener, ListenerAggregate, MessageDispatcher};
use crate::observability;
use crate::routing::{collect, ConfigRouteSource, MatchError, Method, RouteCollection, RouteMatch, RouteMatcher};

/// Builder that accumulates listeners before the collect round trip.
#[derive(Default)]
pub struct KernelBuilder {
    dispatcher: MessageDispatcher,
}

impl KernelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a batch of listeners (e.g. a route source).
    pub fn attach_aggregate(mut self, aggregate: &dyn ListenerAggregate) -> Self {
        aggregate.attach_listeners(&mut self.dispatcher);
        self
    }

    /// Attach a single listener.
    pub fn attach_listener(mut self, listener: Listener) -> Self {
        self.dispatcher.attach(listener);
        self
    }

    /// Run the collect-routes round trip and freeze the kernel.
    pub fn boot(mut self) -> Kernel {
        let routes = collect::collect_routes(&mut self.dispatcher);
        tracing::info!(
            routes = routes.len(),
            listeners = self.dispatcher.listener_count(),
            "kernel booted"
        );
        Kernel {
            dispatcher: self.dispatcher,
            matcher: RouteMatcher::new(routes),
        }
    }
}

/// The booted framework core: the event bus plus the frozen route
/// matcher.
pub struct Kernel {
    dispatcher: MessageDispatcher,
    matcher: RouteMatcher,
}

impl Kernel {
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    /// Boot from a TOML configuration file: load and validate config,
    /// initialize logging, contribute the configured routes through the
    /// collect round trip.
    pub fn from_config(path: &Path) -> Result<Self, ConfigError> {
        let (config, routes) = config::load(path)?;
        observability::init_logging(&config.observability.log_level);
        Ok(Self::builder()
            .attach_aggregate(&ConfigRouteSource::new(routes))
            .boot())
    }

    /// Resolve a request. On failure the corresponding message
    /// (`routes.not_found` / `routes.method_not_allowed`) is dispatched
    /// before the typed error is returned, so application listeners can
    /// react generically.
    pub fn resolve(&mut self, path: &str, method: Method) -> Result<RouteMatch<'_>, MatchError> {
        match self.matcher.match_request(path, method) {
            Ok(found) => Ok(found),
            Err(error) => {
                collect::notify_match_failure(&mut self.dispatcher, path, method, &error);
                Err(error)
            }
        }
    }

    pub fn routes(&self) -> &RouteCollection {
        self.matcher.collection()
    }

    /// The event bus, for emitting application messages.
    pub fn dispatcher(&mut self) -> &mut MessageDispatcher {
        &mut self.dispatcher
    }
}
