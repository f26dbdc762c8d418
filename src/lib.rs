//! Web Framework Kernel
//!
//! The in-memory core of a web framework: a priority-ordered,
//! aggregation-aware message dispatcher (the event bus) and the route
//! collection/matching engine built on top of it.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                    KERNEL                        │
//!                     │                                                  │
//!     Boot            │  ┌─────────┐   routes.collect   ┌─────────────┐  │
//!     ────────────────┼─▶│messaging│◀──────────────────▶│   routing   │  │
//!                     │  │dispatch │   Response::Routes │  collection │  │
//!                     │  └─────────┘                    └──────┬──────┘  │
//!                     │       ▲                                │         │
//!                     │       │ routes.not_found               ▼         │
//!     Request         │       │ routes.method_not_allowed ┌──────────┐   │
//!     (path, method) ─┼───────┴───────────────────────────│  matcher │   │
//!                     │                                   └────┬─────┘   │
//!     RouteMatch /    │                                        │         │
//!     MatchError  ◀───┼────────────────────────────────────────┘         │
//!                     │                                                  │
//!                     │  ┌────────────────────────────────────────────┐  │
//!                     │  │           Cross-Cutting Concerns           │  │
//!                     │  │   ┌────────┐  ┌───────────┐  ┌─────────┐   │  │
//!                     │  │   │ config │  │ lifecycle │  │ logging │   │  │
//!                     │  │   └────────┘  └───────────┘  └─────────┘   │  │
//!                     │  └────────────────────────────────────────────┘  │
//!                     └──────────────────────────────────────────────────┘
//! ```
//!
//! The kernel performs no I/O of its own: the transport layer supplies
//! `(path, method)` and turns the typed results into protocol responses;
//! controller bindings are opaque values handed back verbatim.

// Core subsystems
pub mod messaging;
pub mod routing;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::{ConfigError, KernelConfig};
pub use lifecycle::{Kernel, KernelBuilder};
pub use messaging::{
    Listener, ListenerAggregate, ListenerId, Message, MessageDispatcher, Response,
};
pub use routing::{
    ControllerBinding, MatchError, Method, Route, RouteCollection, RouteMatch, RouteMatcher,
};
