//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Boot:
//!     route sources (config, application aggregates)
//!     → collect.rs (routes.collect round trip)
//!     → collection.rs (ordered routes + aliases, merged, frozen)
//!
//! Per request (path, method):
//!     → matcher.rs (alias rewrite, ordered scan)
//!     → pattern.rs (compiled placeholder matching)
//!     → Return: RouteMatch{route, params} or typed MatchError
//! ```
//!
//! # Design Decisions
//! - Patterns validated at boot, compiled lazily once, immutable after
//! - First match wins (registration order), so precedence is
//!   caller-controlled and deterministic
//! - Match failures are values; the transport layer maps them to
//!   protocol responses (404, 405 + Allow)

pub mod collect;
pub mod collection;
pub mod matcher;
pub mod pattern;
pub mod route;

pub use collect::{collect_routes, notify_match_failure, ConfigRouteSource};
pub use collection::{CollectionError, RouteCollection};
pub use matcher::{MatchError, RouteMatch, RouteMatcher};
pub use pattern::{PathPattern, PatternError, Placeholder};
pub use route::{ControllerBinding, Method, Route, UnknownMethod};
