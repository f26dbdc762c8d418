//! Route collection round trip over the message bus.
//!
//! # Data Flow
//! ```text
//! Boot:
//!     aggregates.attach_listeners(dispatcher)
//!     → collect_routes(dispatcher)
//!         emits routes.collect
//!         → each contributing listener returns Response::Routes
//!         → contributions merged in invocation (priority) order
//!     → frozen collection handed to the matcher
//!
//! Per request:
//!     match failure → notify_match_failure(dispatcher, ...)
//!         → routes.not_found / routes.method_not_allowed
//! ```
//!
//! # Design Decisions
//! - Contributions must not be mutated after being handed over; sources
//!   clone what they contribute
//! - Non-route responses to routes.collect are ignored with a warning
//!   rather than failing boot

use crate::messaging::{
    Listener, ListenerAggregate, Message, MessageDispatcher, Priority, Response,
};

use super::collection::RouteCollection;
use super::matcher::MatchError;
use super::route::Method;

/// A listener aggregate that contributes a prebuilt route collection
/// (typically loaded from configuration) during the collect round trip.
#[derive(Debug, Clone)]
pub struct ConfigRouteSource {
    collection: RouteCollection,
    priority: Priority,
}

impl ConfigRouteSource {
    pub fn new(collection: RouteCollection) -> Self {
        Self {
            collection,
            priority: 0,
        }
    }

    /// Contribution priority; higher-priority sources contribute first,
    /// so their routes take precedence for overlapping patterns.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl ListenerAggregate for ConfigRouteSource {
    fn attach_listeners(&self, dispatcher: &mut MessageDispatcher) {
        let contribution = self.collection.clone();
        dispatcher.attach(Listener::on(
            crate::messaging::names::ROUTE_COLLECT,
            self.priority,
            move |_, _| Some(Response::Routes(contribution.clone())),
        ));
    }
}

/// Run the collect-routes round trip and merge every contribution into
/// one collection, in listener-priority order.
pub fn collect_routes(dispatcher: &mut MessageDispatcher) -> RouteCollection {
    let mut message = Message::collect_routes();
    let responses = dispatcher.notify_with_responses(&mut message);

    let mut merged = RouteCollection::new();
    for response in responses {
        match response {
            Response::Routes(contribution) => {
                tracing::debug!(
                    routes = contribution.len(),
                    aliases = contribution.alias_count(),
                    "merging route contribution"
                );
                merged.merge(contribution);
            }
            Response::Value(_) => {
                tracing::warn!("ignoring non-route response to routes.collect");
            }
        }
    }
    tracing::info!(routes = merged.len(), "route collection assembled");
    merged
}

/// Translate a match failure into its dispatcher message so application
/// listeners can react generically.
pub fn notify_match_failure(
    dispatcher: &mut MessageDispatcher,
    path: &str,
    method: Method,
    error: &MatchError,
) {
    let mut message = match error {
        MatchError::RouteNotFound { .. } => Message::route_not_found(path, method),
        MatchError::MethodNotAllowed { allowed, .. } => {
            Message::method_not_allowed(path, method, allowed)
        }
    };
    dispatcher.notify(&mut message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{keys, names, ParamValue};
    use crate::routing::route::{ControllerBinding, Route};
    use std::sync::{Arc, Mutex};

    fn collection_with(paths: &[&str]) -> RouteCollection {
        let mut collection = RouteCollection::new();
        for path in paths {
            collection.add_route(
                Route::new(path, [Method::Get], ControllerBinding::new("test#action")).unwrap(),
            );
        }
        collection
    }

    #[test]
    fn test_collect_merges_in_priority_order() {
        let mut dispatcher = MessageDispatcher::new();
        ConfigRouteSource::new(collection_with(&["/late"]))
            .with_priority(1)
            .attach_listeners(&mut dispatcher);
        ConfigRouteSource::new(collection_with(&["/early/one", "/early/two"]))
            .with_priority(10)
            .attach_listeners(&mut dispatcher);

        let merged = collect_routes(&mut dispatcher);
        let paths: Vec<&str> = merged.routes().iter().map(Route::path).collect();
        assert_eq!(paths, vec!["/early/one", "/early/two", "/late"]);
    }

    #[test]
    fn test_collect_ignores_value_responses() {
        let mut dispatcher = MessageDispatcher::new();
        dispatcher.attach(Listener::on(names::ROUTE_COLLECT, 0, |_, _| {
            Some(Response::Value(ParamValue::Bool(true)))
        }));
        ConfigRouteSource::new(collection_with(&["/kept"])).attach_listeners(&mut dispatcher);

        let merged = collect_routes(&mut dispatcher);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_collect_with_no_sources_is_empty() {
        let mut dispatcher = MessageDispatcher::new();
        assert!(collect_routes(&mut dispatcher).is_empty());
    }

    #[test]
    fn test_notify_match_failure_emits_typed_messages() {
        let mut dispatcher = MessageDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        dispatcher.attach(Listener::new(
            crate::messaging::ListenerPattern::parse("routes.*").unwrap(),
            0,
            {
                let seen = Arc::clone(&seen);
                move |message, _| {
                    seen.lock().unwrap().push((
                        message.name().as_str().to_string(),
                        message
                            .param(keys::PATH)
                            .and_then(ParamValue::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    ));
                    None
                }
            },
        ));

        notify_match_failure(
            &mut dispatcher,
            "/missing",
            Method::Get,
            &MatchError::RouteNotFound {
                path: "/missing".to_string(),
            },
        );
        notify_match_failure(
            &mut dispatcher,
            "/items",
            Method::Get,
            &MatchError::MethodNotAllowed {
                path: "/items".to_string(),
                method: Method::Get,
                allowed: [Method::Post].into_iter().collect(),
            },
        );

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ("routes.not_found".to_string(), "/missing".to_string()),
                ("routes.method_not_allowed".to_string(), "/items".to_string()),
            ]
        );
    }
}
