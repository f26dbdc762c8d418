//! Request resolution against a frozen route collection.
//!
//! # Responsibilities
//! - Rewrite the request path through the alias map
//! - Try routes in registration order; first full match wins
//! - Track method-mismatch candidates and report their allowed union
//!
//! # Design Decisions
//! - Ordering is caller-controlled: `/users/new` registered before
//!   `/users/{id}` takes precedence
//! - A method mismatch does not end the scan; a later route with the
//!   same path shape may still accept the method
//! - Match failures are ordinary typed results for the transport layer,
//!   never panics

use std::collections::BTreeSet;

use thiserror::Error;

use super::collection::RouteCollection;
use super::route::{Method, Route};

/// Per-request match failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// No route's path pattern matched the request path.
    #[error("no route matches path `{path}`")]
    RouteNotFound { path: String },

    /// At least one route matched the path, but none accepted the
    /// method. Carries the allowed-method union for an Allow header.
    #[error("method {method} not allowed for `{path}` (allowed: {})", format_methods(.allowed))]
    MethodNotAllowed {
        path: String,
        method: Method,
        allowed: BTreeSet<Method>,
    },
}

fn format_methods(methods: &BTreeSet<Method>) -> String {
    let mut out = String::new();
    for (index, method) in methods.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(method.as_str());
    }
    out
}

/// A successful resolution: the route plus its extracted placeholder
/// values in declaration order.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Vec<(String, String)>,
}

/// Matches request paths and methods against a frozen collection.
///
/// The collection is read-only once the matcher owns it, so a matcher
/// may be shared freely across concurrent request handlers.
#[derive(Debug, Clone, Default)]
pub struct RouteMatcher {
    collection: RouteCollection,
}

impl RouteMatcher {
    pub fn new(collection: RouteCollection) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &RouteCollection {
        &self.collection
    }

    /// Resolve a request path and method to a route.
    pub fn match_request(&self, path: &str, method: Method) -> Result<RouteMatch<'_>, MatchError> {
        let resolved = self.collection.resolve_alias(path);
        if resolved != path {
            tracing::debug!(path, resolved = %resolved, "alias rewrite applied");
        }

        let mut allowed: BTreeSet<Method> = BTreeSet::new();
        let mut path_matched = false;

        for route in self.collection.routes() {
            let Some(params) = route.match_path(&resolved) else {
                continue;
            };
            if route.allows(method) {
                tracing::debug!(
                    path,
                    method = %method,
                    route = route.name().unwrap_or_else(|| route.path()),
                    "route matched"
                );
                return Ok(RouteMatch { route, params });
            }
            // Path shape fits; keep scanning for a method that fits too.
            path_matched = true;
            allowed.extend(route.methods().iter().copied());
        }

        if path_matched {
            tracing::debug!(path, method = %method, "method not allowed");
            Err(MatchError::MethodNotAllowed {
                path: path.to_string(),
                method,
                allowed,
            })
        } else {
            tracing::debug!(path, "no route matched");
            Err(MatchError::RouteNotFound {
                path: path.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::ControllerBinding;

    fn route(path: &str, methods: impl IntoIterator<Item = Method>, binding: &str) -> Route {
        Route::new(path, methods, ControllerBinding::new(binding)).unwrap()
    }

    fn matcher(routes: Vec<Route>) -> RouteMatcher {
        let mut collection = RouteCollection::new();
        for r in routes {
            collection.add_route(r);
        }
        RouteMatcher::new(collection)
    }

    #[test]
    fn test_first_registered_wins_over_parametrized() {
        let matcher = matcher(vec![
            route("/users/new", [Method::Get], "users#new"),
            route("/users/{id}", [Method::Get], "users#show"),
        ]);

        let found = matcher.match_request("/users/new", Method::Get).unwrap();
        assert_eq!(found.route.binding().as_str(), "users#new");
        assert!(found.params.is_empty());
    }

    #[test]
    fn test_placeholder_extraction() {
        let matcher = matcher(vec![route("/users/{id:[0-9]+}", [Method::Get], "users#show")]);

        let found = matcher.match_request("/users/42", Method::Get).unwrap();
        assert_eq!(found.params, vec![("id".to_string(), "42".to_string())]);

        assert_eq!(
            matcher.match_request("/users/abc", Method::Get).unwrap_err(),
            MatchError::RouteNotFound {
                path: "/users/abc".to_string()
            }
        );
    }

    #[test]
    fn test_method_not_allowed_carries_union() {
        let matcher = matcher(vec![
            route("/items", [Method::Post], "items#create"),
            route("/items", [Method::Put], "items#replace"),
        ]);

        let err = matcher.match_request("/items", Method::Get).unwrap_err();
        assert_eq!(
            err,
            MatchError::MethodNotAllowed {
                path: "/items".to_string(),
                method: Method::Get,
                allowed: [Method::Post, Method::Put].into_iter().collect(),
            }
        );
    }

    #[test]
    fn test_later_route_rescues_method_mismatch() {
        let matcher = matcher(vec![
            route("/items/{id}", [Method::Get], "items#show"),
            route("/items/{id}", [Method::Delete], "items#destroy"),
        ]);

        let found = matcher.match_request("/items/7", Method::Delete).unwrap();
        assert_eq!(found.route.binding().as_str(), "items#destroy");
    }

    #[test]
    fn test_not_found() {
        let matcher = matcher(vec![route("/items", [Method::Get], "items#index")]);
        assert_eq!(
            matcher.match_request("/missing", Method::Get).unwrap_err(),
            MatchError::RouteNotFound {
                path: "/missing".to_string()
            }
        );
    }

    #[test]
    fn test_alias_resolves_like_canonical_path() {
        let mut collection = RouteCollection::new();
        collection.add_route(route("/users/{id:[0-9]+}", [Method::Get], "users#show"));
        collection.add_alias("/u", "/users/{id:[0-9]+}").unwrap();
        let matcher = RouteMatcher::new(collection);

        let via_alias = matcher.match_request("/u/42", Method::Get).unwrap();
        let direct = matcher.match_request("/users/42", Method::Get).unwrap();

        assert_eq!(via_alias.route.binding(), direct.route.binding());
        assert_eq!(via_alias.params, direct.params);
    }

    #[test]
    fn test_method_not_allowed_display_lists_methods() {
        let err = MatchError::MethodNotAllowed {
            path: "/items".to_string(),
            method: Method::Get,
            allowed: [Method::Post, Method::Put].into_iter().collect(),
        };
        assert_eq!(
            err.to_string(),
            "method GET not allowed for `/items` (allowed: POST, PUT)"
        );
    }
}
