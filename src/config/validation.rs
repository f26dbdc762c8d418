//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile route patterns and parse method lists
//! - Build the validated RouteCollection
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::KernelConfig;
use crate::routing::{
    CollectionError, ControllerBinding, Method, PatternError, Route, RouteCollection,
};

/// A single semantic configuration error.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A route's path pattern or method set was rejected.
    #[error("route `{route}`: {source}")]
    Route {
        route: String,
        #[source]
        source: PatternError,
    },

    /// A route listed a method string the kernel does not know.
    #[error("route `{route}`: unknown HTTP method `{method}`")]
    UnknownMethod { route: String, method: String },

    /// Conflicting alias registration under strict mode.
    #[error(transparent)]
    Alias(#[from] CollectionError),
}

/// Build the route collection from configuration.
///
/// Every route and alias is checked; all errors are reported together so
/// a broken config surfaces completely in one boot attempt.
pub fn build_routes(config: &KernelConfig) -> Result<RouteCollection, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut collection = if config.strict_aliases {
        RouteCollection::strict()
    } else {
        RouteCollection::new()
    };

    for route_config in &config.routes {
        let label = route_config
            .name
            .clone()
            .unwrap_or_else(|| route_config.path.clone());

        let mut methods = Vec::with_capacity(route_config.methods.len());
        let mut methods_ok = true;
        for method in &route_config.methods {
            match method.parse::<Method>() {
                Ok(parsed) => methods.push(parsed),
                Err(_) => {
                    methods_ok = false;
                    errors.push(ValidationError::UnknownMethod {
                        route: label.clone(),
                        method: method.clone(),
                    });
                }
            }
        }
        if !methods_ok {
            continue;
        }

        match Route::new(
            &route_config.path,
            methods,
            ControllerBinding::new(&route_config.controller),
        ) {
            Ok(route) => {
                let route = match &route_config.name {
                    Some(name) => route.with_name(name),
                    None => route,
                };
                collection.add_route(route);
            }
            Err(source) => errors.push(ValidationError::Route {
                route: label,
                source,
            }),
        }
    }

    for alias_config in &config.aliases {
        if let Err(conflict) = collection.add_alias(&alias_config.alias, &alias_config.target) {
            errors.push(ValidationError::Alias(conflict));
        }
    }

    if errors.is_empty() {
        Ok(collection)
    } else {
        Err(errors)
    }
}
