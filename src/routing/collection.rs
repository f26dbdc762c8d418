//! Ordered route set and path aliases.
//!
//! # Responsibilities
//! - Hold routes in registration order (first registered, first tried)
//! - Maintain the alias map and its strict-mode conflict check
//! - Merge contributions from multiple sources into one collection
//!
//! # Design Decisions
//! - Built incrementally, then treated as read-only for matching
//! - Merge concatenates routes in contribution order; alias collisions
//!   resolve later-wins
//! - Strict alias conflicts are boot-time fatal, not request-time

use std::borrow::Cow;
use std::collections::HashMap;

use thiserror::Error;

use super::route::Route;

/// Boot-time collection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// An alias was registered twice with conflicting targets while the
    /// collection is in strict-alias mode.
    #[error("alias `{alias}` already targets `{existing}` (attempted `{attempted}`)")]
    DuplicateAlias {
        alias: String,
        existing: String,
        attempted: String,
    },
}

/// The ordered, queryable set of all known routes and path aliases.
#[derive(Debug, Clone, Default)]
pub struct RouteCollection {
    routes: Vec<Route>,
    aliases: HashMap<String, String>,
    strict_aliases: bool,
}

impl RouteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection whose alias registration rejects conflicting targets.
    pub fn strict() -> Self {
        Self {
            strict_aliases: true,
            ..Self::default()
        }
    }

    /// Append a route. Ordering is significant: earlier routes win when
    /// patterns overlap.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Register an alias for a canonical path pattern.
    ///
    /// In strict mode, re-registering an alias with a different target is
    /// an error; re-registering with the same target is a no-op. Outside
    /// strict mode, later registrations overwrite.
    pub fn add_alias(
        &mut self,
        alias: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<(), CollectionError> {
        let alias = alias.into();
        let target = target.into();
        if self.strict_aliases {
            if let Some(existing) = self.aliases.get(&alias) {
                if *existing != target {
                    return Err(CollectionError::DuplicateAlias {
                        alias,
                        existing: existing.clone(),
                        attempted: target,
                    });
                }
                return Ok(());
            }
        }
        self.aliases.insert(alias, target);
        Ok(())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Absorb another collection: routes append in contribution order,
    /// alias collisions resolve in favor of the later contribution.
    pub fn merge(&mut self, other: RouteCollection) {
        self.routes.extend(other.routes);
        for (alias, target) in other.aliases {
            self.aliases.insert(alias, target);
        }
    }

    /// Rewrite a request path through the alias map before matching.
    ///
    /// Lookup is string-based, never pattern-based: the whole path first,
    /// then the longest alias that is a whole-segment prefix. The
    /// remainder after the alias carries over onto the target pattern's
    /// literal head, so `/u/42` under `/u → /users/{id}` matches exactly
    /// like `/users/42`.
    pub fn resolve_alias<'a>(&self, path: &'a str) -> Cow<'a, str> {
        if let Some(target) = self.aliases.get(path) {
            return Cow::Owned(literal_head(target).to_string());
        }

        let mut best: Option<&str> = None;
        for alias in self.aliases.keys() {
            if path.starts_with(alias.as_str()) && path[alias.len()..].starts_with('/') {
                if best.is_none_or(|current| alias.len() > current.len()) {
                    best = Some(alias);
                }
            }
        }
        match best {
            Some(alias) => {
                let target = &self.aliases[alias];
                let remainder = &path[alias.len()..];
                Cow::Owned(format!("{}{}", literal_head(target), remainder))
            }
            None => Cow::Borrowed(path),
        }
    }
}

/// The literal text of a pattern before its first placeholder, without a
/// trailing slash.
fn literal_head(pattern: &str) -> &str {
    let head = match pattern.find('{') {
        Some(at) => &pattern[..at],
        None => pattern,
    };
    head.trim_end_matches('/')
}
