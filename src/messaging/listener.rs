//! Listener model: identity, name patterns, capabilities.
//!
//! # Responsibilities
//! - Listener construction (pattern, priority, predicate, action)
//! - Name pattern matching (exact, `ns.*` prefix, `*` catch-all)
//! - The `ListenerAggregate` batch-registration capability
//!
//! # Design Decisions
//! - Actions and predicates are explicit `Arc<dyn Fn>` capabilities with
//!   typed signatures, not ad-hoc callables
//! - Ids are dispatcher-assigned and double as the FIFO tiebreak sequence
//! - Exact and wildcard listeners share one priority ordering at dispatch

use std::fmt;
use std::sync::Arc;

use super::dispatcher::MessageDispatcher;
use super::message::{Message, MessageError, MessageName, Response};

/// Listener priority. Higher runs first; ties resolve in attach order.
pub type Priority = i32;

/// Dispatcher-assigned listener identity, returned by `attach` and
/// consumed by `detach`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Action capability: invoked with the in-flight message and the
/// dispatcher, so actions may attach/detach listeners or emit nested
/// messages.
pub type Action = Arc<dyn Fn(&mut Message, &mut MessageDispatcher) -> Option<Response> + Send + Sync>;

/// Optional per-message condition checked before the action runs.
pub type Predicate = Arc<dyn Fn(&Message) -> bool + Send + Sync>;

/// What a listener subscribes to: one name, a dotted prefix, or all names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenerPattern {
    Exact(MessageName),
    Prefix(String),
    Any,
}

impl ListenerPattern {
    /// Parse a pattern string. `*` is only valid as a trailing segment:
    /// `routes.collect` (exact), `routes.*` (prefix), `*` (catch-all).
    pub fn parse(pattern: &str) -> Result<Self, MessageError> {
        if pattern == "*" {
            return Ok(Self::Any);
        }
        if let Some(prefix) = pattern.strip_suffix(".*") {
            if prefix.is_empty() || prefix.contains('*') {
                return Err(MessageError::InvalidPattern(pattern.to_string()));
            }
            return Ok(Self::Prefix(format!("{prefix}.")));
        }
        if pattern.contains('*') {
            return Err(MessageError::InvalidPattern(pattern.to_string()));
        }
        Ok(Self::Exact(MessageName::new(pattern)?))
    }

    pub fn matches(&self, name: &MessageName) -> bool {
        match self {
            Self::Exact(expected) => expected == name,
            Self::Prefix(prefix) => name.as_str().starts_with(prefix.as_str()),
            Self::Any => true,
        }
    }
}

impl fmt::Display for ListenerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name.as_str()),
            Self::Prefix(prefix) => write!(f, "{prefix}*"),
            Self::Any => f.write_str("*"),
        }
    }
}

/// A unit of interest: pattern + priority + optional predicate + action.
///
/// Ownership transfers to the dispatcher on attach; the returned
/// [`ListenerId`] is the only remaining handle.
pub struct Listener {
    pub(crate) pattern: ListenerPattern,
    pub(crate) priority: Priority,
    pub(crate) predicate: Option<Predicate>,
    pub(crate) action: Action,
}

impl Listener {
    pub fn new(
        pattern: ListenerPattern,
        priority: Priority,
        action: impl Fn(&mut Message, &mut MessageDispatcher) -> Option<Response> + Send + Sync + 'static,
    ) -> Self {
        Self {
            pattern,
            priority,
            predicate: None,
            action: Arc::new(action),
        }
    }

    /// Convenience constructor for an exact-name listener.
    pub fn on(
        name: MessageName,
        priority: Priority,
        action: impl Fn(&mut Message, &mut MessageDispatcher) -> Option<Response> + Send + Sync + 'static,
    ) -> Self {
        Self::new(ListenerPattern::Exact(name), priority, action)
    }

    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&Message) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn pattern(&self) -> &ListenerPattern {
        &self.pattern
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("pattern", &self.pattern)
            .field("priority", &self.priority)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

/// Capability for components that batch-register listeners.
///
/// `attach_listeners` must have no side effect beyond attaching; callers
/// are responsible for invoking it once per dispatcher lifetime.
pub trait ListenerAggregate {
    fn attach_listeners(&self, dispatcher: &mut MessageDispatcher);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::message::names;

    #[test]
    fn test_pattern_parse_forms() {
        assert_eq!(ListenerPattern::parse("*").unwrap(), ListenerPattern::Any);
        assert_eq!(
            ListenerPattern::parse("routes.*").unwrap(),
            ListenerPattern::Prefix("routes.".to_string())
        );
        assert_eq!(
            ListenerPattern::parse("routes.collect").unwrap(),
            ListenerPattern::Exact(names::ROUTE_COLLECT)
        );
    }

    #[test]
    fn test_pattern_parse_rejects_inner_wildcard() {
        assert!(ListenerPattern::parse("rou*tes").is_err());
        assert!(ListenerPattern::parse("*.collect").is_err());
        assert!(ListenerPattern::parse(".*").is_err());
    }

    #[test]
    fn test_pattern_matching() {
        let exact = ListenerPattern::parse("routes.collect").unwrap();
        let prefix = ListenerPattern::parse("routes.*").unwrap();
        let any = ListenerPattern::parse("*").unwrap();

        assert!(exact.matches(&names::ROUTE_COLLECT));
        assert!(!exact.matches(&names::ROUTE_NOT_FOUND));

        assert!(prefix.matches(&names::ROUTE_COLLECT));
        assert!(prefix.matches(&names::ROUTE_NOT_FOUND));
        assert!(!prefix.matches(&MessageName::new("routing").unwrap()));

        assert!(any.matches(&names::ROUTE_COLLECT));
        assert!(any.matches(&MessageName::new("anything").unwrap()));
    }
}
