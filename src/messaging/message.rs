//! Message envelope, names, and parameters.
//!
//! # Responsibilities
//! - Validated message names and the framework's namespaced name constants
//! - Typed parameter values carried by a message
//! - Stop flag and response collector mutated during dispatch
//!
//! # Design Decisions
//! - Names are validated at construction; an empty name is rejected
//! - Parameters are a closed tagged variant, not open-ended dynamic values
//! - The envelope is immutable after construction except `stopped` and
//!   `responses`, which dispatch traversal mutates

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::{Method, RouteCollection};

/// Errors raised while constructing messages or listener patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Message names must be non-empty.
    #[error("message name must be non-empty")]
    EmptyName,

    /// Parameter keys must be non-empty strings.
    #[error("parameter key must be non-empty")]
    EmptyParamKey,

    /// Listener patterns support only trailing wildcards (`ns.*`, `*`).
    #[error("invalid listener pattern `{0}`: `*` is only valid as a trailing segment")]
    InvalidPattern(String),
}

/// A validated message name.
///
/// Names use dotted lowercase segments (`routes.collect`). The framework's
/// own names live in [`names`]; applications may mint their own with
/// [`MessageName::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageName(Cow<'static, str>);

impl MessageName {
    /// Create a name from a static string. Compile-time constant friendly.
    pub const fn from_static(name: &'static str) -> Self {
        assert!(!name.is_empty(), "message names must be non-empty");
        Self(Cow::Borrowed(name))
    }

    /// Create a name at runtime, validating that it is non-empty.
    pub fn new(name: impl Into<String>) -> Result<Self, MessageError> {
        let name = name.into();
        if name.is_empty() {
            return Err(MessageError::EmptyName);
        }
        Ok(Self(Cow::Owned(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Names owned by the messaging component.
///
/// Imported by value; there is no shared mutable name registry.
pub mod names {
    use super::MessageName;

    /// Boot round trip: listeners respond with route contributions.
    pub const ROUTE_COLLECT: MessageName = MessageName::from_static("routes.collect");

    /// Emitted after a request path matched no route.
    pub const ROUTE_NOT_FOUND: MessageName = MessageName::from_static("routes.not_found");

    /// Emitted after a path matched but the method was rejected.
    pub const METHOD_NOT_ALLOWED: MessageName = MessageName::from_static("routes.method_not_allowed");
}

/// Well-known parameter keys for the framework's own messages.
pub mod keys {
    /// Request path, on `routes.not_found` / `routes.method_not_allowed`.
    pub const PATH: &str = "path";

    /// Request method, on the same messages.
    pub const METHOD: &str = "method";

    /// Allowed-method union, on `routes.method_not_allowed`.
    pub const ALLOWED: &str = "allowed";
}

/// Identity of the component that emitted a message.
///
/// Compared by value; listeners use it for identity checks only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SenderId(String);

impl SenderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parameter value attached to a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Insertion-ordered parameter map with validated string keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, preserving first-insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) -> Result<(), MessageError> {
        let key = key.into();
        if key.is_empty() {
            return Err(MessageError::EmptyParamKey);
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A value returned by a listener action.
#[derive(Debug)]
pub enum Response {
    /// Routes contributed during the collect-routes round trip.
    Routes(RouteCollection),
    /// Structured data for application-level listeners.
    Value(ParamValue),
}

/// The envelope dispatched to listeners.
///
/// Created per dispatch call and dropped when dispatch returns. Only the
/// stop flag and the response collector change after construction.
#[derive(Debug)]
pub struct Message {
    name: MessageName,
    sender: Option<SenderId>,
    params: Params,
    stopped: bool,
    responses: Vec<Response>,
}

impl Message {
    pub fn new(name: MessageName) -> Self {
        Self {
            name,
            sender: None,
            params: Params::new(),
            stopped: false,
            responses: Vec::new(),
        }
    }

    pub fn with_sender(mut self, sender: SenderId) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Attach a parameter, validating the key.
    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: ParamValue,
    ) -> Result<Self, MessageError> {
        self.params.insert(key, value)?;
        Ok(self)
    }

    /// The boot-time collect-routes message.
    pub fn collect_routes() -> Self {
        Self::new(names::ROUTE_COLLECT)
    }

    /// Failure message for an unmatched request path.
    pub fn route_not_found(path: &str, method: Method) -> Self {
        let mut message = Self::new(names::ROUTE_NOT_FOUND);
        // Keys are non-empty constants; insertion cannot fail.
        let _ = message.params.insert(keys::PATH, ParamValue::Str(path.to_string()));
        let _ = message
            .params
            .insert(keys::METHOD, ParamValue::Str(method.to_string()));
        message
    }

    /// Failure message for a path whose routes rejected the method.
    pub fn method_not_allowed(path: &str, method: Method, allowed: &BTreeSet<Method>) -> Self {
        let mut message = Self::new(names::METHOD_NOT_ALLOWED);
        let _ = message.params.insert(keys::PATH, ParamValue::Str(path.to_string()));
        let _ = message
            .params
            .insert(keys::METHOD, ParamValue::Str(method.to_string()));
        let _ = message.params.insert(
            keys::ALLOWED,
            ParamValue::List(allowed.iter().map(Method::to_string).collect()),
        );
        message
    }

    pub fn name(&self) -> &MessageName {
        &self.name
    }

    pub fn sender(&self) -> Option<&SenderId> {
        self.sender.as_ref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Halt dispatch: no lower-priority listener sees this message.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn push_response(&mut self, response: Response) {
        self.responses.push(response);
    }

    /// Responses collected so far, in invocation order.
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Drain the collected responses out of the envelope.
    pub fn take_responses(&mut self) -> Vec<Response> {
        std::mem::take(&mut self.responses)
    }
}
