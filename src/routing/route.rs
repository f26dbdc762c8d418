//! Route model: HTTP methods, controller bindings, routable units.
//!
//! # Responsibilities
//! - Represent a single routable unit (pattern + method set + binding)
//! - Validate method sets at construction (explicit declaration required)
//! - Delegate path matching to the compiled pattern
//!
//! # Design Decisions
//! - Methods are a closed enum; sets are `BTreeSet` so allowed-method
//!   unions come out deduplicated in a stable order
//! - The controller binding is opaque: stored verbatim, never inspected

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pattern::{PathPattern, PatternError, Placeholder};

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse failure for a method string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown HTTP method `{0}`")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Methods are conventionally uppercase; accept any casing.
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "CONNECT" => Ok(Self::Connect),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            "PATCH" => Ok(Self::Patch),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// Opaque controller binding.
///
/// Returned verbatim on a successful match; the routing core never
/// interprets or invokes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerBinding(String);

impl ControllerBinding {
    pub fn new(binding: impl Into<String>) -> Self {
        Self(binding.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControllerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single routable unit.
///
/// Immutable after construction except the pattern's lazily built matcher
/// cache. Owned exclusively by its collection.
#[derive(Debug, Clone)]
pub struct Route {
    name: Option<String>,
    pattern: PathPattern,
    methods: BTreeSet<Method>,
    binding: ControllerBinding,
}

impl Route {
    /// Build a route. Fails at boot on a malformed pattern or an empty
    /// method set; no default method set is assumed.
    pub fn new(
        path: &str,
        methods: impl IntoIterator<Item = Method>,
        binding: ControllerBinding,
    ) -> Result<Self, PatternError> {
        let methods: BTreeSet<Method> = methods.into_iter().collect();
        if methods.is_empty() {
            return Err(PatternError::EmptyMethods {
                pattern: path.to_string(),
            });
        }
        let pattern = PathPattern::parse(path)?;
        Ok(Self {
            name: None,
            pattern,
            methods,
            binding,
        })
    }

    /// Attach an identifier used in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        self.pattern.placeholders()
    }

    pub fn methods(&self) -> &BTreeSet<Method> {
        &self.methods
    }

    pub fn binding(&self) -> &ControllerBinding {
        &self.binding
    }

    pub fn allows(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    /// Match a concrete path against this route's compiled pattern.
    pub fn match_path(&self, path: &str) -> Option<Vec<(String, String)>> {
        self.pattern.match_path(path)
    }
}
