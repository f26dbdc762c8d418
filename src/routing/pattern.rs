//! Path pattern tokenizer and compiler.
//!
//! # Responsibilities
//! - Tokenize `{name}` / `{name:regex}` placeholders out of literal path text
//! - Validate placeholder names, uniqueness, and constraint regexes
//! - Assemble one anchored matcher with named captures
//! - Memoize compilation: at most once per pattern per process lifetime
//!
//! # Design Decisions
//! - Literal text is regex-escaped, so patterns stay safe against
//!   metacharacters in configured paths
//! - A placeholder without a constraint matches one or more non-slash
//!   characters
//! - All validation happens at construction; pattern errors are boot-time
//!   failures, never request-time surprises

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Default constraint: one or more non-slash characters.
const DEFAULT_CONSTRAINT: &str = "[^/]+";

/// Boot-time pattern compilation errors.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A `{` was never closed.
    #[error("unclosed placeholder in pattern `{pattern}`")]
    UnclosedPlaceholder { pattern: String },

    /// A `}` appeared outside any placeholder.
    #[error("unbalanced `}}` in pattern `{pattern}`")]
    UnbalancedBrace { pattern: String },

    /// `{}` or `{:regex}`.
    #[error("empty placeholder name in pattern `{pattern}`")]
    EmptyName { pattern: String },

    /// Placeholder names must be identifiers so they can become regex
    /// capture-group names.
    #[error("invalid placeholder name `{name}` in pattern `{pattern}`")]
    InvalidName { pattern: String, name: String },

    /// Placeholder names are unique within one pattern.
    #[error("duplicate placeholder `{name}` in pattern `{pattern}`")]
    DuplicateName { pattern: String, name: String },

    /// The explicit regex constraint failed to compile.
    #[error("invalid constraint for placeholder `{name}` in pattern `{pattern}`: {source}")]
    InvalidConstraint {
        pattern: String,
        name: String,
        #[source]
        source: regex::Error,
    },

    /// Routes must declare at least one method explicitly.
    #[error("route `{pattern}` declares no methods")]
    EmptyMethods { pattern: String },
}

/// A named, optionally regex-constrained segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub constraint: Option<String>,
}

/// One tokenized piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    /// Index into the placeholder list.
    Placeholder(usize),
}

/// A compiled path pattern.
///
/// Tokenized and validated eagerly; the anchored regex is built lazily on
/// first match and cached for the lifetime of the pattern.
#[derive(Debug)]
pub struct PathPattern {
    raw: String,
    tokens: Vec<Token>,
    placeholders: Vec<Placeholder>,
    regex_source: String,
    compiled: OnceLock<Regex>,
}

impl Clone for PathPattern {
    fn clone(&self) -> Self {
        let compiled = OnceLock::new();
        // Carry the memoized matcher over instead of recompiling later.
        if let Some(regex) = self.compiled.get() {
            let _ = compiled.set(regex.clone());
        }
        Self {
            raw: self.raw.clone(),
            tokens: self.tokens.clone(),
            placeholders: self.placeholders.clone(),
            regex_source: self.regex_source.clone(),
            compiled,
        }
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PathPattern {
    /// Tokenize and validate a pattern.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let (tokens, placeholders) = tokenize(raw)?;

        for (index, placeholder) in placeholders.iter().enumerate() {
            if placeholders[..index]
                .iter()
                .any(|earlier| earlier.name == placeholder.name)
            {
                return Err(PatternError::DuplicateName {
                    pattern: raw.to_string(),
                    name: placeholder.name.clone(),
                });
            }
            if let Some(constraint) = &placeholder.constraint {
                // Test-compile so bad constraints fail at boot.
                Regex::new(constraint).map_err(|source| PatternError::InvalidConstraint {
                    pattern: raw.to_string(),
                    name: placeholder.name.clone(),
                    source,
                })?;
            }
        }

        let regex_source = assemble(&tokens, &placeholders);

        Ok(Self {
            raw: raw.to_string(),
            tokens,
            placeholders,
            regex_source,
            compiled: OnceLock::new(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholders in declaration order.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// The memoized anchored matcher.
    fn matcher(&self) -> &Regex {
        self.compiled.get_or_init(|| {
            // Literals are escaped and constraints compiled during parse.
            Regex::new(&self.regex_source).expect("pattern validated at construction")
        })
    }

    /// Match a concrete path, extracting placeholder values in
    /// declaration order. `None` means no match.
    pub fn match_path(&self, path: &str) -> Option<Vec<(String, String)>> {
        let captures = self.matcher().captures(path)?;
        Some(
            self.placeholders
                .iter()
                .map(|placeholder| {
                    let value = captures
                        .name(&placeholder.name)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default();
                    (placeholder.name.clone(), value)
                })
                .collect(),
        )
    }
}

/// Split a raw pattern into literal and placeholder tokens.
fn tokenize(raw: &str) -> Result<(Vec<Token>, Vec<Placeholder>), PatternError> {
    let mut tokens = Vec::new();
    let mut placeholders = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                let placeholder = read_placeholder(raw, &mut chars)?;
                tokens.push(Token::Placeholder(placeholders.len()));
                placeholders.push(placeholder);
            }
            '}' => {
                return Err(PatternError::UnbalancedBrace {
                    pattern: raw.to_string(),
                })
            }
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }

    Ok((tokens, placeholders))
}

/// Read one placeholder body after its opening `{`.
fn read_placeholder(raw: &str, chars: &mut std::str::Chars<'_>) -> Result<Placeholder, PatternError> {
    let mut name = String::new();
    let mut constraint = None;
    let mut closed = false;

    while let Some(c) = chars.next() {
        match c {
            '}' => {
                closed = true;
                break;
            }
            ':' => {
                constraint = Some(read_constraint(raw, chars)?);
                closed = true;
                break;
            }
            _ => name.push(c),
        }
    }
    if !closed {
        return Err(PatternError::UnclosedPlaceholder {
            pattern: raw.to_string(),
        });
    }

    if name.is_empty() {
        return Err(PatternError::EmptyName {
            pattern: raw.to_string(),
        });
    }
    let mut name_chars = name.chars();
    let head_valid = name_chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !head_valid || !name_chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PatternError::InvalidName {
            pattern: raw.to_string(),
            name,
        });
    }

    Ok(Placeholder { name, constraint })
}

/// Read a regex constraint up to the placeholder's closing `}`.
///
/// Braces nest: repetition counts like `[0-9]{1,3}` belong to the
/// constraint, so the placeholder only closes when the depth returns to
/// zero.
fn read_constraint(raw: &str, chars: &mut std::str::Chars<'_>) -> Result<String, PatternError> {
    let mut constraint = String::new();
    let mut depth = 1usize;

    for c in chars.by_ref() {
        match c {
            '{' => {
                depth += 1;
                constraint.push(c);
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(constraint);
                }
                constraint.push(c);
            }
            _ => constraint.push(c),
        }
    }
    Err(PatternError::UnclosedPlaceholder {
        pattern: raw.to_string(),
    })
}

/// Assemble the anchored regex source from validated tokens.
fn assemble(tokens: &[Token], placeholders: &[Placeholder]) -> String {
    let mut source = String::from("^");
    for token in tokens {
        match token {
            Token::Literal(text) => source.push_str(&regex::escape(text)),
            Token::Placeholder(index) => {
                let placeholder = &placeholders[*index];
                let constraint = placeholder
                    .constraint
                    .as_deref()
                    .unwrap_or(DEFAULT_CONSTRAINT);
                source.push_str(&format!("(?P<{}>{})", placeholder.name, constraint));
            }
        }
    }
    source.push('$');
    source
}
