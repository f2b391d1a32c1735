//! Extraction requests.
//!
//! A request says *where* the literal is (a variable name or a locator
//! pattern), *which* match to take, and what to do about its type.  Requests
//! are validated once, when built, so scanning never starts on a request
//! that cannot be honoured.

use std::fmt;

use regex::Regex;

use super::error::{ExtractError, ExtractResult};
use super::quote::is_ident_char;
use super::value::{Kind, LiteralValue};

/// What an extraction searches for.
#[derive(Debug, Clone)]
pub enum Locator {
    /// Assignments of a (possibly dotted) variable name.
    Variable(String),
    /// Matches of a regex; the literal starts where a match ends.
    Pattern(Regex),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Variable(name) => f.write_str(name),
            Locator::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// A validated extraction request.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    locator: Locator,
    /// Zero-based index among all matches, in source order.
    pub occurrence: usize,
    /// Kind the decoded value must have.
    pub expected_kind: Option<Kind>,
    /// Returned instead of a value of the wrong kind.
    pub default: Option<LiteralValue>,
}

impl ExtractionRequest {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Request the first assignment of `name`.
    pub fn variable(name: &str) -> ExtractResult<Self> {
        Self::builder().variable(name).build()
    }

    /// Request the first literal following a match of `pattern`.
    pub fn pattern(pattern: &str) -> ExtractResult<Self> {
        Self::builder().pattern(pattern).build()
    }

    pub fn nth(mut self, occurrence: usize) -> Self {
        self.occurrence = occurrence;
        self
    }

    pub fn expect(mut self, kind: Kind) -> Self {
        self.expected_kind = Some(kind);
        self
    }

    pub fn or_default(mut self, value: impl Into<LiteralValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Human-readable name of what is looked for, used in errors.
    pub fn target(&self) -> String {
        self.locator.to_string()
    }
}

/// Collects request settings; [`RequestBuilder::build`] rejects
/// contradictory or malformed ones.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    variable: Option<String>,
    pattern: Option<String>,
    occurrence: usize,
    expected_kind: Option<Kind>,
    default: Option<LiteralValue>,
}

impl RequestBuilder {
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.variable = Some(name.into());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn nth(mut self, occurrence: usize) -> Self {
        self.occurrence = occurrence;
        self
    }

    pub fn expect(mut self, kind: Kind) -> Self {
        self.expected_kind = Some(kind);
        self
    }

    pub fn expect_opt(mut self, kind: Option<Kind>) -> Self {
        self.expected_kind = kind;
        self
    }

    pub fn or_default(mut self, value: impl Into<LiteralValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn default_opt(mut self, value: Option<LiteralValue>) -> Self {
        self.default = value;
        self
    }

    pub fn build(self) -> ExtractResult<ExtractionRequest> {
        let locator = match (self.variable, self.pattern) {
            (Some(_), Some(_)) => {
                return Err(ExtractError::ConflictingRequest(
                    "a variable name and a pattern are mutually exclusive".into(),
                ))
            }
            (None, None) => {
                return Err(ExtractError::ConflictingRequest(
                    "either a variable name or a pattern is required".into(),
                ))
            }
            (Some(name), None) => {
                check_variable_name(&name).map_err(ExtractError::ConflictingRequest)?;
                Locator::Variable(name)
            }
            (None, Some(pattern)) => {
                let re = Regex::new(&pattern).map_err(|e| {
                    ExtractError::ConflictingRequest(format!("invalid pattern: {e}"))
                })?;
                Locator::Pattern(re)
            }
        };
        Ok(ExtractionRequest {
            locator,
            occurrence: self.occurrence,
            expected_kind: self.expected_kind,
            default: self.default,
        })
    }
}

/// Check that `name` is an identifier, or identifiers joined by dots.
pub fn check_variable_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("variable name is empty".into());
    }
    for part in name.split('.') {
        let mut chars = part.chars();
        let valid = match chars.next() {
            Some(first) => {
                !first.is_ascii_digit() && is_ident_char(first) && chars.all(is_ident_char)
            }
            None => false,
        };
        if !valid {
            return Err(format!("{name:?} is not a valid variable name"));
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
