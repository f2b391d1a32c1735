//! Failure taxonomy for extraction and decoding.

use super::value::Kind;

/// Why a matched literal could not be turned into a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed number {0:?}")]
    InvalidNumber(String),

    #[error("integer {0:?} does not fit in 64 bits")]
    IntOverflow(String),

    #[error("float {0:?} is out of range")]
    FloatOutOfRange(String),

    #[error("invalid escape at offset {offset}: {reason}")]
    InvalidEscape { offset: usize, reason: &'static str },

    #[error("{0:?} is not a literal")]
    NotALiteral(String),
}

/// Outcome of a failed extraction.
///
/// `target` names what was looked for: the variable name, or the locator
/// pattern wrapped in slashes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("{}", not_found_message(.target, .occurrence))]
    NotFound { target: String, occurrence: usize },

    #[error("variable {target} with type {expected} not found (found {found})")]
    TypeMismatch {
        target: String,
        expected: Kind,
        found: Kind,
    },

    #[error("unable to parse variable {target} value: {source}")]
    Decode {
        target: String,
        #[source]
        source: DecodeError,
    },

    #[error("conflicting request: {0}")]
    ConflictingRequest(String),
}

fn not_found_message(target: &str, occurrence: &usize) -> String {
    if *occurrence == 0 {
        format!("variable {target} not found")
    } else {
        format!("variable {target} not found (occurrence #{occurrence})")
    }
}

/// Convenience result type.
pub type ExtractResult<T> = Result<T, ExtractError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn not_found_messages() {
        let e = ExtractError::NotFound { target: "test".into(), occurrence: 0 };
        assert_eq!(e.to_string(), "variable test not found");
        let e = ExtractError::NotFound { target: "test".into(), occurrence: 2 };
        assert_eq!(e.to_string(), "variable test not found (occurrence #2)");
    }

    #[test]
    fn type_mismatch_message() {
        let e = ExtractError::TypeMismatch {
            target: "id".into(),
            expected: Kind::Int,
            found: Kind::Text,
        };
        assert_eq!(e.to_string(), "variable id with type int not found (found text)");
    }

    #[test]
    fn decode_error_is_source() {
        let e = ExtractError::Decode {
            target: "n".into(),
            source: DecodeError::IntOverflow("99999999999999999999".into()),
        };
        assert!(e.to_string().starts_with("unable to parse variable n value"));
        assert!(e.source().is_some());
    }
}
