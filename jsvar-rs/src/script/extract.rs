//! Extraction entry points: locate, decode, then check the kind.

use super::decode::decode;
use super::error::{ExtractError, ExtractResult};
use super::literal::extract;
use super::request::ExtractionRequest;
use super::value::{Kind, LiteralValue};

/// Run `request` against `text` as given; comments are not stripped here.
///
/// - no such occurrence: [`ExtractError::NotFound`], even when a default is
///   set;
/// - literal fails to decode: [`ExtractError::Decode`];
/// - decoded kind differs from `expected_kind`: the default if one is set,
///   otherwise [`ExtractError::TypeMismatch`].
pub fn get_literal(text: &str, request: &ExtractionRequest) -> ExtractResult<LiteralValue> {
    let raw = extract(text, request)?;
    let value = decode(&raw).map_err(|source| ExtractError::Decode {
        target: request.target(),
        source,
    })?;

    match request.expected_kind {
        Some(expected) if value.kind() != expected => match &request.default {
            Some(default) => {
                tracing::debug!(target_name = %request.locator(), %expected, found = %value.kind(), "kind mismatch, using default");
                Ok(default.clone())
            }
            None => Err(ExtractError::TypeMismatch {
                target: request.target(),
                expected,
                found: value.kind(),
            }),
        },
        _ => {
            tracing::debug!(target_name = %request.locator(), occurrence = request.occurrence, kind = %value.kind(), "extracted");
            Ok(value)
        }
    }
}

/// Extract occurrence `occurrence` of the assignment to `name`.
///
/// Shorthand for building an [`ExtractionRequest`] and calling
/// [`get_literal`]; an invalid `name` is a
/// [`ExtractError::ConflictingRequest`].
pub fn extract_variable(
    text: &str,
    name: &str,
    occurrence: usize,
    expected_kind: Option<Kind>,
    default: Option<LiteralValue>,
) -> ExtractResult<LiteralValue> {
    let request = ExtractionRequest::builder()
        .variable(name)
        .nth(occurrence)
        .expect_opt(expected_kind)
        .default_opt(default)
        .build()?;
    get_literal(text, &request)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
