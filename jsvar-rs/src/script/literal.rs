//! Locating literal assignments in script text.
//!
//! An assignment is recognised as
//!
//! ```text
//! [var|let|const <ws>] <name> <ws>? = <ws>? <literal>
//! ```
//!
//! where `<name>` must start at a word boundary and `<literal>` is the first
//! of these alternatives that matches, tried in order:
//!
//! | # | Kind  | Shape |
//! |---|-------|-------|
//! | 1 | Float | `[+-] ws? (d+.d* \| d*.d+) exp?` or `[+-] ws? d+ exp` |
//! | 2 | Int   | `[+-] ws? (0x h+ \| 0o o+ \| 0b b+ \| d+)` |
//! | 3 | Text  | `(new String( ws?)? "…"` or `'…'`, closing `)` optional |
//! | 4 | Bool  | `true` / `false` |
//! | 5 | Null  | `null` |
//!
//! `exp` is `e`/`E`, an optional sign, then digits.  The sign is accepted on
//! purpose, so `1e-5` is the float `0.00001` rather than the int `1`.
//!
//! `exp` is `e`/`E`, an optional sign, then digits.  Accepting the sign is a
//! deliberate widening of the plain `e` + digits form: `1e-5` is the float
//! `0.00001`, not the int `1` followed by junk.
//!
//! The order matters: `1.5` is tried as a float before the int matcher can
//! claim its `1`.  Every non-overlapping assignment is collected before one
//! is selected, so the occurrence index never depends on how the scan is
//! performed.

use aho_corasick::AhoCorasick;
use regex::Regex;

use super::error::{ExtractError, ExtractResult};
use super::quote::{is_ident_char, scan_quoted};
use super::request::{ExtractionRequest, Locator};
use super::span::Span;
use super::value::Kind;

// ── Raw matches ───────────────────────────────────────────────────────────────

/// An undecoded literal found in a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMatch<'t> {
    text: &'t str,
    /// The whole assignment (or locator match) through the end of the literal.
    pub span: Span,
    /// The literal itself.  For strings this is the quoted part only, without
    /// any `new String(` wrapper.
    pub literal: Span,
    /// Syntactic kind of the literal.
    pub kind: Kind,
    /// Whether the string was wrapped in `new String(…)`.
    pub wrapped: bool,
}

impl<'t> RawMatch<'t> {
    /// The literal's source text.
    pub fn raw(&self) -> &'t str {
        self.literal.slice(self.text)
    }

    /// The full matched source text.
    pub fn matched(&self) -> &'t str {
        self.span.slice(self.text)
    }
}

/// A literal recognised at some position, before it is tied to a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LiteralMatch {
    pub literal: Span,
    /// End of everything consumed, including a wrapper's closing paren.
    pub end: usize,
    pub kind: Kind,
    pub wrapped: bool,
}

// ── Literal matchers ──────────────────────────────────────────────────────────

type Matcher = fn(&str, usize) -> Option<LiteralMatch>;

/// The literal alternatives, in priority order.
const MATCHERS: [Matcher; 5] = [match_float, match_int, match_string, match_bool, match_null];

/// Match a literal starting exactly at `pos`.
pub(crate) fn match_literal(text: &str, pos: usize) -> Option<LiteralMatch> {
    if pos >= text.len() {
        return None;
    }
    MATCHERS.iter().find_map(|m| m(text, pos))
}

fn simple(start: usize, end: usize, kind: Kind) -> LiteralMatch {
    LiteralMatch {
        literal: Span::new(start, end),
        end,
        kind,
        wrapped: false,
    }
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

pub(crate) fn skip_ws(src: &[u8], mut pos: usize) -> usize {
    while pos < src.len() && is_space(src[pos]) {
        pos += 1;
    }
    pos
}

fn skip_digits(src: &[u8], mut pos: usize, radix: u32) -> usize {
    while pos < src.len() && (src[pos] as char).is_digit(radix) {
        pos += 1;
    }
    pos
}

/// Skip an optional sign and the whitespace that may follow it.
fn skip_sign(src: &[u8], mut pos: usize) -> usize {
    if matches!(src.get(pos), Some(b'+' | b'-')) {
        pos += 1;
    }
    skip_ws(src, pos)
}

/// `e`/`E`, optional sign, at least one digit.
fn skip_exponent(src: &[u8], pos: usize) -> Option<usize> {
    if !matches!(src.get(pos), Some(b'e' | b'E')) {
        return None;
    }
    let mut p = pos + 1;
    if matches!(src.get(p), Some(b'+' | b'-')) {
        p += 1;
    }
    let end = skip_digits(src, p, 10);
    (end > p).then_some(end)
}

fn match_float(text: &str, start: usize) -> Option<LiteralMatch> {
    let src = text.as_bytes();
    let p = skip_sign(src, start);
    let int_end = skip_digits(src, p, 10);
    let end = if src.get(int_end) == Some(&b'.') {
        let frac_end = skip_digits(src, int_end + 1, 10);
        if int_end == p && frac_end == int_end + 1 {
            return None;
        }
        skip_exponent(src, frac_end).unwrap_or(frac_end)
    } else {
        if int_end == p {
            return None;
        }
        skip_exponent(src, int_end)?
    };
    Some(simple(start, end, Kind::Float))
}

fn match_int(text: &str, start: usize) -> Option<LiteralMatch> {
    let src = text.as_bytes();
    let p = skip_sign(src, start);
    if src.get(p) == Some(&b'0') {
        if let Some(radix) = src.get(p + 1).and_then(|&b| radix_for_prefix(b)) {
            let end = skip_digits(src, p + 2, radix);
            if end > p + 2 {
                return Some(simple(start, end, Kind::Int));
            }
        }
    }
    let end = skip_digits(src, p, 10);
    (end > p).then(|| simple(start, end, Kind::Int))
}

/// Radix selected by the letter after a leading `0`.
pub(crate) fn radix_for_prefix(b: u8) -> Option<u32> {
    match b {
        b'x' | b'X' => Some(16),
        b'o' | b'O' => Some(8),
        b'b' | b'B' => Some(2),
        _ => None,
    }
}

/// End of `new String(` plus trailing whitespace, if it starts at `pos`.
fn skip_string_wrapper(src: &[u8], pos: usize) -> Option<usize> {
    let rest = src.get(pos..)?;
    if !rest.starts_with(b"new") {
        return None;
    }
    let p = pos + 3;
    let after_ws = skip_ws(src, p);
    if after_ws == p || !src[after_ws..].starts_with(b"String") {
        return None;
    }
    let p = skip_ws(src, after_ws + 6);
    if src.get(p) != Some(&b'(') {
        return None;
    }
    Some(skip_ws(src, p + 1))
}

fn match_string(text: &str, start: usize) -> Option<LiteralMatch> {
    let src = text.as_bytes();
    let (quote_pos, wrapped) = match skip_string_wrapper(src, start) {
        Some(p) => (p, true),
        None => (start, false),
    };
    if !matches!(src.get(quote_pos), Some(b'"' | b'\'')) {
        return None;
    }
    let quoted = scan_quoted(src, quote_pos);
    if !quoted.is_closed() {
        return None;
    }
    let lit_end = quoted.end();
    let mut end = lit_end;
    if wrapped {
        let p = skip_ws(src, lit_end);
        if src.get(p) == Some(&b')') {
            end = p + 1;
        }
    }
    Some(LiteralMatch {
        literal: Span::new(quote_pos, lit_end),
        end,
        kind: Kind::Text,
        wrapped,
    })
}

fn match_keyword(text: &str, start: usize, keyword: &str, kind: Kind) -> Option<LiteralMatch> {
    let end = start + keyword.len();
    if !text[start..].starts_with(keyword) {
        return None;
    }
    match text[end..].chars().next() {
        Some(c) if is_ident_char(c) => None,
        _ => Some(simple(start, end, kind)),
    }
}

fn match_bool(text: &str, start: usize) -> Option<LiteralMatch> {
    match_keyword(text, start, "true", Kind::Bool)
        .or_else(|| match_keyword(text, start, "false", Kind::Bool))
}

fn match_null(text: &str, start: usize) -> Option<LiteralMatch> {
    match_keyword(text, start, "null", Kind::Null)
}

// ── Assignment search ─────────────────────────────────────────────────────────

const DECLARATION_KEYWORDS: [&str; 3] = ["var", "let", "const"];

fn at_word_start(text: &str, pos: usize) -> bool {
    text[..pos]
        .chars()
        .next_back()
        .map_or(true, |c| !is_ident_char(c))
}

/// Start of a declaration keyword directly preceding the name at `name_start`.
fn declaration_start(text: &str, name_start: usize, floor: usize) -> Option<usize> {
    let src = text.as_bytes();
    let mut p = name_start;
    while p > floor && is_space(src[p - 1]) {
        p -= 1;
    }
    if p == name_start {
        return None;
    }
    let head = &text[floor..p];
    DECLARATION_KEYWORDS
        .iter()
        .filter(|kw| head.ends_with(*kw))
        .map(|kw| p - kw.len())
        .find(|&kw_start| at_word_start(text, kw_start))
}

fn find_assignments<'t>(text: &'t str, name: &str) -> Vec<RawMatch<'t>> {
    let src = text.as_bytes();
    let finder = AhoCorasick::new([name]);
    let mut found = Vec::new();
    let mut resume = 0;

    // Overlapping, so a rejected candidate never hides one that starts
    // inside it (`a.a` in `a.a.a = 1`).
    for m in finder.find_overlapping_iter(text) {
        if m.start() < resume || !at_word_start(text, m.start()) {
            continue;
        }
        let eq = skip_ws(src, m.end());
        if src.get(eq) != Some(&b'=') {
            continue;
        }
        let Some(lit) = match_literal(text, skip_ws(src, eq + 1)) else {
            continue;
        };
        let start = declaration_start(text, m.start(), resume).unwrap_or(m.start());
        tracing::trace!(name, start, end = lit.end, kind = %lit.kind, "assignment");
        found.push(RawMatch {
            text,
            span: Span::new(start, lit.end),
            literal: lit.literal,
            kind: lit.kind,
            wrapped: lit.wrapped,
        });
        resume = lit.end;
    }
    found
}

fn find_after_pattern<'t>(text: &'t str, re: &Regex) -> Vec<RawMatch<'t>> {
    let src = text.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(m) = re.find_at(text, pos) else {
            break;
        };
        match match_literal(text, skip_ws(src, m.end())) {
            Some(lit) => {
                tracing::trace!(pattern = re.as_str(), start = m.start(), end = lit.end, kind = %lit.kind, "pattern match");
                found.push(RawMatch {
                    text,
                    span: Span::new(m.start(), lit.end),
                    literal: lit.literal,
                    kind: lit.kind,
                    wrapped: lit.wrapped,
                });
                pos = lit.end;
            }
            None if m.end() > m.start() => pos = m.end(),
            None => {
                // Empty match without a literal: step over one char.
                pos = m.end() + text[m.end()..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    found
}

/// Every non-overlapping literal located by `locator`, in source order.
pub fn extract_all<'t>(text: &'t str, locator: &Locator) -> Vec<RawMatch<'t>> {
    match locator {
        Locator::Variable(name) => find_assignments(text, name),
        Locator::Pattern(re) => find_after_pattern(text, re),
    }
}

/// The match selected by `request.occurrence`, or `NotFound`.
pub fn extract<'t>(text: &'t str, request: &ExtractionRequest) -> ExtractResult<RawMatch<'t>> {
    let all = extract_all(text, request.locator());
    let total = all.len();
    all.into_iter()
        .nth(request.occurrence)
        .ok_or_else(|| {
            tracing::debug!(target_name = %request.locator(), occurrence = request.occurrence, total, "no such occurrence");
            ExtractError::NotFound {
                target: request.target(),
                occurrence: request.occurrence,
            }
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
