//! Turning raw literal text into [`LiteralValue`]s.
//!
//! Numbers follow the usual literal rules: ints are base-aware (`0x`, `0o`,
//! `0b`) and must fit in an `i64`; floats must be finite.  A whitespace gap
//! between a sign and its digits (`- 5`) is accepted, as the matcher allows it.
//!
//! String escapes understood:
//!
//! | Escape | Meaning |
//! |--------|---------|
//! | `\n` `\r` `\t` `\b` `\f` `\v` | control characters |
//! | `\0`, `\NNN` | legacy octal, up to `\377` |
//! | `\xHH` | code point `HH` |
//! | `\uHHHH` | UTF-16 unit; surrogate pairs are combined |
//! | `\u{H…}` | code point, 1 to 6 hex digits |
//! | `\` + line terminator | line continuation, produces nothing |
//! | `\` + anything else | that character |

use std::num::IntErrorKind;

use super::error::DecodeError;
use super::literal::{match_literal, radix_for_prefix, RawMatch};
use super::value::{Kind, LiteralValue};

/// Decode a raw literal found by the extractor.
pub fn decode(raw: &RawMatch<'_>) -> Result<LiteralValue, DecodeError> {
    decode_raw(raw.kind, raw.raw())
}

/// Decode a standalone literal such as `42`, `'text'` or `null`.
///
/// Surrounding whitespace is ignored; anything else around the literal makes
/// it [`DecodeError::NotALiteral`].
pub fn parse_literal(src: &str) -> Result<LiteralValue, DecodeError> {
    let trimmed = src.trim();
    match match_literal(trimmed, 0) {
        Some(m) if m.end == trimmed.len() => decode_raw(m.kind, m.literal.slice(trimmed)),
        _ => Err(DecodeError::NotALiteral(src.to_owned())),
    }
}

pub(crate) fn decode_raw(kind: Kind, raw: &str) -> Result<LiteralValue, DecodeError> {
    match kind {
        Kind::Float => decode_float(raw),
        Kind::Int => decode_int(raw),
        Kind::Text => decode_string(raw).map(LiteralValue::Text),
        Kind::Bool => match raw {
            "true" => Ok(LiteralValue::Bool(true)),
            "false" => Ok(LiteralValue::Bool(false)),
            _ => Err(DecodeError::NotALiteral(raw.to_owned())),
        },
        Kind::Null if raw == "null" => Ok(LiteralValue::Null),
        Kind::Null => Err(DecodeError::NotALiteral(raw.to_owned())),
    }
}

// ── Numbers ───────────────────────────────────────────────────────────────────

fn without_whitespace(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

fn decode_float(raw: &str) -> Result<LiteralValue, DecodeError> {
    let s = without_whitespace(raw);
    let x: f64 = s
        .parse()
        .map_err(|_| DecodeError::InvalidNumber(raw.to_owned()))?;
    if !x.is_finite() {
        return Err(DecodeError::FloatOutOfRange(raw.to_owned()));
    }
    Ok(LiteralValue::Float(x))
}

fn decode_int(raw: &str) -> Result<LiteralValue, DecodeError> {
    let s = without_whitespace(raw);
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s.as_str()),
    };
    let bytes = body.as_bytes();
    let (radix, digits) = match (bytes.first(), bytes.get(1).and_then(|&b| radix_for_prefix(b))) {
        (Some(b'0'), Some(radix)) => (radix, &body[2..]),
        _ => (10, body),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(DecodeError::InvalidNumber(raw.to_owned()));
    }
    // Parse with the sign attached so i64::MIN is representable.
    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_owned()
    };
    i64::from_str_radix(&signed, radix)
        .map(LiteralValue::Int)
        .map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                DecodeError::IntOverflow(raw.to_owned())
            }
            _ => DecodeError::InvalidNumber(raw.to_owned()),
        })
}

// ── Strings ───────────────────────────────────────────────────────────────────

fn decode_string(raw: &str) -> Result<String, DecodeError> {
    let quoted = raw.len() >= 2
        && matches!(raw.as_bytes()[0], b'"' | b'\'')
        && raw.as_bytes()[raw.len() - 1] == raw.as_bytes()[0];
    if !quoted {
        return Err(DecodeError::NotALiteral(raw.to_owned()));
    }
    unescape(&raw[1..raw.len() - 1], 1)
}

/// Resolve backslash escapes in `body`.  `base` is added to error offsets.
fn unescape(body: &str, base: usize) -> Result<String, DecodeError> {
    let src = body.as_bytes();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;

    while i < src.len() {
        let Some(rel) = body[i..].find('\\') else {
            out.push_str(&body[i..]);
            break;
        };
        out.push_str(&body[i..i + rel]);
        let at = i + rel;
        let err = |reason: &'static str| DecodeError::InvalidEscape {
            offset: base + at,
            reason,
        };
        let Some(&e) = src.get(at + 1) else {
            return Err(err("trailing backslash"));
        };
        i = at + 2;

        match e {
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'b' => out.push('\u{8}'),
            b'f' => out.push('\u{c}'),
            b'v' => out.push('\u{b}'),
            b'0'..=b'7' => {
                let mut value = u32::from(e - b'0');
                for _ in 0..2 {
                    let next = match src.get(i) {
                        Some(&d) if (b'0'..=b'7').contains(&d) => value * 8 + u32::from(d - b'0'),
                        _ => break,
                    };
                    if next > 0o377 {
                        break;
                    }
                    value = next;
                    i += 1;
                }
                out.push(char::from(value as u8));
            }
            b'x' => {
                let value = hex_at(src, i, 2).ok_or_else(|| err("\\x needs two hex digits"))?;
                out.push(char::from(value as u8));
                i += 2;
            }
            b'u' => {
                let (ch, next) = unicode_escape(src, i).map_err(err)?;
                out.push(ch);
                i = next;
            }
            b'\r' => {
                if src.get(i) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => {}
            _ => {
                let ch = body[at + 1..].chars().next().unwrap_or('\\');
                if ch != '\u{2028}' && ch != '\u{2029}' {
                    out.push(ch);
                }
                i = at + 1 + ch.len_utf8();
            }
        }
    }
    Ok(out)
}

fn hex_value(digits: &[u8]) -> Option<u32> {
    digits
        .iter()
        .try_fold(0u32, |acc, &b| Some(acc * 16 + (b as char).to_digit(16)?))
}

/// Exactly `n` hex digits at `pos`.
fn hex_at(src: &[u8], pos: usize, n: usize) -> Option<u32> {
    hex_value(src.get(pos..pos + n)?)
}

/// Decode what follows `\u` at `pos`; returns the char and the next offset.
fn unicode_escape(src: &[u8], pos: usize) -> Result<(char, usize), &'static str> {
    if src.get(pos) == Some(&b'{') {
        let close = src[pos + 1..]
            .iter()
            .position(|&b| b == b'}')
            .ok_or("unterminated \\u{…} escape")?;
        let digits = &src[pos + 1..pos + 1 + close];
        if digits.is_empty() || digits.len() > 6 {
            return Err("\\u{…} needs 1 to 6 hex digits");
        }
        let value = hex_value(digits).ok_or("\\u{…} needs hex digits")?;
        let ch = char::from_u32(value).ok_or("not a Unicode scalar value")?;
        return Ok((ch, pos + close + 2));
    }

    let unit = hex_at(src, pos, 4).ok_or("\\u needs four hex digits")?;
    let next = pos + 4;
    match unit {
        0xD800..=0xDBFF => {
            if src.get(next..next + 2) == Some(&b"\\u"[..]) {
                if let Some(low @ 0xDC00..=0xDFFF) = hex_at(src, next + 2, 4) {
                    let value = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    let ch = char::from_u32(value).ok_or("not a Unicode scalar value")?;
                    return Ok((ch, next + 6));
                }
            }
            Err("unpaired surrogate")
        }
        0xDC00..=0xDFFF => Err("unpaired surrogate"),
        _ => char::from_u32(unit)
            .map(|ch| (ch, next))
            .ok_or("not a Unicode scalar value"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
