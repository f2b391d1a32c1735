//! Quoted-string scanning shared by the stripper and the extractor.
//!
//! A quote preceded by an odd number of backslashes is escaped; an even
//! number (including zero) terminates the string.  Rather than counting
//! backslashes backwards from every quote, the scanner lets each backslash
//! consume the character after it, which yields the same parity.

/// Where a quoted string ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteEnd {
    /// Terminated by a matching quote; the offset is just past it.
    Closed(usize),
    /// No closing quote before an unescaped line terminator or end of input;
    /// the offset is where the string stops (the terminator is not included).
    Open(usize),
}

impl QuoteEnd {
    pub fn end(self) -> usize {
        match self {
            QuoteEnd::Closed(n) | QuoteEnd::Open(n) => n,
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, QuoteEnd::Closed(_))
    }
}

/// Scan the quoted string whose opening quote is `src[start]`.
pub fn scan_quoted(src: &[u8], start: usize) -> QuoteEnd {
    let quote = src[start];
    let mut pos = start + 1;
    while pos < src.len() {
        let b = src[pos];
        if b == quote {
            return QuoteEnd::Closed(pos + 1);
        }
        if b == b'\\' {
            pos += 1;
            // An escaped line terminator is a continuation, `\r\n` included.
            pos += line_terminator_len(src, pos).unwrap_or(1);
            continue;
        }
        if line_terminator_len(src, pos).is_some() {
            return QuoteEnd::Open(pos);
        }
        pos += 1;
    }
    QuoteEnd::Open(src.len())
}

/// Length in bytes of the line terminator starting at `pos`, if any.
///
/// Recognises `\n`, `\r\n`, a lone `\r`, U+2028 and U+2029.
pub fn line_terminator_len(src: &[u8], pos: usize) -> Option<usize> {
    match *src.get(pos)? {
        b'\n' => Some(1),
        b'\r' => Some(if src.get(pos + 1) == Some(&b'\n') { 2 } else { 1 }),
        0xE2 if src.get(pos + 1) == Some(&0x80)
            && matches!(src.get(pos + 2), Some(0xA8 | 0xA9)) =>
        {
            Some(3)
        }
        _ => None,
    }
}

/// Characters that may appear inside a script identifier.
pub fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

// ── Tests ─────────────────────────────────────────────────────────────────────
