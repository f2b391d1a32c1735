//! Comment stripping for embedded script text.
//!
//! The text is cut into [`Segment`]s: runs of plain code, quoted strings,
//! single-line comments and block comments.  Stripping keeps code and
//! strings verbatim and drops the comments.
//!
//! At each position the scanner tries, in order:
//!
//! 1. a double-quoted string,
//! 2. a single-quoted string,
//! 3. a `//` comment (up to, not including, the line terminator),
//! 4. a `/* … */` comment (non-greedy, may span lines).
//!
//! Because a string is recognised before any comment, `"// not a comment"`
//! stays intact, and a quote inside a comment never opens a string.
//! Unterminated strings and block comments are not errors; they simply run
//! to the end of the line (strings) or of the input (block comments).  On
//! the last line the two coincide: `"open // kept` keeps its tail, while a
//! `//` on the line after an unclosed string is a comment again.

use super::quote::{line_terminator_len, scan_quoted};
use super::span::Span;

// ── Segments ──────────────────────────────────────────────────────────────────

/// What a [`Segment`] of script text is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    Str,
    LineComment,
    BlockComment,
}

impl SegmentKind {
    pub fn is_comment(self) -> bool {
        matches!(self, SegmentKind::LineComment | SegmentKind::BlockComment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub span: Span,
}

/// Iterator over the segments of a script, in source order.
///
/// Segments are contiguous, non-empty and together cover the whole text.
#[derive(Debug, Clone)]
pub struct Segments<'t> {
    src: &'t [u8],
    pos: usize,
}

/// Cut `text` into code, string and comment segments.
pub fn segments(text: &str) -> Segments<'_> {
    Segments {
        src: text.as_bytes(),
        pos: 0,
    }
}

impl<'t> Segments<'t> {
    /// Which kind of non-code segment starts at `pos`, if any.
    fn special_at(&self, pos: usize) -> Option<SegmentKind> {
        match self.src.get(pos)? {
            b'"' | b'\'' => Some(SegmentKind::Str),
            b'/' => match self.src.get(pos + 1)? {
                b'/' => Some(SegmentKind::LineComment),
                b'*' => Some(SegmentKind::BlockComment),
                _ => None,
            },
            _ => None,
        }
    }

    fn line_comment_end(&self, start: usize) -> usize {
        let mut pos = start + 2;
        while pos < self.src.len() && line_terminator_len(self.src, pos).is_none() {
            pos += 1;
        }
        pos
    }

    fn block_comment_end(&self, start: usize) -> usize {
        let mut pos = start + 2;
        while pos + 1 < self.src.len() {
            if self.src[pos] == b'*' && self.src[pos + 1] == b'/' {
                return pos + 2;
            }
            pos += 1;
        }
        self.src.len()
    }
}

impl<'t> Iterator for Segments<'t> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let start = self.pos;
        if start >= self.src.len() {
            return None;
        }
        let (kind, end) = match self.special_at(start) {
            Some(SegmentKind::Str) => (SegmentKind::Str, scan_quoted(self.src, start).end()),
            Some(SegmentKind::LineComment) => {
                (SegmentKind::LineComment, self.line_comment_end(start))
            }
            Some(SegmentKind::BlockComment) => {
                (SegmentKind::BlockComment, self.block_comment_end(start))
            }
            Some(SegmentKind::Code) | None => {
                let mut pos = start + 1;
                while pos < self.src.len() && self.special_at(pos).is_none() {
                    pos += 1;
                }
                (SegmentKind::Code, pos)
            }
        };
        self.pos = end;
        Some(Segment {
            kind,
            span: Span::new(start, end),
        })
    }
}

// ── Stripping ─────────────────────────────────────────────────────────────────

/// Remove comments from `text`, keeping everything else verbatim.
///
/// The line terminator after a `//` comment is kept, so line structure
/// outside comments survives.  Stripping is idempotent.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut dropped = 0usize;
    for seg in segments(text) {
        if seg.kind.is_comment() {
            dropped += 1;
        } else {
            out.push_str(seg.span.slice(text));
        }
    }
    tracing::trace!(comments = dropped, before = text.len(), after = out.len(), "stripped script");
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
