//! Literal extraction from embedded page scripts.
//!
//! Scraped pages often carry their data in inline scripts rather than in the
//! markup (`var accountId = 1234;`).  This module pulls such values out
//! without evaluating any script:
//!
//! - [`strip_comments`] removes `//` and `/* */` comments while leaving
//!   quoted strings untouched,
//! - [`extract_all`] / [`extract`] find literal assignments of a variable
//!   (or literals following a locator pattern),
//! - [`decode`] turns the raw literal into a [`LiteralValue`],
//! - [`get_literal`] and [`extract_variable`] do all of it in one call.
//!
//! # Quick start
//!
//! ```rust
//! use jsvar::script::{extract_variable, strip_comments, LiteralValue};
//!
//! let page = "var total = 12.5; // old: total = 3\nvar label = 'Courant';";
//! let script = strip_comments(page);
//! assert_eq!(
//!     extract_variable(&script, "total", 0, None, None),
//!     Ok(LiteralValue::Float(12.5))
//! );
//! ```

pub mod decode;
pub mod error;
pub mod extract;
pub mod literal;
pub mod quote;
pub mod request;
pub mod span;
pub mod strip;
pub mod value;

// Re-exports for convenience.
pub use decode::{decode, parse_literal};
pub use error::{DecodeError, ExtractError, ExtractResult};
pub use extract::{extract_variable, get_literal};
pub use literal::{extract, extract_all, RawMatch};
pub use request::{ExtractionRequest, Locator, RequestBuilder};
pub use span::Span;
pub use strip::{segments, strip_comments, Segment, SegmentKind, Segments};
pub use value::{Kind, LiteralValue};
