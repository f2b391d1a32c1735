//! jsvar: pull literal values out of scripts embedded in scraped pages.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`script`] | comment stripping, literal location and decoding |
//! | [`plan`] | extraction plan files (`/var`, `/pattern`, `/set`) |
//! | [`cli`] | command-line parsing for the `jsvar` binary |

pub mod cli;
pub mod plan;
pub mod script;

pub use script::{
    extract_variable, get_literal, strip_comments, ExtractError, ExtractionRequest, Kind,
    LiteralValue,
};
