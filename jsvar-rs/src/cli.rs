//! Command-line argument parsing.
//!
//! Usage:
//!   jsvar [-vr] -s [<file>]
//!   jsvar [-vr] [-n<nth>] [-t<kind>] [-d<default>] <name> [<file>]
//!   jsvar [-vr] [-n<nth>] [-t<kind>] [-d<default>] -p<regex> [<file>]
//!   jsvar [-vr] -f<plan> [<file>]

use std::io::Read;
use std::path::PathBuf;

use crate::script::{parse_literal, ExtractError, ExtractionRequest, Kind};

pub const USAGE: [&str; 4] = [
    "Usage: jsvar [-vr] -s [<file>]",
    "       jsvar [-vr] [-n<nth>] [-t<kind>] [-d<default>] <name> [<file>]",
    "       jsvar [-vr] [-n<nth>] [-t<kind>] [-d<default>] -p<regex> [<file>]",
    "       jsvar [-vr] -f<plan> [<file>]",
];

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug)]
pub struct CliArgs {
    pub mode: Mode,
    pub input: Input,
    /// Skip comment stripping before extraction (`-r`).
    pub raw: bool,
    /// Debug logging on stderr (`-v`).
    pub verbose: bool,
}

/// What to do with the script.
#[derive(Debug)]
pub enum Mode {
    /// Print the script without comments (`-s`).
    Strip,
    /// Extract a single literal.
    Extract(ExtractionRequest),
    /// Run every entry of a plan file (`-f<plan>`).
    Plan(PathBuf),
}

/// Where the script text comes from.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum Input {
    /// No file argument, or `-`.
    #[default]
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn read(&self) -> std::io::Result<String> {
        match self {
            Input::Stdin => {
                let mut s = String::new();
                std::io::stdin().read_to_string(&mut s)?;
                Ok(s)
            }
            Input::File(path) => std::fs::read_to_string(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_owned(),
            Input::File(path) => path.display().to_string(),
        }
    }
}

/// Error returned for unusable command lines.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Request(#[from] ExtractError),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()`.
pub fn parse_args() -> Result<CliArgs, CliError> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(&raw[1..])
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, CliError> {
    let mut strip = false;
    let mut raw = false;
    let mut verbose = false;
    let mut nth: Option<usize> = None;
    let mut kind: Option<Kind> = None;
    let mut default: Option<String> = None;
    let mut pattern: Option<String> = None;
    let mut plan: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            i += 1;
            positional.extend(argv[i..].iter().cloned());
            break;
        }

        // Non-flag argument (`-` alone means stdin).
        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                's' => strip = true,
                'r' => raw = true,
                'v' => verbose = true,

                c @ ('n' | 't' | 'd' | 'p' | 'f') => {
                    let value = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err(CliError::Usage(format!("-{c} requires an argument")));
                    };
                    match c {
                        'n' => {
                            let n = value.parse().map_err(|_| {
                                CliError::Usage(format!("invalid occurrence: {value}"))
                            })?;
                            nth = Some(n);
                        }
                        't' => {
                            kind = Some(value.parse().map_err(|e| CliError::Usage(format!("{e}")))?)
                        }
                        'd' => default = Some(value),
                        'p' => pattern = Some(value),
                        _ => plan = Some(PathBuf::from(value)),
                    }
                }

                c => return Err(CliError::Usage(format!("unknown option: -{c}"))),
            }
            j += 1;
        }
        i += 1;
    }

    let single_opts = nth.is_some() || kind.is_some() || default.is_some() || pattern.is_some();
    let mode = if strip || plan.is_some() {
        if strip && plan.is_some() {
            return Err(CliError::Usage("-s and -f cannot be combined".into()));
        }
        if single_opts {
            return Err(CliError::Usage(
                "-n, -t, -d and -p only apply to a single extraction".into(),
            ));
        }
        match plan {
            Some(path) => Mode::Plan(path),
            None => Mode::Strip,
        }
    } else {
        // With -p the name is optional, so a lone positional is the input.
        let name = match (&pattern, positional.len()) {
            (Some(_), 0 | 1) => None,
            _ if positional.is_empty() => {
                return Err(CliError::Usage("a variable name is required".into()))
            }
            _ => Some(positional.remove(0)),
        };
        let mut builder = ExtractionRequest::builder().nth(nth.unwrap_or(0)).expect_opt(kind);
        if let Some(name) = name {
            builder = builder.variable(name);
        }
        if let Some(pattern) = pattern {
            builder = builder.pattern(pattern);
        }
        if let Some(src) = default {
            let value = parse_literal(&src)
                .map_err(|e| CliError::Usage(format!("invalid default: {e}")))?;
            builder = builder.or_default(value);
        }
        Mode::Extract(builder.build()?)
    };

    let input = match positional.len() {
        0 => Input::Stdin,
        1 if positional[0] == "-" => Input::Stdin,
        1 => Input::File(PathBuf::from(positional.remove(0))),
        n => return Err(CliError::Usage(format!("too many arguments ({n})"))),
    };

    Ok(CliArgs {
        mode,
        input,
        raw,
        verbose,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{LiteralValue, Locator};

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|&s| s.to_owned()).collect()
    }

    fn request(a: &CliArgs) -> &ExtractionRequest {
        match &a.mode {
            Mode::Extract(r) => r,
            other => panic!("expected Extract, got {other:?}"),
        }
    }

    #[test]
    fn name_only_reads_stdin() {
        let a = parse_argv(&argv(&["test"])).unwrap();
        assert!(matches!(request(&a).locator(), Locator::Variable(n) if n == "test"));
        assert_eq!(a.input, Input::Stdin);
        assert!(!a.raw && !a.verbose);
    }

    #[test]
    fn name_and_file() {
        let a = parse_argv(&argv(&["test", "page.js"])).unwrap();
        assert_eq!(a.input, Input::File(PathBuf::from("page.js")));
    }

    #[test]
    fn dash_is_stdin() {
        let a = parse_argv(&argv(&["test", "-"])).unwrap();
        assert_eq!(a.input, Input::Stdin);
    }

    #[test]
    fn value_flags_embedded_and_separate() {
        let a = parse_argv(&argv(&["-n1", "-t", "int", "-d0", "test"])).unwrap();
        let r = request(&a);
        assert_eq!(r.occurrence, 1);
        assert_eq!(r.expected_kind, Some(Kind::Int));
        assert_eq!(r.default, Some(LiteralValue::Int(0)));
    }

    #[test]
    fn combined_bool_flags() {
        let a = parse_argv(&argv(&["-vr", "test"])).unwrap();
        assert!(a.verbose && a.raw);
    }

    #[test]
    fn strip_mode() {
        let a = parse_argv(&argv(&["-s", "page.js"])).unwrap();
        assert!(matches!(a.mode, Mode::Strip));
        assert_eq!(a.input, Input::File(PathBuf::from("page.js")));
    }

    #[test]
    fn plan_mode() {
        let a = parse_argv(&argv(&["-fplan.txt"])).unwrap();
        assert!(matches!(&a.mode, Mode::Plan(p) if p == &PathBuf::from("plan.txt")));
        assert_eq!(a.input, Input::Stdin);
    }

    #[test]
    fn pattern_mode() {
        let a = parse_argv(&argv(&["-p", r"x\s*=", "page.js"])).unwrap();
        assert!(matches!(request(&a).locator(), Locator::Pattern(_)));
        assert_eq!(a.input, Input::File(PathBuf::from("page.js")));
    }

    #[test]
    fn pattern_and_name_conflict() {
        let err = parse_argv(&argv(&["-px=", "test", "page.js"])).unwrap_err();
        assert!(matches!(err, CliError::Request(ExtractError::ConflictingRequest(_))));
    }

    #[test]
    fn strip_and_plan_conflict() {
        assert!(matches!(parse_argv(&argv(&["-s", "-fp"])), Err(CliError::Usage(_))));
    }

    #[test]
    fn single_options_rejected_in_strip_mode() {
        assert!(matches!(parse_argv(&argv(&["-s", "-n1"])), Err(CliError::Usage(_))));
    }

    #[test]
    fn missing_name() {
        assert!(matches!(parse_argv(&argv(&[])), Err(CliError::Usage(_))));
    }

    #[test]
    fn invalid_values() {
        assert!(parse_argv(&argv(&["-nx", "test"])).is_err());
        assert!(parse_argv(&argv(&["-tlist", "test"])).is_err());
        assert!(parse_argv(&argv(&["-d", "oops", "test"])).is_err());
        assert!(parse_argv(&argv(&["-n"])).is_err());
    }

    #[test]
    fn invalid_name() {
        let err = parse_argv(&argv(&["not-a-name"])).unwrap_err();
        assert!(matches!(err, CliError::Request(ExtractError::ConflictingRequest(_))));
    }

    #[test]
    fn too_many_positional() {
        assert!(parse_argv(&argv(&["a", "b", "c"])).is_err());
    }

    #[test]
    fn unknown_flag() {
        assert!(parse_argv(&argv(&["-z"])).is_err());
    }

    #[test]
    fn double_dash_ends_flags() {
        let a = parse_argv(&argv(&["test", "--", "-odd.js"])).unwrap();
        assert_eq!(a.input, Input::File(PathBuf::from("-odd.js")));
    }
}
