//! Extraction plan files.
//!
//! A plan lists the values to pull out of one page script, one directive per
//! line:
//!
//! | Directive | Action |
//! |-----------|--------|
//! | `/var [-n<nth>] [-t<kind>] [-d<default>] [-a<label>] <name>` | extract a variable |
//! | `/pattern [-n<nth>] [-t<kind>] [-d<default>] [-a<label>] <regex>` | extract the literal after a regex match |
//! | `/set strip=on\|off` | strip comments first (default on) |
//! | `/set optional=on\|off` | drop entries that are not found (default off) |
//! | Lines starting with `;` | comment, ignored |
//! | Any other `/command` | silently skipped |
//!
//! ```text
//! ;; account page
//! /var -tint accountId
//! /var -n1 -a previous_balance balance
//! /pattern -a currency -d'EUR' "data\[\"cur\"\]\s*="
//! ```

use std::path::Path;

use crate::script::{
    get_literal, parse_literal, strip_comments, ExtractError, ExtractResult, ExtractionRequest,
    Kind, LiteralValue,
};

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct PlanError {
    pub line: usize,
    pub message: String,
}

/// One extraction in a plan.
#[derive(Debug, Clone)]
pub struct PlanEntry {
    /// Name printed next to the value.
    pub label: String,
    pub request: ExtractionRequest,
}

/// A parsed extraction plan.
#[derive(Debug, Clone)]
pub struct Plan {
    pub entries: Vec<PlanEntry>,
    /// Strip comments before extracting.
    pub strip: bool,
    /// Leave out entries whose variable is not found instead of failing.
    pub optional: bool,
}

impl Default for Plan {
    fn default() -> Self {
        Plan {
            entries: Vec::new(),
            strip: true,
            optional: false,
        }
    }
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a plan string.
    ///
    /// Lines with errors are skipped and reported; the rest of the plan is
    /// still loaded.
    pub fn load_str(s: &str) -> (Self, Vec<PlanError>) {
        let mut plan = Plan::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let Some(rest) = line.strip_prefix('/') else { continue };

            let (cmd, args_str) = rest
                .split_once(|c: char| c.is_ascii_whitespace())
                .unwrap_or((rest, ""));
            let tokens = split_args(args_str.trim());

            let result = match cmd {
                "var" => parse_entry(&tokens, EntryKind::Variable).map(|e| plan.entries.push(e)),
                "pattern" => parse_entry(&tokens, EntryKind::Pattern).map(|e| plan.entries.push(e)),
                "set" => parse_set(&tokens, &mut plan),
                _ => Ok(()),
            };
            if let Err(message) = result {
                errors.push(PlanError { line: lineno, message });
            }
        }

        (plan, errors)
    }

    /// Read and parse a plan file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<PlanError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    /// Add an entry by hand.
    pub fn push(&mut self, label: impl Into<String>, request: ExtractionRequest) {
        self.entries.push(PlanEntry {
            label: label.into(),
            request,
        });
    }

    /// Run every entry against `script`, in plan order.
    pub fn run<'p>(&'p self, script: &str) -> Vec<(&'p str, ExtractResult<LiteralValue>)> {
        let stripped;
        let text = if self.strip {
            stripped = strip_comments(script);
            stripped.as_str()
        } else {
            script
        };

        self.entries
            .iter()
            .map(|e| (e.label.as_str(), get_literal(text, &e.request)))
            .filter(|(label, outcome)| {
                let skip = self.optional && matches!(outcome, Err(ExtractError::NotFound { .. }));
                if skip {
                    tracing::debug!(label, "optional entry not found");
                }
                !skip
            })
            .collect()
    }
}

// ── Argument tokenizer ────────────────────────────────────────────────────────

/// Split `s` into whitespace-delimited tokens, honouring double-quoted
/// strings.  Inside quotes `\"` is a literal quote; every other backslash is
/// kept as written so regexes survive.
fn split_args(s: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            '\\' if in_quotes && chars.peek() == Some(&'"') => {
                cur.push('"');
                chars.next();
            }
            c if c.is_ascii_whitespace() && !in_quotes => {
                if !cur.is_empty() || quoted {
                    args.push(std::mem::take(&mut cur));
                }
                quoted = false;
            }
            c => cur.push(c),
        }
    }
    if !cur.is_empty() || quoted {
        args.push(cur);
    }
    args
}

// ── /var and /pattern ─────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum EntryKind {
    Variable,
    Pattern,
}

/// Parse the flags and the single positional argument of `/var` or `/pattern`.
///
/// Value flags may be attached (`-n1`) or separated (`-n 1`); `--` ends the
/// flags, for patterns that start with a dash.
fn parse_entry(tokens: &[String], kind: EntryKind) -> Result<PlanEntry, String> {
    let cmd = match kind {
        EntryKind::Variable => "/var",
        EntryKind::Pattern => "/pattern",
    };
    let mut builder = ExtractionRequest::builder();
    let mut label: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    let mut flags_done = false;
    while i < tokens.len() {
        let tok = &tokens[i];
        i += 1;

        if flags_done || !tok.starts_with('-') || tok.len() == 1 {
            positional.push(tok.clone());
            continue;
        }
        if tok == "--" {
            flags_done = true;
            continue;
        }

        let flag = tok[1..].chars().next().unwrap_or('-');
        let inline = &tok[1 + flag.len_utf8()..];
        let value = if !inline.is_empty() {
            inline.to_owned()
        } else {
            let v = tokens
                .get(i)
                .ok_or_else(|| format!("{cmd}: -{flag} requires a value"))?;
            i += 1;
            v.clone()
        };

        match flag {
            'n' => {
                let nth = value
                    .parse::<usize>()
                    .map_err(|_| format!("{cmd}: invalid occurrence {value:?}"))?;
                builder = builder.nth(nth);
            }
            't' => {
                let kind = value.parse::<Kind>().map_err(|e| format!("{cmd}: {e}"))?;
                builder = builder.expect(kind);
            }
            'd' => {
                let default = parse_literal(&value).map_err(|e| format!("{cmd}: bad default: {e}"))?;
                builder = builder.or_default(default);
            }
            'a' => label = Some(value),
            c => return Err(format!("{cmd}: unknown option -{c}")),
        }
    }

    let target = match positional.as_slice() {
        [one] => one.clone(),
        [] => {
            return Err(match kind {
                EntryKind::Variable => "/var: requires a variable name".into(),
                EntryKind::Pattern => "/pattern: requires a pattern".into(),
            })
        }
        _ => return Err(format!("{cmd}: too many arguments ({})", positional.len())),
    };

    builder = match kind {
        EntryKind::Variable => builder.variable(target.clone()),
        EntryKind::Pattern => builder.pattern(target.clone()),
    };
    let request = builder.build().map_err(|e| format!("{cmd}: {e}"))?;

    Ok(PlanEntry {
        label: label.unwrap_or(target),
        request,
    })
}

// ── /set ──────────────────────────────────────────────────────────────────────

fn parse_set(tokens: &[String], plan: &mut Plan) -> Result<(), String> {
    if tokens.is_empty() {
        return Err("/set: requires an argument".into());
    }

    let (name, value) = if let Some(eq) = tokens[0].find('=') {
        (tokens[0][..eq].to_owned(), tokens[0][eq + 1..].to_owned())
    } else if tokens.len() >= 2 {
        (tokens[0].clone(), tokens[1..].join(" "))
    } else {
        return Err(format!("/set: missing value for '{}'", tokens[0]));
    };

    let flag = parse_switch(&value).ok_or_else(|| format!("/set: {name}: expected on or off, got {value:?}"))?;
    match name.as_str() {
        "strip" => plan.strip = flag,
        "optional" => plan.optional = flag,
        _ => return Err(format!("/set: unknown setting '{name}'")),
    }
    Ok(())
}

fn parse_switch(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "on" | "1" | "yes" | "true" => Some(true),
        "off" | "0" | "no" | "false" => Some(false),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Locator;

    // -- split_args -----------------------------------------------------------

    #[test]
    fn split_simple() {
        assert_eq!(split_args("-n1 -tint  accountId"), ["-n1", "-tint", "accountId"]);
    }

    #[test]
    fn split_quoted_spaces() {
        assert_eq!(split_args(r#"-a "my label" x"#), ["-a", "my label", "x"]);
    }

    #[test]
    fn split_keeps_regex_backslashes() {
        assert_eq!(split_args(r#""data\[\"k\"\]\s*=""#), [r#"data\["k"\]\s*="#]);
        assert_eq!(split_args(r"a\.b\s*="), [r"a\.b\s*="]);
    }

    #[test]
    fn split_empty_quoted_token() {
        assert_eq!(split_args(r#"-d "" x"#), ["-d", "", "x"]);
    }

    // -- /var -----------------------------------------------------------------

    #[test]
    fn var_minimal() {
        let (plan, errs) = Plan::load_str("/var accountId");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(plan.entries.len(), 1);
        let e = &plan.entries[0];
        assert_eq!(e.label, "accountId");
        assert!(matches!(e.request.locator(), Locator::Variable(n) if n == "accountId"));
        assert_eq!(e.request.occurrence, 0);
    }

    #[test]
    fn var_with_flags() {
        let (plan, errs) = Plan::load_str("/var -n1 -tint -d0 -a previous balance");
        assert!(errs.is_empty(), "{errs:?}");
        let e = &plan.entries[0];
        assert_eq!(e.label, "previous");
        assert_eq!(e.request.occurrence, 1);
        assert_eq!(e.request.expected_kind, Some(Kind::Int));
        assert_eq!(e.request.default, Some(LiteralValue::Int(0)));
    }

    #[test]
    fn var_separated_flag_values() {
        let (plan, errs) = Plan::load_str("/var -n 2 -t text -d \"'none'\" label");
        assert!(errs.is_empty(), "{errs:?}");
        let e = &plan.entries[0];
        assert_eq!(e.request.occurrence, 2);
        assert_eq!(e.request.expected_kind, Some(Kind::Text));
        assert_eq!(e.request.default, Some(LiteralValue::Text("none".into())));
    }

    #[test]
    fn var_errors() {
        let src = "/var\n/var -nX a\n/var -tlist a\n/var -d foo a\n/var a b\n/var -z a\n/var 9lives\n/var -n";
        let (plan, errs) = Plan::load_str(src);
        assert!(plan.entries.is_empty());
        let lines: Vec<usize> = errs.iter().map(|e| e.line).collect();
        assert_eq!(lines, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(errs[0].message.contains("requires a variable name"));
        assert!(errs[5].message.contains("unknown option -z"));
        assert!(errs[6].message.contains("conflicting request"));
    }

    // -- /pattern -------------------------------------------------------------

    #[test]
    fn pattern_entry() {
        let (plan, errs) = Plan::load_str(r#"/pattern -a currency "data\[\"cur\"\]\s*=""#);
        assert!(errs.is_empty(), "{errs:?}");
        let e = &plan.entries[0];
        assert_eq!(e.label, "currency");
        assert!(matches!(e.request.locator(), Locator::Pattern(re) if re.as_str() == r#"data\["cur"\]\s*="#));
    }

    #[test]
    fn pattern_after_double_dash() {
        let (plan, errs) = Plan::load_str("/pattern -- -x=");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(plan.entries[0].label, "-x=");
    }

    #[test]
    fn invalid_pattern_is_error() {
        let (_, errs) = Plan::load_str("/pattern (open");
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("invalid pattern"));
    }

    // -- /set -----------------------------------------------------------------

    #[test]
    fn set_switches() {
        let (plan, errs) = Plan::load_str("/set strip=off\n/set optional on");
        assert!(errs.is_empty(), "{errs:?}");
        assert!(!plan.strip);
        assert!(plan.optional);
    }

    #[test]
    fn set_errors() {
        let (_, errs) = Plan::load_str("/set strip=maybe\n/set colour=on\n/set strip");
        assert_eq!(errs.len(), 3);
    }

    // -- Comments & skipping --------------------------------------------------

    #[test]
    fn comments_and_unknown_commands() {
        let (plan, errs) = Plan::load_str(";; header\n\n/fetch http://x\nnot a directive\n/var x");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(plan.entries.len(), 1);
    }

    // -- run ------------------------------------------------------------------

    #[test]
    fn run_in_order() {
        let (plan, errs) = Plan::load_str("/var b\n/var a\n/var -n1 a");
        assert!(errs.is_empty(), "{errs:?}");
        let out = plan.run("var a = 1; // b = 0\nvar b = 'x'; a = 2;");
        assert_eq!(
            out,
            vec![
                ("b", Ok(LiteralValue::Text("x".into()))),
                ("a", Ok(LiteralValue::Int(1))),
                ("a", Ok(LiteralValue::Int(2))),
            ]
        );
    }

    #[test]
    fn run_without_strip_sees_comments() {
        let (plan, _) = Plan::load_str("/set strip=off\n/var b");
        let out = plan.run("// b = 0\nb = 1;");
        assert_eq!(out, vec![("b", Ok(LiteralValue::Int(0)))]);
    }

    #[test]
    fn run_reports_not_found() {
        let (plan, _) = Plan::load_str("/var missing");
        let out = plan.run("x = 1;");
        assert!(matches!(out[0].1, Err(ExtractError::NotFound { .. })));
    }

    #[test]
    fn run_optional_drops_not_found_only() {
        let (plan, _) = Plan::load_str("/set optional=on\n/var missing\n/var -tint x\n/var y");
        let out = plan.run("x = 'a'; y = 2;");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, "x");
        assert!(matches!(out[0].1, Err(ExtractError::TypeMismatch { .. })));
        assert_eq!(out[1], ("y", Ok(LiteralValue::Int(2))));
    }

    #[test]
    fn load_file_reads_disk() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "/var total").unwrap();
        let (plan, errs) = Plan::load_file(f.path()).unwrap();
        assert!(errs.is_empty());
        assert_eq!(plan.entries[0].label, "total");
    }

    #[test]
    fn push_by_hand() {
        let mut plan = Plan::new();
        plan.push("n", ExtractionRequest::variable("n").unwrap());
        assert_eq!(plan.run("n = 5"), vec![("n", Ok(LiteralValue::Int(5)))]);
    }
}
