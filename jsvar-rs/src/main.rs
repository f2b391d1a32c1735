use std::path::Path;

use tracing_subscriber::EnvFilter;

use jsvar::cli::{self, CliArgs, Input, Mode};
use jsvar::plan::Plan;
use jsvar::script::{get_literal, strip_comments, ExtractionRequest};

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("jsvar: {e}");
            for line in cli::USAGE {
                eprintln!("{line}");
            }
            std::process::exit(1);
        }
    };

    init_logging(args.verbose);

    if !run(args) {
        std::process::exit(1);
    }
}

/// `JSVAR_LOG` wins over `-v`; the fallback is `warn`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("JSVAR_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns `false` when anything failed; errors are already reported.
fn run(args: CliArgs) -> bool {
    let script = match args.input.read() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("jsvar: {}: {e}", args.input.describe());
            return false;
        }
    };
    tracing::debug!(input = %args.input.describe(), bytes = script.len(), "script read");

    match &args.mode {
        Mode::Strip => {
            print!("{}", strip_comments(&script));
            true
        }
        Mode::Extract(request) => run_single(&script, request, args.raw),
        Mode::Plan(path) => run_plan(&script, path, args.raw, &args.input),
    }
}

fn run_single(script: &str, request: &ExtractionRequest, raw: bool) -> bool {
    let outcome = if raw {
        get_literal(script, request)
    } else {
        get_literal(&strip_comments(script), request)
    };
    match outcome {
        Ok(value) => {
            println!("{value}");
            true
        }
        Err(e) => {
            eprintln!("jsvar: {e}");
            false
        }
    }
}

fn run_plan(script: &str, path: &Path, raw: bool, input: &Input) -> bool {
    let (mut plan, errors) = match Plan::load_file(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("jsvar: {}: {e}", path.display());
            return false;
        }
    };
    for e in &errors {
        eprintln!("jsvar: warning: {}: {e}", path.display());
    }
    if raw {
        plan.strip = false;
    }
    tracing::debug!(entries = plan.entries.len(), input = %input.describe(), "running plan");

    let mut ok = true;
    for (label, outcome) in plan.run(script) {
        match outcome {
            Ok(value) => println!("{label}={value}"),
            Err(e) => {
                eprintln!("jsvar: {label}: {e}");
                ok = false;
            }
        }
    }
    ok
}
