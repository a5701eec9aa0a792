use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::process::ExitCode;

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pragmash::cli;
use pragmash::config::Config;
use pragmash::script::value::from_bool;
use pragmash::script::{
    check_block_balance, evaluate_condition, line_condition, parse_line, run_line, LineReader,
    LogicalLineSource, Registry, SyntaxLine, SyntaxParser,
};

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("pragmash: {e}");
            eprintln!("{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    init_tracing(args.debug);

    // ── Builtins and rc file ──────────────────────────────────────────────────
    let mut registry = Registry::standard();
    if let Some(path) = cli::resolve_config(&args.config) {
        match Config::load_file(&path) {
            Ok((config, mut errors)) => {
                errors.extend(config.apply(&mut registry));
                for e in errors {
                    warn!(file = %path.display(), "{e}");
                }
            }
            Err(e) => warn!(file = %path.display(), error = %e, "cannot read rc file"),
        }
    }

    // ── Run ───────────────────────────────────────────────────────────────────
    let result = match &args.command {
        Some(cmd) => run_command(cmd, &registry, args.dump_tokens),
        None => match &args.script {
            Some(path) => check_file(path, args.dump_tokens),
            None => check_lines(LineReader::new(io::stdin().lock()), args.dump_tokens),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pragmash: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` picks the filter unless `-d` forces `debug`.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Evaluate one line.  `if`/`while` lines print their condition's truth.
fn run_command(cmd: &str, registry: &Registry, dump: bool) -> Result<(), String> {
    let line = parse_line(cmd, 1).map_err(|e| e.to_string())?;
    if dump {
        print_line(&line);
    }
    if line.block_close {
        return Err("'}' outside a script".to_owned());
    }
    let output = if let Some(condition) = line_condition(&line) {
        from_bool(evaluate_condition(&condition, registry).map_err(|e| e.to_string())?)
    } else if let Some(keyword) = line.keyword() {
        return Err(format!("{keyword}: block statements need a script"));
    } else {
        run_line(&line, registry).map_err(|e| e.to_string())?
    };
    println!("{output}");
    Ok(())
}

fn check_file(path: &Path, dump: bool) -> Result<(), String> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    check_lines(LineReader::new(BufReader::new(file)), dump)
        .map_err(|e| format!("{}: {e}", path.display()))
}

/// Parse every line and verify block balance, stopping at the first error.
fn check_lines<S: LogicalLineSource>(source: S, dump: bool) -> Result<(), String> {
    let mut lines = Vec::new();
    for line in SyntaxParser::new(source) {
        let line = line.map_err(|e| e.to_string())?;
        if dump {
            print_line(&line);
        }
        lines.push(line);
    }
    check_block_balance(&lines).map_err(|e| e.to_string())?;
    info!(lines = lines.len(), "script ok");
    Ok(())
}

/// `<line>: [}] tokens [{]`, tokens in s-expression form.
fn print_line(line: &SyntaxLine) {
    let mut parts: Vec<String> = Vec::new();
    if line.block_close {
        parts.push("}".to_owned());
    }
    parts.extend(line.tokens.iter().map(ToString::to_string));
    if line.block_open {
        parts.push("{".to_owned());
    }
    println!("{}: {}", line.number, parts.join(" "));
}
