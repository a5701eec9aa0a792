//! Command-line argument parsing.
//!
//! Usage:
//!   pragmash [-d] [-t] [-f[<rcfile>]] [-c <command>] [<script>]

use std::path::PathBuf;

use directories::BaseDirs;

/// Name of the rc file looked up in the home directory.
pub const RC_FILE_NAME: &str = ".pragmashrc";

pub const USAGE: &str = "Usage: pragmash [-d] [-t] [-f[<rcfile>]] [-c <command>] [<script>]";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Rc-file specification.
    pub config: ConfigFile,
    /// Single line to evaluate (`-c <command>`).
    pub command: Option<String>,
    /// Print every parsed line as a token tree (`-t`).
    pub dump_tokens: bool,
    /// Debug logging (`-d`).
    pub debug: bool,
    /// Script to check; stdin when absent.
    pub script: Option<PathBuf>,
}

/// How to choose the rc file.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ConfigFile {
    /// `~/.pragmashrc` if it exists (default).
    #[default]
    Search,
    /// `-f` with no file argument: no rc file.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
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

        // Non-flag argument.
        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => args.debug = true,
                't' => args.dump_tokens = true,

                // -f[<file>]
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        args.config = ConfigFile::Explicit(PathBuf::from(file));
                        j = chars.len();
                    } else if i + 1 < argv.len() && !argv[i + 1].starts_with('-') && argv.len() - i > 2 {
                        // `-f <file> <script>`: a lone trailing word is the script.
                        i += 1;
                        args.config = ConfigFile::Explicit(PathBuf::from(&argv[i]));
                    } else {
                        args.config = ConfigFile::Skip;
                    }
                }

                // -c<command> or -c <command>
                'c' => {
                    let cmd = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-c requires a command argument".to_owned());
                    };
                    args.command = Some(cmd);
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    match positional.len() {
        0 => {}
        1 => args.script = Some(PathBuf::from(positional.remove(0))),
        n => return Err(format!("too many arguments ({n})")),
    }
    if args.command.is_some() && args.script.is_some() {
        return Err("-c cannot be combined with a script".to_owned());
    }

    Ok(args)
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// `~/.pragmashrc`, if the home directory is known and the file exists.
pub fn find_user_config() -> Option<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(RC_FILE_NAME))
        .filter(|p| p.exists())
}

/// The rc file to load for `choice`, if any.
pub fn resolve_config(choice: &ConfigFile) -> Option<PathBuf> {
    match choice {
        ConfigFile::Search => find_user_config(),
        ConfigFile::Skip => None,
        ConfigFile::Explicit(path) => Some(path.clone()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
