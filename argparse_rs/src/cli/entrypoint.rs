//! Shared CLI entry point for the `argparse-demo` binary.
//!
//! Exit codes: 0 on success or help, 1 when a pass fails, 2 when the tree
//! cannot be built or I/O fails.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::demo::{DemoTree, Report, SHELL_COMMAND, build_tree};
use crate::config::ParserSettings;
use crate::error::ParseError;
use crate::tokenizer::string_to_argv;

/// Options controlling binary-specific behavior.
pub struct EntryOptions {
    /// Name of the root parser, shown in usage lines.
    pub binary_name: &'static str,
}

/// Run the CLI with the given options. This is the shared main() body.
pub fn run(opts: &EntryOptions) -> ExitCode {
    init_tracing();

    match execute(opts) {
        Ok(code) => code,
        Err(err) => {
            print_error(&format!("{err:#}"));
            ExitCode::from(2)
        }
    }
}

// Logs go to stderr; stdout carries results only.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();
}

fn execute(opts: &EntryOptions) -> Result<ExitCode> {
    let root = std::env::current_dir().context("failed to resolve working directory")?;
    let settings = ParserSettings::load(&root);
    let mut tree =
        build_tree(opts.binary_name, &settings).context("failed to build command tree")?;

    let args: Vec<String> = std::env::args().collect();
    let outcome = tree.parser.parse(&args);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if outcome.is_ok() && tree.parser.selected_subcommand() == SHELL_COMMAND {
        let stdin = io::stdin();
        let succeeded = run_shell(&mut tree, opts, stdin.lock(), &mut out)?;
        return Ok(exit_code(succeeded));
    }

    let succeeded = print_outcome(&tree, outcome, &mut out)?;
    Ok(exit_code(succeeded))
}

/// Parse every stdin line as a command line of its own. Returns false if any
/// line failed.
fn run_shell<R: BufRead, W: Write>(
    tree: &mut DemoTree,
    opts: &EntryOptions,
    input: R,
    out: &mut W,
) -> Result<bool> {
    let mut failures = 0usize;

    for line in input.lines() {
        let line = line.context("failed to read stdin")?;
        let words = string_to_argv(&line);
        if words.is_empty() {
            continue;
        }

        let mut tokens = Vec::with_capacity(words.len() + 1);
        tokens.push(opts.binary_name.to_string());
        tokens.extend(words);
        debug!(?tokens, "shell line");

        let outcome = tree.parser.parse(&tokens);
        if !print_outcome(tree, outcome, out)? {
            failures += 1;
        }
    }

    Ok(failures == 0)
}

/// Print a pass result; returns false for failures (help counts as success).
fn print_outcome<W: Write>(
    tree: &DemoTree,
    outcome: Result<(), ParseError>,
    out: &mut W,
) -> Result<bool> {
    match outcome {
        Ok(()) => {
            let report = Report::from_parser(&tree.parser);
            if tree.json.get() {
                writeln!(out, "{}", report.to_json()?)?;
            } else {
                write!(out, "{}", report.to_text())?;
            }
            Ok(true)
        }
        Err(ParseError::HelpRequested { help }) => {
            write!(out, "{}", help)?;
            Ok(true)
        }
        Err(err) => {
            for line in err.diagnostics() {
                print_error(&line);
            }
            Ok(false)
        }
    }
}

fn print_error(message: &str) {
    eprintln!("{} {}", style("error:").red().bold(), message);
}

fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const OPTS: EntryOptions = EntryOptions {
        binary_name: "argparse-demo",
    };

    fn tree() -> DemoTree {
        build_tree(OPTS.binary_name, &ParserSettings::default()).unwrap()
    }

    fn shell(input: &str) -> (String, bool) {
        let mut tree = tree();
        let mut out = Vec::new();
        let succeeded = run_shell(&mut tree, &OPTS, Cursor::new(input), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), succeeded)
    }

    #[test]
    fn shell_parses_each_line() {
        let (out, succeeded) = shell("add -t \"Big day\" 'call mom'\n\n   \nlist -l 2\n");
        assert!(succeeded);
        assert_eq!(
            out,
            "command=add\ntext=call mom\ntitle=Big day\npriority=3\npin=false\n\
             command=list\nlimit=2\ndone=false\n"
        );
    }

    #[test]
    fn shell_lines_are_independent() {
        let (out, _) = shell("--json list -l 1\nlist\n");
        let mut lines = out.lines();
        assert!(lines.next().unwrap().starts_with('{'));
        assert_eq!(lines.next(), Some("command=list"));
        assert_eq!(lines.next(), Some("limit=10"));
    }

    #[test]
    fn shell_counts_failures() {
        let (out, succeeded) = shell("remove\nlist\n");
        assert!(!succeeded);
        assert!(out.starts_with("command=list\n"));
    }

    #[test]
    fn help_is_printed_to_stdout() {
        let mut tree = tree();
        let outcome = tree.parser.parse(&["argparse-demo", "remove", "--help"]);
        let mut out = Vec::new();
        assert!(print_outcome(&tree, outcome, &mut out).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Usage: remove [--id/-i ID | --all/-a]"));
    }
}
