//! The demo command tree and its result report.

use indexmap::IndexMap;
use serde::Serialize;

use crate::argument::{Action, ArgSpec};
use crate::config::ParserSettings;
use crate::error::RegistrationError;
use crate::parser::ArgParser;
use crate::value::Handle;

/// Subcommand that reads further command lines from stdin.
pub const SHELL_COMMAND: &str = "shell";

/// The assembled tree plus the root handles the front end reads directly.
pub struct DemoTree {
    pub parser: ArgParser,
    pub json: Handle<bool>,
    pub verbose: Handle<i64>,
}

/// Build the note-taking command tree.
///
/// Flag names follow `settings.prefix`, so a configured `+` prefix yields
/// `++title` and `+t`.
pub fn build_tree(binary_name: &str, settings: &ParserSettings) -> Result<DemoTree, RegistrationError> {
    let prefix = settings.prefix;
    let flag = |name: &str| format!("{prefix}{prefix}{name}");

    let mut parser = ArgParser::with_settings(
        binary_name,
        "Keep short notes from the command line",
        settings.clone(),
    )?;
    let verbose = parser.add_int(
        ArgSpec::new(flag("verbose"))
            .shortcut('v')
            .description("Raise verbosity (repeatable)")
            .action(Action::Increment),
    )?;
    let json = parser.add_bool(
        ArgSpec::new(flag("json"))
            .shortcut('j')
            .description("Print results as JSON")
            .action(Action::StoreTrue),
    )?;
    parser.set_subparser_required(true);

    let add = parser.add_subparser("add", "Add a note")?;
    add.add_string(ArgSpec::new("text").description("Note body"))?;
    add.add_string(
        ArgSpec::new(flag("title"))
            .shortcut('t')
            .description("Note title")
            .mandatory(true),
    )?;
    add.add_int(
        ArgSpec::new(flag("priority"))
            .shortcut('p')
            .description("Priority from 1 to 5")
            .default(3)
            .validator(|priority: &i64| (1..=5).contains(priority)),
    )?;
    add.add_bool(
        ArgSpec::new(flag("pin"))
            .shortcut('P')
            .description("Pin the note to the top")
            .action(Action::StoreTrue),
    )?;

    let remove = parser.add_subparser("remove", "Remove notes")?;
    remove.add_group("target", "Which notes to remove", true, true)?;
    remove.add_int(
        ArgSpec::new(flag("id"))
            .shortcut('i')
            .description("Remove one note by id")
            .group("target"),
    )?;
    remove.add_bool(
        ArgSpec::new(flag("all"))
            .shortcut('a')
            .description("Remove every note")
            .action(Action::StoreTrue)
            .group("target"),
    )?;
    remove.add_bool(
        ArgSpec::new(flag("force"))
            .shortcut('f')
            .description("Do not ask for confirmation")
            .action(Action::StoreTrue),
    )?;

    let list = parser.add_subparser("list", "List notes")?;
    list.add_int(
        ArgSpec::new(flag("limit"))
            .shortcut('l')
            .description("Show at most this many notes")
            .default(10),
    )?;
    list.add_bool(
        ArgSpec::new(flag("done"))
            .shortcut('d')
            .description("Show finished notes")
            .action(Action::StoreConst)
            .constant(true),
    )?;

    parser.add_subparser(SHELL_COMMAND, "Read commands from stdin, one per line")?;

    Ok(DemoTree {
        parser,
        json,
        verbose,
    })
}

/// Result of a successful pass, ready for printing.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Selected subcommand path, space separated.
    pub command: String,
    /// Root-level values.
    pub global: IndexMap<String, String>,
    /// Values of the selected subcommand.
    pub values: IndexMap<String, String>,
}

impl Report {
    pub fn from_parser(parser: &ArgParser) -> Self {
        Self {
            command: parser.selected_path().join(" "),
            global: parser.values().into_iter().collect(),
            values: parser.selected_leaf().values().into_iter().collect(),
        }
    }

    /// `command=<name>` followed by one `key=value` line per value.
    pub fn to_text(&self) -> String {
        let mut text = format!("command={}\n", self.command);
        for (key, value) in &self.values {
            text.push_str(&format!("{}={}\n", key, value));
        }
        text
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
