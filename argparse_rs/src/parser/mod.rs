//! Parser nodes: registration, the parse engine and help rendering.
//!
//! # Module Structure
//!
//! - [`registry`] - argument, group and subparser registration
//! - [`core`] - the token-consumption loop and end-of-pass validation
//! - [`help`] - usage and help text rendering
//! - [`helpers`] - subcommand suggestions
//!
//! # Usage
//!
//! ```
//! use argparse::{Action, ArgParser, ArgSpec};
//!
//! let mut parser = ArgParser::new("prog", "Demo program").unwrap();
//! let count = parser
//!     .add_int(ArgSpec::new("--count").shortcut('c').default(1))
//!     .unwrap();
//! let verbose = parser
//!     .add_bool(ArgSpec::new("--verbose").shortcut('v').action(Action::StoreTrue))
//!     .unwrap();
//!
//! parser.parse(&["prog", "-v", "--count=5"]).unwrap();
//! assert_eq!(count.get(), 5);
//! assert!(verbose.get());
//! ```

mod core;
mod help;
mod helpers;
mod registry;

use indexmap::IndexMap;

use crate::argument::{Action, Argument};
use crate::classify::{FlagTable, ShortcutKind};
use crate::config::ParserSettings;
use crate::group::ArgGroup;
use crate::value::Handle;

/// One command node of a parser tree.
///
/// A tree is assembled once and may be parsed any number of times; every
/// pass resets all values to their defaults first. Only one pass may run on
/// a tree at a time (values live in shared single-writer handles).
#[derive(Debug)]
pub struct ArgParser {
    name: String,
    description: String,
    settings: ParserSettings,
    help: Option<Handle<String>>,
    arguments: Vec<Argument>,
    positionals: Vec<usize>,
    groups: IndexMap<String, ArgGroup>,
    subparsers: IndexMap<String, ArgParser>,
    subparser_required: bool,
    selected: String,
}

impl ArgParser {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Handle of the automatic help flag, if one was registered. After a
    /// help request it holds the rendered help text.
    pub fn help_handle(&self) -> Option<Handle<String>> {
        self.help.clone()
    }

    pub fn set_subparser_required(&mut self, required: bool) {
        self.subparser_required = required;
    }

    pub fn is_subparser_required(&self) -> bool {
        self.subparser_required
    }

    /// Subcommand chosen by the most recent parse pass; empty if none.
    pub fn selected_subcommand(&self) -> &str {
        &self.selected
    }

    pub fn subparser(&self, name: &str) -> Option<&ArgParser> {
        self.subparsers.get(&name.to_lowercase())
    }

    pub fn subparser_mut(&mut self, name: &str) -> Option<&mut ArgParser> {
        self.subparsers.get_mut(&name.to_lowercase())
    }

    pub fn subparser_names(&self) -> Vec<String> {
        self.subparsers.keys().cloned().collect()
    }

    pub fn group(&self, name: &str) -> Option<&ArgGroup> {
        self.groups.get(&name.to_lowercase())
    }

    /// Registered arguments in registration order, positionals included.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Positional arguments in binding order.
    pub fn positionals(&self) -> impl Iterator<Item = &Argument> {
        self.positionals.iter().map(|&index| &self.arguments[index])
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.find_name(name).map(|index| &self.arguments[index])
    }

    /// Current display value of the argument registered as `name`.
    pub fn value_of(&self, name: &str) -> Option<String> {
        self.argument(name).map(Argument::get)
    }

    /// `(key, value)` for every argument except help flags, in registration order.
    pub fn values(&self) -> Vec<(String, String)> {
        self.arguments
            .iter()
            .filter(|argument| argument.action() != Action::Help)
            .map(|argument| (argument.key(), argument.get()))
            .collect()
    }

    /// Names of the selected subcommands, outermost first.
    pub fn selected_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut node = self;
        while let Some(child) = node.subparsers.get(&node.selected) {
            path.push(child.name.as_str());
            node = child;
        }
        path
    }

    /// The deepest node selected by the most recent parse pass.
    pub fn selected_leaf(&self) -> &ArgParser {
        let mut node = self;
        while let Some(child) = node.subparsers.get(&node.selected) {
            node = child;
        }
        node
    }

    pub(crate) fn find_name(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        let lower = name.to_lowercase();
        self.arguments
            .iter()
            .position(|argument| argument.name() == lower)
    }

    pub(crate) fn find_shortcut(&self, shortcut: char) -> Option<usize> {
        self.arguments
            .iter()
            .position(|argument| argument.shortcut() == Some(shortcut))
    }

    /// Restore every value in this subtree to its default and forget the
    /// previous selection.
    fn reset(&mut self) {
        self.selected.clear();
        for argument in &self.arguments {
            argument.set_default();
        }
        for child in self.subparsers.values_mut() {
            child.reset();
        }
    }
}

impl FlagTable for ArgParser {
    fn prefix(&self) -> char {
        self.settings.prefix
    }

    fn has_name(&self, name: &str) -> bool {
        self.find_name(name).is_some()
    }

    fn shortcut_kind(&self, shortcut: char) -> Option<ShortcutKind> {
        self.find_shortcut(shortcut).map(|index| {
            if self.arguments[index].action().takes_value() {
                ShortcutKind::TakesValue
            } else {
                ShortcutKind::Flag
            }
        })
    }
}
