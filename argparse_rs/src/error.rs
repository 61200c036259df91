//! Error types for argument registration and parsing.
//!
//! Three layers, matching where a failure is detected:
//! - [`ValueError`] - a value cell refused a value or an action
//! - [`ParseError`] - a parse pass failed (or ended with a help request)
//! - [`RegistrationError`] - building the parser tree was rejected

use thiserror::Error;

use crate::argument::Action;
use crate::value::ValueKind;

/// Failure raised by a value cell, before the owning argument adds its label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid value \"{value}\", must be {expected}")]
    InvalidFormat {
        value: String,
        expected: &'static str,
    },

    #[error("invalid value \"{value}\", must meet custom restriction")]
    Rejected { value: String },

    #[error("invalid action for {kind}: {action}")]
    UnsupportedAction { kind: ValueKind, action: Action },
}

/// Outcome of a failed (or help-interrupted) parse pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Value text could not be coerced to the argument's scalar kind.
    #[error("invalid value \"{value}\" for argument {argument}, must be {expected}")]
    InvalidFormat {
        argument: String,
        value: String,
        expected: &'static str,
    },

    /// A custom predicate rejected a value, or the end-of-pass checks
    /// (mandatory arguments, groups) collected one or more diagnostics.
    #[error("{}", .diagnostics.join("\n"))]
    ValidationFailed { diagnostics: Vec<String> },

    #[error("invalid action for argument {argument} ({kind}): {action}")]
    UnsupportedAction {
        argument: String,
        kind: ValueKind,
        action: Action,
    },

    #[error("no value for argument {argument}")]
    MissingValue { argument: String },

    #[error("too few arguments were provided (missing {})", .missing.join(", "))]
    TooFewArguments { missing: Vec<String> },

    #[error("{}", subcommand_message(.available, .suggestion))]
    SubcommandRequired {
        available: Vec<String>,
        suggestion: Option<String>,
    },

    #[error("unknown argument {argument}")]
    UnknownArgument { argument: String },

    #[error("no command was provided")]
    NoTokens,

    /// Control signal, not a failure: the help flag was given.
    #[error("help requested")]
    HelpRequested { help: String },
}

impl ParseError {
    /// True for the help control signal.
    pub fn is_help(&self) -> bool {
        matches!(self, ParseError::HelpRequested { .. })
    }

    /// Rendered help text carried by a help request.
    pub fn help_text(&self) -> Option<&str> {
        match self {
            ParseError::HelpRequested { help } => Some(help),
            _ => None,
        }
    }

    /// Individual diagnostic lines, one per reported problem.
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            ParseError::ValidationFailed { diagnostics } => diagnostics.clone(),
            other => vec![other.to_string()],
        }
    }
}

fn subcommand_message(available: &[String], suggestion: &Option<String>) -> String {
    let mut message = format!("no subcommand was specified ({})", available.join(","));
    if let Some(hint) = suggestion {
        message.push_str(&format!(", did you mean '{}'?", hint));
    }
    message
}

/// Rejection raised synchronously while assembling a parser tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("argument must have a name and/or shortcut")]
    MissingIdentity,

    #[error("invalid argument name '{0}', only letters and - are allowed")]
    InvalidName(String),

    #[error("invalid shortcut '{0}', must be a letter")]
    InvalidShortcut(char),

    #[error("argument {name} is already defined in parser {parser}")]
    DuplicateName { name: String, parser: String },

    #[error("shortcut {shortcut} (arg {name}) is already used in argument {existing} (parser {parser})")]
    DuplicateShortcut {
        shortcut: char,
        name: String,
        existing: String,
        parser: String,
    },

    #[error("{action} is not available for {kind} argument {argument}")]
    UnsupportedAction {
        argument: String,
        kind: ValueKind,
        action: Action,
    },

    #[error("group {0} is not defined")]
    UnknownGroup(String),

    #[error("positional argument {0} cannot belong to a group")]
    PositionalInGroup(String),

    #[error("invalid name '{0}' for group, it must begin with a letter and only contain letters and -")]
    InvalidGroupName(String),

    #[error("group {0} is already defined")]
    DuplicateGroup(String),

    #[error("invalid name '{0}' for parser, it must begin with a letter and only contain letters and -")]
    InvalidParserName(String),

    #[error("invalid flag prefix '{0}', letters, digits, whitespace and = are not allowed")]
    InvalidPrefix(char),

    #[error("name for subparser cannot be empty")]
    EmptySubcommandName,

    #[error("subparser {name} of {parser} is already defined")]
    DuplicateSubcommand { name: String, parser: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failed_joins_lines() {
        let err = ParseError::ValidationFailed {
            diagnostics: vec![
                "argument --title has no value".to_string(),
                "no argument from group \"target\" (--id[-i],--all[-a]) was specified".to_string(),
            ],
        };
        let rendered = err.to_string();
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.starts_with("argument --title has no value"));
        assert_eq!(err.diagnostics().len(), 2);
    }

    #[test]
    fn subcommand_required_mentions_suggestion() {
        let err = ParseError::SubcommandRequired {
            available: vec!["add".to_string(), "remove".to_string()],
            suggestion: Some("add".to_string()),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("(add,remove)"));
        assert!(rendered.contains("did you mean 'add'?"));

        let plain = ParseError::SubcommandRequired {
            available: vec!["add".to_string()],
            suggestion: None,
        };
        assert_eq!(plain.to_string(), "no subcommand was specified (add)");
    }

    #[test]
    fn unknown_argument_names_the_flag() {
        let err = ParseError::UnknownArgument {
            argument: "--nope".to_string(),
        };
        assert_eq!(err.to_string(), "unknown argument --nope");
        assert_eq!(
            RegistrationError::InvalidPrefix('=').to_string(),
            "invalid flag prefix '=', letters, digits, whitespace and = are not allowed"
        );
    }

    #[test]
    fn help_is_distinguishable() {
        let err = ParseError::HelpRequested {
            help: "Usage: prog".to_string(),
        };
        assert!(err.is_help());
        assert_eq!(err.help_text(), Some("Usage: prog"));
        assert!(!ParseError::NoTokens.is_help());
        assert_eq!(ParseError::NoTokens.help_text(), None);
    }
}
