//! Argument definitions and the builder used to register them.

use std::fmt;

use crate::error::{ParseError, ValueError};
use crate::value::{Scalar, ValueCell, ValueKind, Validator};

/// What a matched flag does to its value cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    /// Consume a value (next token, or the text after `=`).
    #[default]
    StoreValue,
    StoreTrue,
    StoreFalse,
    /// Store the rendered help text and end the pass with a help request.
    Help,
    StoreConst,
    Increment,
}

impl Action {
    pub fn as_label(&self) -> &'static str {
        match self {
            Action::StoreValue => "Store Value",
            Action::StoreTrue => "Store True",
            Action::StoreFalse => "Store False",
            Action::Help => "Help",
            Action::StoreConst => "Store Constant",
            Action::Increment => "Increment",
        }
    }

    /// Only store-value consumes a value; every other action is a plain flag.
    pub fn takes_value(self) -> bool {
        self == Action::StoreValue
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Declaration of one argument, handed to [`ArgParser::add`](crate::ArgParser::add).
///
/// A name starting with the doubled flag prefix (`--count`) declares an
/// optional flag; any other non-empty name (`file`) declares a positional.
///
/// ```
/// use argparse::{Action, ArgSpec};
///
/// let spec = ArgSpec::<i64>::new("--verbose")
///     .shortcut('v')
///     .description("More output")
///     .action(Action::Increment);
/// assert_eq!(spec.name(), "--verbose");
/// ```
pub struct ArgSpec<T: Scalar> {
    pub(crate) name: String,
    pub(crate) shortcut: Option<char>,
    pub(crate) description: String,
    pub(crate) mandatory: bool,
    pub(crate) action: Action,
    pub(crate) default: T,
    pub(crate) constant: T,
    pub(crate) validator: Option<Validator<T>>,
    pub(crate) group: Option<String>,
}

impl<T: Scalar> ArgSpec<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shortcut: None,
            description: String::new(),
            mandatory: false,
            action: Action::StoreValue,
            default: T::default(),
            constant: T::default(),
            validator: None,
            group: None,
        }
    }

    /// Declare a shortcut-only flag (`-x`).
    pub fn short(shortcut: char) -> Self {
        Self::new("").shortcut(shortcut)
    }

    pub fn shortcut(mut self, shortcut: char) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn default(mut self, default: T) -> Self {
        self.default = default;
        self
    }

    pub fn constant(mut self, constant: T) -> Self {
        self.constant = constant;
        self
    }

    pub fn validator(mut self, check: impl Fn(&T) -> bool + 'static) -> Self {
        self.validator = Some(Box::new(check));
        self
    }

    /// Register the argument as a member of an existing group.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A registered argument: metadata plus its bound value cell.
#[derive(Debug)]
pub struct Argument {
    name: String,
    shortcut: Option<char>,
    description: String,
    action: Action,
    mandatory: bool,
    positional: bool,
    prefix: char,
    cell: ValueCell,
}

impl Argument {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        shortcut: Option<char>,
        description: String,
        action: Action,
        mandatory: bool,
        positional: bool,
        prefix: char,
        cell: ValueCell,
    ) -> Self {
        Self {
            name,
            shortcut,
            description,
            action,
            mandatory,
            positional,
            prefix,
            cell,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shortcut(&self) -> Option<char> {
        self.shortcut
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn kind(&self) -> ValueKind {
        self.cell.kind()
    }

    /// Name with leading flag prefixes stripped (`--dry-run` -> `dry-run`),
    /// or the shortcut for shortcut-only flags.
    pub fn key(&self) -> String {
        let bare = self.name.trim_start_matches(self.prefix);
        if bare.is_empty() {
            self.shortcut.map(String::from).unwrap_or_default()
        } else {
            bare.to_string()
        }
    }

    /// Identity used in diagnostics: `--count[-c]`, `--count` or `-c`.
    pub fn label(&self) -> String {
        match (self.name.is_empty(), self.shortcut) {
            (false, Some(short)) => format!("{}[{}{}]", self.name, self.prefix, short),
            (false, None) => self.name.clone(),
            (true, Some(short)) => format!("{}{}", self.prefix, short),
            (true, None) => String::new(),
        }
    }

    /// One-line usage token, e.g. `--count/-c COUNT`.
    pub fn usage(&self) -> String {
        if self.positional {
            return self.name.clone();
        }

        let placeholder = self
            .action
            .takes_value()
            .then(|| self.key().to_uppercase());

        let flag = match (self.name.is_empty(), self.shortcut) {
            (false, Some(short)) => format!("{}/{}{}", self.name, self.prefix, short),
            (false, None) => self.name.clone(),
            (true, Some(short)) => format!("{}{}", self.prefix, short),
            (true, None) => String::new(),
        };

        match placeholder {
            Some(placeholder) => format!("{} {}", flag, placeholder),
            None => flag,
        }
    }

    /// Usage token and description separated by a tab.
    pub fn help(&self) -> String {
        format!("{}\t{}", self.usage(), self.description)
    }

    /// Current value as display text.
    pub fn get(&self) -> String {
        self.cell.get()
    }

    pub fn set(&self, raw: &str) -> Result<(), ParseError> {
        self.cell.set(raw).map_err(|err| self.wrap(err))
    }

    pub fn set_default(&self) {
        self.cell.set_default();
    }

    pub fn set_true(&self) -> Result<(), ParseError> {
        self.cell.set_true().map_err(|err| self.wrap(err))
    }

    pub fn set_false(&self) -> Result<(), ParseError> {
        self.cell.set_false().map_err(|err| self.wrap(err))
    }

    pub fn set_constant(&self) {
        self.cell.set_constant();
    }

    pub fn increment(&self) -> Result<(), ParseError> {
        self.cell.increment().map_err(|err| self.wrap(err))
    }

    fn wrap(&self, err: ValueError) -> ParseError {
        match err {
            ValueError::InvalidFormat { value, expected } => ParseError::InvalidFormat {
                argument: self.label(),
                value,
                expected,
            },
            ValueError::Rejected { value } => ParseError::ValidationFailed {
                diagnostics: vec![format!(
                    "invalid value \"{}\" for argument {}, must meet custom restriction",
                    value,
                    self.label()
                )],
            },
            ValueError::UnsupportedAction { kind, action } => ParseError::UnsupportedAction {
                argument: self.label(),
                kind,
                action,
            },
        }
    }
}
