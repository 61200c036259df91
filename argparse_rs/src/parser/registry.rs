//! Registration: building a parser tree.
//!
//! Every rule is checked synchronously at the registration call; nothing is
//! deferred to parse time.

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use super::ArgParser;
use crate::argument::{Action, ArgSpec, Argument};
use crate::config::ParserSettings;
use crate::error::RegistrationError;
use crate::group::ArgGroup;
use crate::naming;
use crate::value::{Handle, Scalar, TypedCell};

impl ArgParser {
    /// Create a root parser with default settings (automatic `--help/-h`).
    ///
    /// An empty `name` falls back to the running program's file name.
    pub fn new(name: &str, description: &str) -> Result<Self, RegistrationError> {
        Self::with_settings(name, description, ParserSettings::default())
    }

    pub fn with_settings(
        name: &str,
        description: &str,
        settings: ParserSettings,
    ) -> Result<Self, RegistrationError> {
        if !naming::is_valid_prefix(settings.prefix) {
            return Err(RegistrationError::InvalidPrefix(settings.prefix));
        }

        let name = if name.is_empty() {
            program_name()
        } else {
            if !naming::is_valid_group_name(name) {
                return Err(RegistrationError::InvalidParserName(name.to_string()));
            }
            name.to_lowercase()
        };

        let mut parser = Self {
            name,
            description: description.to_string(),
            settings,
            help: None,
            arguments: Vec::new(),
            positionals: Vec::new(),
            groups: IndexMap::new(),
            subparsers: IndexMap::new(),
            subparser_required: false,
            selected: String::new(),
        };

        if parser.settings.include_help {
            let prefix = parser.settings.prefix;
            let mut spec = ArgSpec::<String>::new(format!("{prefix}{prefix}help"))
                .description("Print this message")
                .action(Action::Help);
            if let Some(shortcut) = parser.settings.help_shortcut {
                spec = spec.shortcut(shortcut);
            }
            let handle = parser.add(spec)?;
            parser.help = Some(handle);
        }

        Ok(parser)
    }

    pub fn add_int(&mut self, spec: ArgSpec<i64>) -> Result<Handle<i64>, RegistrationError> {
        self.add(spec)
    }

    pub fn add_string(
        &mut self,
        spec: ArgSpec<String>,
    ) -> Result<Handle<String>, RegistrationError> {
        self.add(spec)
    }

    pub fn add_bool(&mut self, spec: ArgSpec<bool>) -> Result<Handle<bool>, RegistrationError> {
        self.add(spec)
    }

    /// Register an argument and return the handle to its live value.
    pub fn add<T: Scalar>(&mut self, spec: ArgSpec<T>) -> Result<Handle<T>, RegistrationError> {
        let ArgSpec {
            name,
            shortcut,
            description,
            mut mandatory,
            mut action,
            mut default,
            constant,
            validator,
            group,
        } = spec;
        let prefix = self.settings.prefix;

        if name.is_empty() && shortcut.is_none() {
            return Err(RegistrationError::MissingIdentity);
        }

        let name = name.to_lowercase();
        if !naming::is_valid_flag_name(&name, prefix) {
            return Err(RegistrationError::InvalidName(name));
        }
        if self.find_name(&name).is_some() {
            return Err(RegistrationError::DuplicateName {
                name,
                parser: self.name.clone(),
            });
        }

        let positional = naming::is_positional_name(&name, prefix);
        let shortcut = if positional {
            if shortcut.is_some() {
                debug!(argument = %name, "dropping shortcut of positional argument");
            }
            mandatory = true;
            None
        } else {
            match shortcut {
                None => None,
                Some(short) => {
                    if !naming::is_valid_shortcut(short) {
                        return Err(RegistrationError::InvalidShortcut(short));
                    }
                    if let Some(existing) = self.find_shortcut(short) {
                        return Err(RegistrationError::DuplicateShortcut {
                            shortcut: short,
                            name,
                            existing: self.arguments[existing].name().to_string(),
                            parser: self.name.clone(),
                        });
                    }
                    Some(short)
                }
            }
        };

        if mandatory {
            action = Action::StoreValue;
        } else {
            if !T::KIND.supports(action) {
                return Err(RegistrationError::UnsupportedAction {
                    argument: name,
                    kind: T::KIND,
                    action,
                });
            }
            if let Some(forced) = T::flag_default(action) {
                default = forced;
            }
        }

        let group = match group {
            None => None,
            Some(group) => {
                let key = group.to_lowercase();
                if !self.groups.contains_key(&key) {
                    return Err(RegistrationError::UnknownGroup(group));
                }
                if positional {
                    return Err(RegistrationError::PositionalInGroup(name));
                }
                Some(key)
            }
        };

        let cell = TypedCell::new(default, constant, validator);
        let handle = cell.handle();
        let index = self.arguments.len();

        self.arguments.push(Argument::new(
            name,
            shortcut,
            description,
            action,
            mandatory,
            positional,
            prefix,
            T::into_cell(cell),
        ));
        if positional {
            self.positionals.push(index);
        }
        if let Some(target) = group.and_then(|key| self.groups.get_mut(&key)) {
            target.push(index);
        }

        Ok(handle)
    }

    /// Register a group. Arguments join it through [`ArgSpec::group`].
    pub fn add_group(
        &mut self,
        name: &str,
        description: &str,
        required: bool,
        exclusive: bool,
    ) -> Result<&ArgGroup, RegistrationError> {
        let key = name.to_lowercase();
        if !naming::is_valid_group_name(&key) {
            return Err(RegistrationError::InvalidGroupName(key));
        }
        if self.groups.contains_key(&key) {
            return Err(RegistrationError::DuplicateGroup(key));
        }

        let group = ArgGroup::new(key.clone(), description.to_string(), required, exclusive);
        Ok(self.groups.entry(key).or_insert(group))
    }

    /// Register a subcommand. The child inherits this parser's settings and
    /// is returned for further registration.
    pub fn add_subparser(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<&mut ArgParser, RegistrationError> {
        if name.is_empty() {
            return Err(RegistrationError::EmptySubcommandName);
        }
        let key = name.to_lowercase();
        if self.subparsers.contains_key(&key) {
            return Err(RegistrationError::DuplicateSubcommand {
                name: key,
                parser: self.name.clone(),
            });
        }

        let child = ArgParser::with_settings(name, description, self.settings.clone())?;
        Ok(self.subparsers.entry(key).or_insert(child))
    }
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|stem| stem.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "prog".to_string())
}
