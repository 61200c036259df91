//! The parse engine: token consumption, positional binding, end-of-pass
//! validation and subcommand dispatch.

use tracing::{debug, trace};

use super::ArgParser;
use super::helpers::suggest_similar;
use crate::argument::Action;
use crate::classify::{Category, classify};
use crate::error::ParseError;

/// Where a value-taking argument gets its value from.
#[derive(Clone, Copy)]
enum Supply<'a> {
    /// The token after the current one.
    NextToken,
    /// Text carried by the current token.
    Inline(&'a str),
}

/// Bookkeeping for a single parse pass over one parser node.
struct ParsePass<'t> {
    tokens: &'t [&'t str],
    index: usize,
    /// Positional slots still unbound; that many tokens stay reserved at the tail.
    reserved: usize,
    /// Next positional to bind.
    cursor: usize,
    set: Vec<bool>,
}

impl<'t> ParsePass<'t> {
    fn new(tokens: &'t [&'t str], positionals: usize, arguments: usize) -> Self {
        Self {
            tokens,
            index: 0,
            reserved: positionals,
            cursor: 0,
            set: vec![false; arguments],
        }
    }

    /// Step onto the following token and return it.
    fn take_next(&mut self) -> Option<&'t str> {
        let next = *self.tokens.get(self.index + 1)?;
        self.index += 1;
        Some(next)
    }

    fn mark(&mut self, argument: usize) {
        self.set[argument] = true;
    }

    fn was_set(&self, argument: usize) -> bool {
        self.set[argument]
    }

    fn remaining(&self) -> &'t [&'t str] {
        self.tokens.get(self.index..).unwrap_or_default()
    }
}

impl ArgParser {
    /// Run one parse pass.
    ///
    /// The first token is the program (or subcommand) name and is skipped.
    /// Results are read through the handles returned at registration; the
    /// `Err(HelpRequested)` outcome carries the rendered help text.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), ParseError> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        self.parse_tokens(&tokens)
    }

    fn parse_tokens(&mut self, tokens: &[&str]) -> Result<(), ParseError> {
        self.reset();

        let Some((_, working)) = tokens.split_first() else {
            return Err(ParseError::NoTokens);
        };

        let mut pass = ParsePass::new(working, self.positionals.len(), self.arguments.len());
        self.consume_options(&mut pass)?;

        if let Some(help) = self.lone_help_flag(&pass) {
            return Err(self.request_help(help));
        }

        self.bind_positionals(&mut pass)?;

        let diagnostics = self.collect_diagnostics(&pass);
        if !diagnostics.is_empty() {
            return Err(ParseError::ValidationFailed { diagnostics });
        }

        self.dispatch_subcommand(pass.remaining())
    }

    fn consume_options(&self, pass: &mut ParsePass<'_>) -> Result<(), ParseError> {
        while pass.index < pass.tokens.len().saturating_sub(pass.reserved) {
            let token = pass.tokens[pass.index];
            let category = classify(self, token);
            trace!(parser = %self.name, token, ?category, "classified token");

            match category {
                Category::Value => {
                    let Some(&slot) = self.positionals.get(pass.cursor) else {
                        break;
                    };
                    self.arguments[slot].set(token)?;
                    pass.cursor += 1;
                    pass.reserved -= 1;
                }
                Category::Name => {
                    let index = self.name_index(token)?;
                    self.apply(index, Supply::NextToken, pass)?;
                }
                Category::Shortcut => {
                    let index = self.shortcut_index(token)?;
                    self.apply(index, Supply::NextToken, pass)?;
                }
                Category::NameValue | Category::NameEq => {
                    let (name, value) = split_value(token);
                    let index = self.name_index(name)?;
                    self.apply(index, supply_for(value), pass)?;
                }
                Category::ShortcutValue | Category::ShortcutEq => {
                    let (letters, value) = split_value(token);
                    let index = self.shortcut_index(letters)?;
                    self.apply(index, supply_for(value), pass)?;
                }
                Category::ShortcutGroup => {
                    let letters = self.strip_prefix(token);
                    self.walk_bundle(letters, None, pass)?;
                }
                Category::ShortcutGroupValue | Category::ShortcutGroupEq => {
                    let (letters, value) = split_value(token);
                    let letters = self.strip_prefix(letters);
                    self.walk_bundle(letters, Some(value), pass)?;
                }
            }

            pass.index += 1;
        }

        Ok(())
    }

    /// Apply a bundle of shortcuts such as `-xyz`, `-xyz10` or `-xyz=10`.
    ///
    /// Flags are applied in order. The first value-taking shortcut ends the
    /// walk: it takes the attached text, else `tail` (text after `=`), else
    /// the next token.
    fn walk_bundle(
        &self,
        letters: &str,
        tail: Option<&str>,
        pass: &mut ParsePass<'_>,
    ) -> Result<(), ParseError> {
        for (pos, letter) in letters.char_indices() {
            let index = self
                .find_shortcut(letter)
                .ok_or_else(|| unknown_flag(&format!("{}{}", self.settings.prefix, letter)))?;

            if !self.arguments[index].action().takes_value() {
                self.apply(index, Supply::NextToken, pass)?;
                continue;
            }

            let attached = &letters[pos + letter.len_utf8()..];
            let supply = if !attached.is_empty() {
                Supply::Inline(attached)
            } else {
                tail.map_or(Supply::NextToken, supply_for)
            };
            return self.apply(index, supply, pass);
        }

        Ok(())
    }

    /// Run the argument's action. Flag actions never consume a value.
    fn apply(
        &self,
        index: usize,
        supply: Supply<'_>,
        pass: &mut ParsePass<'_>,
    ) -> Result<(), ParseError> {
        let argument = &self.arguments[index];

        match argument.action() {
            Action::StoreValue => {
                let value = match supply {
                    Supply::Inline(value) => value,
                    Supply::NextToken => {
                        pass.take_next().ok_or_else(|| ParseError::MissingValue {
                            argument: argument.label(),
                        })?
                    }
                };
                argument.set(value)?;
            }
            Action::StoreTrue => argument.set_true()?,
            Action::StoreFalse => argument.set_false()?,
            Action::StoreConst => argument.set_constant(),
            Action::Increment => argument.increment()?,
            Action::Help => return Err(self.request_help(index)),
        }

        pass.mark(index);
        Ok(())
    }

    /// A help flag given as the only token, where the loop above reserved it
    /// for a positional slot.
    fn lone_help_flag(&self, pass: &ParsePass<'_>) -> Option<usize> {
        let [token] = pass.tokens else {
            return None;
        };
        if pass.reserved == 0 {
            return None;
        }

        let index = match classify(self, token) {
            Category::Name => self.find_name(token),
            Category::Shortcut => self.shortcut_index(token).ok(),
            _ => None,
        }?;

        (self.arguments[index].action() == Action::Help).then_some(index)
    }

    fn request_help(&self, index: usize) -> ParseError {
        let help = self.help();
        if let Err(err) = self.arguments[index].set(&help) {
            return err;
        }
        ParseError::HelpRequested { help }
    }

    /// Bind unbound positional slots from the tail, in order.
    fn bind_positionals(&self, pass: &mut ParsePass<'_>) -> Result<(), ParseError> {
        while pass.cursor < self.positionals.len() && pass.index < pass.tokens.len() {
            let slot = self.positionals[pass.cursor];
            self.arguments[slot].set(pass.tokens[pass.index])?;
            pass.cursor += 1;
            pass.index += 1;
        }

        if pass.cursor < self.positionals.len() {
            let missing = self.positionals[pass.cursor..]
                .iter()
                .map(|&slot| self.arguments[slot].name().to_string())
                .collect();
            return Err(ParseError::TooFewArguments { missing });
        }

        Ok(())
    }

    /// Missing mandatory flags, then group violations, all in one list.
    fn collect_diagnostics(&self, pass: &ParsePass<'_>) -> Vec<String> {
        let mut diagnostics: Vec<String> = self
            .arguments
            .iter()
            .enumerate()
            .filter(|(index, argument)| {
                argument.is_mandatory() && !argument.is_positional() && !pass.was_set(*index)
            })
            .map(|(_, argument)| format!("argument {} has no value", argument.label()))
            .collect();

        diagnostics.extend(
            self.groups
                .values()
                .filter_map(|group| group.validate(&self.arguments, |index| pass.was_set(index))),
        );

        diagnostics
    }

    fn dispatch_subcommand(&mut self, remaining: &[&str]) -> Result<(), ParseError> {
        if let Some(first) = remaining.first() {
            let key = first.to_lowercase();
            if let Some(child) = self.subparsers.get_mut(&key) {
                debug!(parser = %self.name, subcommand = %key, "dispatching to subcommand");
                self.selected = key;

                let outcome = child.parse_tokens(remaining);
                if let (Err(ParseError::HelpRequested { help }), Some(handle)) =
                    (&outcome, &self.help)
                {
                    handle.set(help.clone());
                }
                return outcome;
            }
        }

        if self.subparser_required {
            let available = self.subparser_names();
            let suggestion = remaining.first().and_then(|first| {
                suggest_similar(first, self.subparsers.keys(), self.settings.suggestion_distance)
            });
            return Err(ParseError::SubcommandRequired {
                available,
                suggestion,
            });
        }

        if !remaining.is_empty() {
            debug!(parser = %self.name, leftover = ?remaining, "ignoring unmatched tokens");
        }
        Ok(())
    }

    fn strip_prefix<'a>(&self, token: &'a str) -> &'a str {
        token.strip_prefix(self.settings.prefix).unwrap_or(token)
    }

    fn name_index(&self, name: &str) -> Result<usize, ParseError> {
        self.find_name(name).ok_or_else(|| unknown_flag(name))
    }

    fn shortcut_index(&self, token: &str) -> Result<usize, ParseError> {
        self.strip_prefix(token)
            .chars()
            .next()
            .and_then(|letter| self.find_shortcut(letter))
            .ok_or_else(|| unknown_flag(token))
    }
}

/// Split on the first `=`; later `=` stay in the value.
fn split_value(token: &str) -> (&str, &str) {
    token.split_once('=').unwrap_or((token, ""))
}

/// Trailing `=` with nothing after it means the value is the next token.
fn supply_for(value: &str) -> Supply<'_> {
    if value.is_empty() {
        Supply::NextToken
    } else {
        Supply::Inline(value)
    }
}

/// Only reachable if classification and lookup disagree about a flag.
fn unknown_flag(flag: &str) -> ParseError {
    ParseError::UnknownArgument {
        argument: flag.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::argument::{Action, ArgSpec};
    use crate::config::ParserSettings;
    use crate::error::ParseError;
    use crate::parser::ArgParser;

    #[test]
    fn empty_input_is_rejected() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let empty: [&str; 0] = [];
        assert_eq!(parser.parse(&empty), Err(ParseError::NoTokens));
        assert_eq!(parser.parse(&["prog"]), Ok(()));
    }

    #[test]
    fn name_forms_bind_the_same_value() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let count = parser.add_int(ArgSpec::new("--count").shortcut('c')).unwrap();

        for tokens in [
            vec!["prog", "--count", "5"],
            vec!["prog", "--count=5"],
            vec!["prog", "--count=", "5"],
            vec!["prog", "--COUNT", "5"],
            vec!["prog", "-c", "5"],
            vec!["prog", "-c=5"],
            vec!["prog", "-c=", "5"],
            vec!["prog", "-c5"],
        ] {
            parser.parse(&tokens).unwrap();
            assert_eq!(count.get(), 5, "tokens {:?}", tokens);
        }
    }

    #[test]
    fn value_keeps_later_equals_signs() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let expr = parser.add_string(ArgSpec::new("--expr").shortcut('e')).unwrap();
        parser.parse(&["prog", "--expr=a=b"]).unwrap();
        assert_eq!(expr.get(), "a=b");
        parser.parse(&["prog", "-e=x=="]).unwrap();
        assert_eq!(expr.get(), "x==");
    }

    #[test]
    fn missing_value_at_end() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        parser.add_int(ArgSpec::new("--count").shortcut('c')).unwrap();
        assert!(matches!(
            parser.parse(&["prog", "--count"]),
            Err(ParseError::MissingValue { argument }) if argument == "--count[-c]"
        ));
        assert!(matches!(
            parser.parse(&["prog", "-c="]),
            Err(ParseError::MissingValue { .. })
        ));
    }

    #[test]
    fn bundles_apply_every_shortcut() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let x = parser
            .add_bool(ArgSpec::short('x').action(Action::StoreTrue))
            .unwrap();
        let y = parser
            .add_bool(ArgSpec::short('y').action(Action::StoreTrue))
            .unwrap();
        let z = parser.add_int(ArgSpec::short('z')).unwrap();
        let v = parser
            .add_int(ArgSpec::short('v').action(Action::Increment))
            .unwrap();

        parser.parse(&["prog", "-xyz10"]).unwrap();
        assert!(x.get() && y.get());
        assert_eq!(z.get(), 10);

        parser.parse(&["prog", "-vvxz=7"]).unwrap();
        assert_eq!(v.get(), 2);
        assert_eq!(z.get(), 7);
        assert!(!y.get());

        parser.parse(&["prog", "-xz", "3"]).unwrap();
        assert_eq!(z.get(), 3);

        parser.parse(&["prog", "-yz=", "4"]).unwrap();
        assert_eq!(z.get(), 4);
    }

    #[test]
    fn bundle_marks_every_member_as_set() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        parser.add_group("mode", "", false, true).unwrap();
        parser
            .add_bool(ArgSpec::short('x').action(Action::StoreTrue).group("mode"))
            .unwrap();
        parser
            .add_bool(ArgSpec::short('y').action(Action::StoreTrue).group("mode"))
            .unwrap();

        let err = parser.parse(&["prog", "-xy"]).unwrap_err();
        assert!(err.to_string().contains("more than one argument of group \"mode\""));
    }

    #[test]
    fn flag_actions() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let quiet = parser
            .add_bool(ArgSpec::new("--no-color").action(Action::StoreFalse))
            .unwrap();
        let level = parser
            .add_int(
                ArgSpec::new("--max")
                    .action(Action::StoreConst)
                    .default(1)
                    .constant(9),
            )
            .unwrap();
        let verbose = parser
            .add_int(ArgSpec::new("--verbose").shortcut('v').action(Action::Increment))
            .unwrap();

        parser.parse(&["prog"]).unwrap();
        assert!(quiet.get());
        assert_eq!(level.get(), 1);
        assert_eq!(verbose.get(), 0);

        // Inline text on a flag is ignored; no extra token is consumed.
        parser
            .parse(&["prog", "--no-color=yes", "--max", "-vvv", "--verbose="])
            .unwrap();
        assert!(!quiet.get());
        assert_eq!(level.get(), 9);
        assert_eq!(verbose.get(), 4);
    }

    #[test]
    fn positionals_bind_around_options() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let src = parser.add_string(ArgSpec::new("src")).unwrap();
        let dst = parser.add_string(ArgSpec::new("dst")).unwrap();
        let force = parser
            .add_bool(ArgSpec::new("--force").shortcut('f').action(Action::StoreTrue))
            .unwrap();

        parser.parse(&["prog", "a", "-f", "b"]).unwrap();
        assert_eq!((src.get(), dst.get(), force.get()), ("a".into(), "b".into(), true));

        // Tail tokens are reserved for positionals even if they look like flags.
        parser.parse(&["prog", "a", "-f"]).unwrap();
        assert_eq!((src.get(), dst.get(), force.get()), ("a".into(), "-f".into(), false));

        assert!(matches!(
            parser.parse(&["prog", "a"]),
            Err(ParseError::TooFewArguments { missing }) if missing == vec!["dst".to_string()]
        ));
    }

    #[test]
    fn values_reset_between_passes() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let count = parser
            .add_int(ArgSpec::new("--count").default(1))
            .unwrap();
        parser.parse(&["prog", "--count", "8"]).unwrap();
        assert_eq!(count.get(), 8);
        parser.parse(&["prog"]).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn invalid_and_rejected_values_fail_fast() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let level = parser
            .add_int(
                ArgSpec::new("--level")
                    .validator(|level: &i64| (1..=5).contains(level))
                    .default(1),
            )
            .unwrap();

        assert!(matches!(
            parser.parse(&["prog", "--level", "high"]),
            Err(ParseError::InvalidFormat { .. })
        ));
        let err = parser.parse(&["prog", "--level", "9"]).unwrap_err();
        assert_eq!(
            err.diagnostics(),
            vec!["invalid value \"9\" for argument --level, must meet custom restriction"]
        );
        assert_eq!(level.get(), 1);
    }

    #[test]
    fn mandatory_and_group_diagnostics_are_combined() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        parser
            .add_string(ArgSpec::new("--title").shortcut('t').mandatory(true))
            .unwrap();
        parser
            .add_string(ArgSpec::new("--body").mandatory(true))
            .unwrap();
        parser.add_group("target", "", true, true).unwrap();
        parser.add_int(ArgSpec::new("--id").shortcut('i').group("target")).unwrap();
        parser
            .add_bool(ArgSpec::new("--all").shortcut('a').action(Action::StoreTrue).group("target"))
            .unwrap();

        let err = parser.parse(&["prog"]).unwrap_err();
        assert_eq!(
            err.diagnostics(),
            vec![
                "argument --title[-t] has no value".to_string(),
                "argument --body has no value".to_string(),
                "no argument from group \"target\" (--id[-i],--all[-a]) was specified".to_string(),
            ]
        );

        let err = parser
            .parse(&["prog", "-t", "x", "--body", "y", "-i", "1", "-a"])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "more than one argument of group \"target\" was specified (--id[-i],--all[-a])"
        );

        parser.parse(&["prog", "-t", "x", "--body", "y", "-a"]).unwrap();
    }

    #[test]
    fn help_flag_short_circuits() {
        let mut parser = ArgParser::new("prog", "Demo").unwrap();
        parser.add_string(ArgSpec::new("file")).unwrap();
        let help = parser.help_handle().unwrap();

        let err = parser.parse(&["prog", "-h"]).unwrap_err();
        assert!(err.is_help());
        assert!(err.help_text().unwrap().starts_with("Usage: prog "));
        assert_eq!(help.get(), parser.help());

        let err = parser.parse(&["prog", "--HELP"]).unwrap_err();
        assert!(err.is_help());

        // Before the help flag, options are applied; afterwards nothing runs.
        let mut parser = ArgParser::new("prog", "").unwrap();
        parser.add_int(ArgSpec::new("--count").shortcut('c')).unwrap();
        assert!(parser.parse(&["prog", "-c", "2", "--help", "-c", "x"]).unwrap_err().is_help());
        // `h` is the attached value of `-c` here.
        assert!(!parser.parse(&["prog", "-ch"]).unwrap_err().is_help());
    }

    #[test]
    fn help_inside_a_bundle() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let x = parser
            .add_bool(ArgSpec::short('x').action(Action::StoreTrue))
            .unwrap();
        assert!(parser.parse(&["prog", "-xh"]).unwrap_err().is_help());
        assert!(x.get());
    }

    #[test]
    fn subcommand_dispatch() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let verbose = parser
            .add_int(ArgSpec::new("--verbose").shortcut('v').action(Action::Increment))
            .unwrap();
        let add = parser.add_subparser("add", "").unwrap();
        let count = add.add_int(ArgSpec::new("--count")).unwrap();
        parser.add_subparser("remove", "").unwrap();

        parser.parse(&["prog", "add", "--count", "3"]).unwrap();
        assert_eq!(parser.selected_subcommand(), "add");
        assert_eq!(parser.selected_path(), vec!["add"]);
        assert_eq!(count.get(), 3);
        assert_eq!(verbose.get(), 0);

        parser.parse(&["prog", "-v", "ADD"]).unwrap();
        assert_eq!(verbose.get(), 1);
        assert_eq!(count.get(), 0);

        parser.parse(&["prog"]).unwrap();
        assert_eq!(parser.selected_subcommand(), "");
    }

    #[test]
    fn child_errors_and_help_propagate() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        let add = parser.add_subparser("add", "Add things").unwrap();
        add.add_int(ArgSpec::new("--count")).unwrap();
        let root_help = parser.help_handle().unwrap();

        assert!(matches!(
            parser.parse(&["prog", "add", "--count", "x"]),
            Err(ParseError::InvalidFormat { .. })
        ));

        let err = parser.parse(&["prog", "add", "-h"]).unwrap_err();
        let text = err.help_text().unwrap().to_string();
        assert!(text.starts_with("Usage: add "));
        assert_eq!(root_help.get(), text);
    }

    #[test]
    fn required_subcommand() {
        let mut parser = ArgParser::new("prog", "").unwrap();
        parser.add_subparser("add", "").unwrap();
        parser.add_subparser("remove", "").unwrap();
        parser.set_subparser_required(true);

        assert_eq!(
            parser.parse(&["prog"]),
            Err(ParseError::SubcommandRequired {
                available: vec!["add".to_string(), "remove".to_string()],
                suggestion: None,
            })
        );
        assert_eq!(
            parser.parse(&["prog", "remve"]),
            Err(ParseError::SubcommandRequired {
                available: vec!["add".to_string(), "remove".to_string()],
                suggestion: Some("remove".to_string()),
            })
        );

        parser.set_subparser_required(false);
        assert_eq!(parser.parse(&["prog", "stray", "tokens"]), Ok(()));
    }

    #[test]
    fn custom_prefix_flows_through() {
        let settings = ParserSettings {
            prefix: '+',
            ..ParserSettings::default()
        };
        let mut parser = ArgParser::with_settings("prog", "", settings).unwrap();
        let count = parser.add_int(ArgSpec::new("++count").shortcut('c')).unwrap();
        parser.parse(&["prog", "+c", "4"]).unwrap();
        assert_eq!(count.get(), 4);
        assert!(parser.parse(&["prog", "++help"]).unwrap_err().is_help());
    }
}
