//! Token classification.
//!
//! A raw token is sorted into one of ten categories using only the owning
//! parser's registered names and shortcuts. Classification is pure and is
//! re-evaluated for every token.
//!
//! | token         | category                                   |
//! |---------------|--------------------------------------------|
//! | `--zeta`      | [`Category::Name`]                         |
//! | `-z`          | [`Category::Shortcut`]                     |
//! | `-xyz`        | [`Category::ShortcutGroup`]                |
//! | `--zeta=1337` | [`Category::NameValue`]                    |
//! | `-z=1337`     | [`Category::ShortcutValue`]                |
//! | `-xyz=1337`   | [`Category::ShortcutGroupValue`]           |
//! | `--zeta=`     | [`Category::NameEq`]                       |
//! | `-z=`         | [`Category::ShortcutEq`]                   |
//! | `-xyz=`       | [`Category::ShortcutGroupEq`]              |
//! | anything else | [`Category::Value`]                        |

use std::collections::HashMap;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Name,
    Shortcut,
    ShortcutGroup,
    NameValue,
    ShortcutValue,
    ShortcutGroupValue,
    NameEq,
    ShortcutEq,
    ShortcutGroupEq,
    Value,
}

/// How a registered shortcut behaves inside a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKind {
    /// No value consumed (boolean, constant, increment, help).
    Flag,
    /// Consumes a value; any text attached after it in the token is that value.
    TakesValue,
}

/// Read-only view of a parser's registered flags.
pub trait FlagTable {
    fn prefix(&self) -> char;

    /// Case-insensitive lookup of a full flag name such as `--count`.
    fn has_name(&self, name: &str) -> bool;

    fn shortcut_kind(&self, shortcut: char) -> Option<ShortcutKind>;
}

/// Classify one raw token against `table`.
pub fn classify<T: FlagTable + ?Sized>(table: &T, token: &str) -> Category {
    let prefix = table.prefix();

    let Some(rest) = token.strip_prefix(prefix) else {
        return Category::Value;
    };

    // A lone prefix or doubled prefix is a literal value.
    if rest.is_empty() {
        return Category::Value;
    }
    if let Some(long) = rest.strip_prefix(prefix) {
        if long.is_empty() {
            return Category::Value;
        }
        return classify_name(table, token);
    }

    classify_shortcuts(table, rest)
}

fn classify_name<T: FlagTable + ?Sized>(table: &T, token: &str) -> Category {
    match token.split_once('=') {
        None if table.has_name(token) => Category::Name,
        None => Category::Value,
        Some((name, _)) if !table.has_name(name) => Category::Value,
        Some((_, "")) => Category::NameEq,
        Some(_) => Category::NameValue,
    }
}

fn classify_shortcuts<T: FlagTable + ?Sized>(table: &T, letters: &str) -> Category {
    let mut count = 0usize;

    for (pos, c) in letters.char_indices() {
        match table.shortcut_kind(c) {
            Some(kind) => {
                count += 1;
                let attached = &letters[pos + c.len_utf8()..];
                if kind == ShortcutKind::TakesValue
                    && !attached.is_empty()
                    && !attached.starts_with('=')
                {
                    // `-c5`, `-xyz10`: the rest of the token is the value.
                    return Category::ShortcutGroup;
                }
            }
            None if c == '=' && count > 0 => {
                let trailing = pos + 1 == letters.len();
                return match (count, trailing) {
                    (1, true) => Category::ShortcutEq,
                    (1, false) => Category::ShortcutValue,
                    (_, true) => Category::ShortcutGroupEq,
                    (_, false) => Category::ShortcutGroupValue,
                };
            }
            None => return Category::Value,
        }
    }

    if count == 1 {
        Category::Shortcut
    } else {
        Category::ShortcutGroup
    }
}

/// A standalone [`FlagTable`] built from plain sets, handy for classifying
/// without a parser.
#[derive(Debug, Clone)]
pub struct StaticTable {
    prefix: char,
    names: HashSet<String>,
    shortcuts: HashMap<char, ShortcutKind>,
}

impl StaticTable {
    pub fn new(prefix: char) -> Self {
        Self {
            prefix,
            names: HashSet::new(),
            shortcuts: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.names.insert(name.to_lowercase());
        self
    }

    pub fn with_shortcut(mut self, shortcut: char, kind: ShortcutKind) -> Self {
        self.shortcuts.insert(shortcut, kind);
        self
    }
}

impl FlagTable for StaticTable {
    fn prefix(&self) -> char {
        self.prefix
    }

    fn has_name(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    fn shortcut_kind(&self, shortcut: char) -> Option<ShortcutKind> {
        self.shortcuts.get(&shortcut).copied()
    }
}
