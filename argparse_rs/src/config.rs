//! Parser settings.
//!
//! Loads optional `.argparse/config.toml` from a project root. Settings shape
//! how a parser tree is built (flag prefix, help flag, suggestions); they never
//! supply argument values.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Construction-time knobs shared by a parser and all of its subparsers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Flag prefix character (`-` gives `--name` and `-n`).
    pub prefix: char,
    /// Register `<prefix><prefix>help` automatically.
    pub include_help: bool,
    /// Shortcut for the automatic help flag.
    pub help_shortcut: Option<char>,
    /// Maximum edit distance for "did you mean" subcommand hints; 0 disables them.
    pub suggestion_distance: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            prefix: '-',
            include_help: true,
            help_shortcut: Some('h'),
            suggestion_distance: 2,
        }
    }
}

impl ParserSettings {
    /// Settings without the automatic help flag.
    pub fn without_help() -> Self {
        Self {
            include_help: false,
            ..Self::default()
        }
    }

    /// Load settings from `.argparse/config.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist or is invalid.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(".argparse").join("config.toml");
        Self::load_from_path(&config_path)
    }

    /// Load settings from a specific path.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
