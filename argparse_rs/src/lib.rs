//! # argparse
//!
//! **Command-line argument parsing engine** - typed value cells, shortcut
//! bundles, argument groups and nested subcommands.
//!
//! ## Features
//!
//! - **Typed values** - integer, string and boolean arguments bound to live handles
//! - **Flag forms** - `--name value`, `--name=value`, `-n value`, `-n=value`, `-nvalue`
//! - **Shortcut bundles** - `-xyz10` sets `-x`, `-y` and `-z 10` in one token
//! - **Groups** - required and/or mutually exclusive argument sets
//! - **Subcommands** - nested parsers with "did you mean" hints
//! - **Help** - usage and help text rendered from the registered tree
//!
//! ## Quick Start
//!
//! ```rust
//! use argparse::{Action, ArgParser, ArgSpec};
//!
//! let mut parser = ArgParser::new("notes", "Keep notes").unwrap();
//! let verbose = parser
//!     .add_int(ArgSpec::new("--verbose").shortcut('v').action(Action::Increment))
//!     .unwrap();
//!
//! let add = parser.add_subparser("add", "Add a note").unwrap();
//! let text = add.add_string(ArgSpec::new("text")).unwrap();
//! let pin = add
//!     .add_bool(ArgSpec::new("--pin").shortcut('p').action(Action::StoreTrue))
//!     .unwrap();
//!
//! parser.parse(&["notes", "-vv", "add", "-p", "buy milk"]).unwrap();
//! assert_eq!(verbose.get(), 2);
//! assert_eq!(parser.selected_subcommand(), "add");
//! assert_eq!(text.get(), "buy milk");
//! assert!(pin.get());
//! ```
//!
//! ## Help Requests
//!
//! The help flag ends a pass with [`ParseError::HelpRequested`], which carries
//! the rendered text:
//!
//! ```rust
//! use argparse::ArgParser;
//!
//! let mut parser = ArgParser::new("notes", "").unwrap();
//! let err = parser.parse(&["notes", "--help"]).unwrap_err();
//! assert!(err.is_help());
//! assert!(err.help_text().unwrap().starts_with("Usage: notes"));
//! ```
//!
//! ## Threading
//!
//! A parser tree and its handles are single-writer: values live in
//! `Rc<RefCell<_>>` slots, so a tree stays on one thread and runs one pass at
//! a time.

// ============================================================================
// Core Modules
// ============================================================================

/// Registration and parse errors.
pub mod error;

/// Value cells and the handles returned at registration.
pub mod value;

/// Argument definitions and the [`ArgSpec`] builder.
pub mod argument;

/// Required / exclusive argument groups.
pub mod group;

/// Lettering rules for parser, group and argument names.
pub mod naming;

/// Pure token classification.
pub mod classify;

/// Parser nodes: registration, parse engine, help rendering.
///
/// # Submodules
///
/// - `registry` - argument, group and subparser registration
/// - `core` - the parse pass
/// - `help` - usage and help text
pub mod parser;

/// Splitting a text line into tokens.
pub mod tokenizer;

// ============================================================================
// Support Modules
// ============================================================================

/// Parser settings loaded from `.argparse/config.toml`.
pub mod config;

/// The `argparse-demo` front end.
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use argument::{Action, ArgSpec, Argument};
pub use classify::{Category, FlagTable, ShortcutKind, StaticTable, classify};
pub use config::ParserSettings;
pub use error::{ParseError, RegistrationError, ValueError};
pub use group::ArgGroup;
pub use parser::ArgParser;
pub use tokenizer::string_to_argv;
pub use value::{Handle, Scalar, TypedCell, ValueCell, ValueKind, Validator};
