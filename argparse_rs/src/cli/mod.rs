//! Demo front end: a small note-taking command tree driven by the engine.
//!
//! # Module Structure
//!
//! - [`demo`] - the command tree and the result report
//! - [`entrypoint`] - process entry: settings, logging, output and exit codes

pub mod demo;
pub mod entrypoint;

pub use demo::{DemoTree, Report, build_tree};
pub use entrypoint::{EntryOptions, run};
