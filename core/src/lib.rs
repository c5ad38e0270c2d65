//! Command tree resolution and token classification.
//!
//! This crate turns a flat list of command-line tokens into a structured
//! invocation, given a static catalog of commands:
//!
//! - [`CommandTree`] / [`Command`]: the catalog of named commands with
//!   declared [`Flag`]s, [`Opt`]s, [`Argument`]s and nested subcommands.
//! - [`resolve`]: walks the tokens down the tree to the invoked command.
//! - [`classify`]: sorts the remaining tokens into flags, options and
//!   positional arguments, producing an [`Invocation`].
//! - [`parse`]: both steps, with the tree's shared parameters merged in.
//! - [`Dispatcher`]: runs pre-action, action and post-action
//!   [`Handler`]s for a parsed invocation, or returns help text.
//!
//! Resolution and classification are pure: they never print, log, or mutate
//! the catalog, so one tree can serve any number of concurrent parses.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let brown = Command::new("brown")
//!     .with_flag(Flag::short('b'))
//!     .with_opt(Opt::new(Some('f'), Some("LongF")))
//!     .with_opt(Opt::short('g'));
//! let tree = CommandTree::new(
//!     Command::new("the").with_subcommand(Command::new("quick").with_subcommand(brown)),
//! );
//!
//! let tokens = ["the", "quick", "brown", "fox", "-g", "val", "--LongF", "val2"];
//! let parsed = parse(&tokens, &tree).unwrap();
//!
//! assert_eq!(parsed.path, vec!["quick", "brown"]);
//! assert_eq!(parsed.invocation.positionals(), vec!["fox"]);
//! assert_eq!(parsed.invocation.opt_value("g"), Some("val"));
//! assert_eq!(parsed.invocation.opt_value("LongF"), Some("val2"));
//! ```

mod classify;
mod dispatch;
mod error;
mod help;
mod merge;
mod parse;
mod resolve;
mod types;
mod validate;

pub use classify::{ClassifyConfig, MissingValuePolicy, classify, classify_with};
pub use dispatch::{
    DispatchError, DispatchOutcome, DispatchReport, Dispatcher, Handler, HandlerError,
    HandlerRegistry, Stage,
};
pub use error::ParseError;
pub use help::{render_help, render_tree};
pub use merge::{help_arg, help_flag, merge_shared};
pub use parse::{Parsed, parse, parse_with};
pub use resolve::{Resolution, resolve};
pub use types::*;
pub use validate::{ValidationError, validate_tree};
