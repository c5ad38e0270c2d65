//! The full resolve → merge → classify pipeline.

use crate::classify::{ClassifyConfig, classify_with};
use crate::error::Result;
use crate::resolve::resolve;
use crate::types::{Command, CommandTree, Invocation};

/// Result of parsing one invocation against a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// Child names beneath the root leading to the invoked command
    pub path: Vec<String>,
    /// The invoked command with shared parameters merged in
    pub command: Command,
    /// What the user specified
    pub invocation: Invocation,
}

impl Parsed {
    /// Returns `true` if help was asked for and the command allows it.
    pub fn wants_help(&self, tree: &CommandTree) -> bool {
        tree.auto_help && !self.command.hide_help && self.invocation.help_requested()
    }
}

/// Parses `tokens` against `tree` with the default classifier settings.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, CommandTree, Flag, parse};
///
/// let tree = CommandTree::new(
///     Command::new("app").with_subcommand(Command::new("run").with_flag(Flag::short('q'))),
/// );
///
/// let parsed = parse(&["app", "run", "-q", "job"], &tree).unwrap();
/// assert_eq!(parsed.path, vec!["run"]);
/// assert!(parsed.invocation.has_flag("q"));
/// assert!(!parsed.wants_help(&tree));
///
/// let parsed = parse(&["app", "run", "--help"], &tree).unwrap();
/// assert!(parsed.wants_help(&tree));
/// ```
pub fn parse<S: AsRef<str>>(tokens: &[S], tree: &CommandTree) -> Result<Parsed> {
    parse_with(tokens, tree, &ClassifyConfig::default())
}

/// Parses `tokens` against `tree`.
///
/// # Errors
///
/// Any [`ParseError`](crate::ParseError) from resolution or classification.
pub fn parse_with<S: AsRef<str>>(
    tokens: &[S],
    tree: &CommandTree,
    config: &ClassifyConfig,
) -> Result<Parsed> {
    let resolution = resolve(tokens, tree)?;
    let command = tree.effective_command(resolution.command);
    let invocation = classify_with(tokens, &command, config)?;

    Ok(Parsed {
        path: resolution.path,
        command,
        invocation,
    })
}
