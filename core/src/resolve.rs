//! Command-tree resolution.
//!
//! [`resolve`] walks the leading tokens of an invocation down the catalog,
//! one exact child name at a time, and stops at the first token that is an
//! option-like (`-`-prefixed) token or does not name a child. The walk is
//! greedy and never backtracks.

use crate::error::{ParseError, Result};
use crate::types::{Command, CommandTree};

/// The command a token sequence resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'t> {
    /// Deepest catalog node reached
    pub command: &'t Command,
    /// Child names walked beneath the root, ending with `command`'s name
    /// (empty when the root itself was matched)
    pub path: Vec<String>,
}

impl Resolution<'_> {
    /// Depth of the matched node, counting the root as 0.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Resolves which command `tokens` invoke.
///
/// # Errors
///
/// Returns [`ParseError::NoTokens`] for an empty sequence and
/// [`ParseError::CommandNotFound`] when the first token is not the root
/// command's name.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, CommandTree, resolve};
///
/// let tree = CommandTree::new(
///     Command::new("git").with_subcommand(
///         Command::new("remote").with_subcommand(Command::new("add")),
///     ),
/// );
///
/// let found = resolve(&["git", "remote", "add", "origin"], &tree).unwrap();
/// assert_eq!(found.command.name, "add");
/// assert_eq!(found.path, vec!["remote", "add"]);
///
/// // An option-like token ends the walk even if a child has that name.
/// let found = resolve(&["git", "-v", "remote"], &tree).unwrap();
/// assert_eq!(found.command.name, "git");
/// ```
pub fn resolve<'t, S: AsRef<str>>(tokens: &[S], tree: &'t CommandTree) -> Result<Resolution<'t>> {
    let (first, rest) = tokens.split_first().ok_or(ParseError::NoTokens)?;

    let root = &tree.root;
    if first.as_ref() != root.name {
        return Err(ParseError::CommandNotFound {
            expected: root.name.clone(),
            found: first.as_ref().to_string(),
        });
    }

    let mut current = root;
    let mut path = Vec::new();

    for token in rest {
        let token = token.as_ref();
        if token.starts_with('-') {
            break;
        }
        match current.find_subcommand(token) {
            Some(child) => {
                current = child;
                path.push(token.to_string());
            }
            None => break,
        }
    }

    Ok(Resolution {
        command: current,
        path,
    })
}
