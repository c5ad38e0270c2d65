//! Catalog validation.
//!
//! The resolver and classifier accept any catalog: duplicate sibling names
//! simply shadow one another and unusable names never match. Validation
//! catches these authoring mistakes up front.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::*;
//!
//! let tree = CommandTree::new(Command::new("git").with_flag(Flag::new(Some('v'), Some("verbose"))));
//! assert!(validate_tree(&tree).is_empty());
//!
//! // Invalid: long name written with its dashes
//! let bad = CommandTree::new(Command::new("git").with_flag(Flag::long("--verbose")));
//! assert!(!validate_tree(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{Command, CommandTree, Flag, HELP_LONG, HELP_SHORT, Opt};

/// Catalog validation errors.
///
/// Each variant names the command path (space separated, root first) where
/// the problem was found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty, whitespace, or starts with `-`.
    #[error("invalid command name at `{0}`")]
    InvalidCommandName(String),
    /// Two children of the same command share a name.
    #[error("duplicate subcommand `{name}` under `{path}`")]
    DuplicateSubcommand { path: String, name: String },
    /// A flag or option has neither a short nor a long name.
    #[error("flag or option without a name in `{0}`")]
    MissingName(String),
    /// Short name cannot be typed as `-x`.
    #[error("invalid short name '{name}' in `{path}`")]
    InvalidShortName { path: String, name: char },
    /// Long name cannot be typed as `--name`.
    #[error("invalid long name `{name}` in `{path}`")]
    InvalidLongName { path: String, name: String },
    /// Two flags/options of the same command share a name.
    #[error("duplicate name `{name}` in `{path}`")]
    DuplicateName { path: String, name: String },
    /// A command declares a name reserved for auto-help.
    #[error("`{name}` in `{path}` is reserved for help")]
    ReservedHelpName { path: String, name: String },
}

/// Validates a catalog, including its shared parameters.
///
/// Shared parameters are checked first, then the root and each subtree in
/// declaration order. Every problem found is reported; a command whose own
/// name is invalid is not descended into, and a shadowed duplicate sibling is
/// skipped.
pub fn validate_tree(tree: &CommandTree) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let shared_path = format!("{} (shared)", tree.root.name);
    let shared = names(&tree.shared.flags, &tree.shared.opts);
    let mut seen = HashSet::new();
    for (short, long) in &shared {
        check_names(*short, *long, &shared_path, tree.auto_help, &mut seen, &mut errors);
    }

    let mut path = Vec::new();
    validate_command(&tree.root, &mut path, tree, &shared, &mut errors);
    errors
}

type Names<'a> = Vec<(Option<char>, Option<&'a str>)>;

fn names<'a>(flags: &'a [Flag], opts: &'a [Opt]) -> Names<'a> {
    flags
        .iter()
        .map(|f| (f.short, f.long.as_deref()))
        .chain(opts.iter().map(|o| (o.short, o.long.as_deref())))
        .collect()
}

fn validate_command(
    command: &Command,
    path: &mut Vec<String>,
    tree: &CommandTree,
    shared: &Names<'_>,
    errors: &mut Vec<ValidationError>,
) {
    path.push(command.name.clone());
    let here = path.join(" ");

    let name = command.name.trim();
    if name.is_empty() || name != command.name || name.starts_with('-') {
        errors.push(ValidationError::InvalidCommandName(here));
        path.pop();
        return;
    }

    let mut seen = HashSet::new();
    for (short, long) in names(&command.flags, &command.opts) {
        check_names(short, long, &here, tree.auto_help, &mut seen, errors);
    }

    // Shared entries were checked on their own; only clashes with this
    // command's entries are new.
    for (short, long) in shared {
        let clashes = short
            .map(|s| format!("-{s}"))
            .into_iter()
            .chain(long.map(|l| format!("--{l}")))
            .filter(|n| seen.contains(n));
        for name in clashes {
            errors.push(ValidationError::DuplicateName {
                path: here.clone(),
                name,
            });
        }
    }

    let mut siblings: HashSet<&str> = HashSet::new();
    for sub in &command.subcommands {
        if !siblings.insert(sub.name.as_str()) {
            errors.push(ValidationError::DuplicateSubcommand {
                path: here.clone(),
                name: sub.name.clone(),
            });
            continue;
        }
        validate_command(sub, path, tree, shared, errors);
    }

    path.pop();
}

fn check_names(
    short: Option<char>,
    long: Option<&str>,
    path: &str,
    auto_help: bool,
    seen: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    if short.is_none() && long.is_none() {
        errors.push(ValidationError::MissingName(path.to_string()));
        return;
    }

    if let Some(short) = short {
        let name = format!("-{short}");
        if short == '-' || short == '=' || short.is_whitespace() {
            errors.push(ValidationError::InvalidShortName {
                path: path.to_string(),
                name: short,
            });
        } else if auto_help && short == HELP_SHORT {
            errors.push(ValidationError::ReservedHelpName {
                path: path.to_string(),
                name,
            });
        } else if !seen.insert(name.clone()) {
            errors.push(ValidationError::DuplicateName {
                path: path.to_string(),
                name,
            });
        }
    }

    if let Some(long) = long {
        let name = format!("--{long}");
        if long.is_empty()
            || long.starts_with('-')
            || long.contains('=')
            || long.chars().any(char::is_whitespace)
        {
            errors.push(ValidationError::InvalidLongName {
                path: path.to_string(),
                name: long.to_string(),
            });
        } else if auto_help && long == HELP_LONG {
            errors.push(ValidationError::ReservedHelpName {
                path: path.to_string(),
                name,
            });
        } else if !seen.insert(name.clone()) {
            errors.push(ValidationError::DuplicateName {
                path: path.to_string(),
                name,
            });
        }
    }
}
