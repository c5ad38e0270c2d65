//! Merging shared parameters into a resolved command.
//!
//! Every invocation is classified against the resolved node's own vocabulary
//! plus the tree's [`SharedParameters`] (and the reserved help vocabulary when
//! auto-help is on). The merge always builds a new [`Command`]; the catalog
//! node it starts from is left untouched.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let tree = CommandTree::new(Command::new("app").with_flag(Flag::short('q')))
//!     .with_shared(SharedParameters {
//!         flags: vec![Flag::new(Some('v'), Some("verbose"))],
//!         ..Default::default()
//!     });
//!
//! let effective = tree.effective_command(&tree.root);
//! assert_eq!(effective.flags.len(), 3); // -q, --verbose, --help
//! assert_eq!(tree.root.flags.len(), 1);
//! ```

use crate::types::{
    Argument, Command, CommandTree, Flag, HELP_ARG, HELP_LONG, HELP_SHORT, SharedParameters,
};

/// The reserved `-h/--help` flag injected by auto-help.
pub fn help_flag() -> Flag {
    Flag::new(Some(HELP_SHORT), Some(HELP_LONG)).with_description("Show help")
}

/// The reserved `?` positional injected by auto-help.
pub fn help_arg() -> Argument {
    Argument {
        name: HELP_ARG.to_string(),
        description: "Show help".to_string(),
        value: Some(HELP_ARG.to_string()),
    }
}

/// Returns a copy of `command` with `shared` appended to each vocabulary
/// list, followed by the help vocabulary when `auto_help` is set.
///
/// Subcommands are carried over unchanged.
pub fn merge_shared(command: &Command, shared: &SharedParameters, auto_help: bool) -> Command {
    let mut merged = command.clone();

    merged.flags.extend(shared.flags.iter().cloned());
    merged.args.extend(shared.args.iter().cloned());
    merged.arg_sets.extend(shared.arg_sets.iter().cloned());
    merged.opts.extend(shared.opts.iter().cloned());

    if auto_help {
        merged.flags.push(help_flag());
        merged.args.push(help_arg());
    }

    merged
}

impl CommandTree {
    /// Builds the vocabulary a resolved `node` is classified against.
    ///
    /// See [`merge_shared`].
    pub fn effective_command(&self, node: &Command) -> Command {
        merge_shared(node, &self.shared, self.auto_help)
    }
}
