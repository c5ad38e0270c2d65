//! Invocation dispatch.
//!
//! A [`Dispatcher`] ties a read-only [`CommandTree`] to a [`HandlerRegistry`]
//! of callbacks. Callbacks live outside the catalog: the tree stays plain
//! data, and the registry maps command paths to [`Handler`]s.
//!
//! Dispatching parses the tokens, then either returns rendered help (when
//! auto-help applies) or runs the shared pre-action, the command's action,
//! and the shared post-action in that order. The returned
//! [`DispatchReport`] records which of them ran.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let tree = CommandTree::new(
//!     Command::new("app").with_subcommand(Command::new("run").with_flag(Flag::short('q'))),
//! );
//! let handlers = HandlerRegistry::new()
//!     .action(&["run"], |inv: &Invocation| -> Result<(), HandlerError> {
//!         assert!(inv.has_flag("q"));
//!         Ok(())
//!     })
//!     .post_action(|_: &Invocation| -> Result<(), HandlerError> { Ok(()) });
//!
//! let dispatcher = Dispatcher::new(&tree, handlers);
//! match dispatcher.dispatch(&["app", "run", "-q"]).unwrap() {
//!     DispatchOutcome::Ran(report) => {
//!         assert_eq!(report.fired, vec![Stage::Action, Stage::PostAction]);
//!     }
//!     DispatchOutcome::Help { .. } => unreachable!(),
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::classify::ClassifyConfig;
use crate::error::ParseError;
use crate::help::render_help;
use crate::parse::{Parsed, parse_with};
use crate::types::{Command, CommandTree, Invocation};

/// Error type handlers may return.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A callback run for an invocation.
///
/// Implemented for any `Fn(&Invocation) -> Result<(), HandlerError>`.
pub trait Handler: Send + Sync {
    fn call(&self, invocation: &Invocation) -> Result<(), HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&Invocation) -> Result<(), HandlerError> + Send + Sync,
{
    fn call(&self, invocation: &Invocation) -> Result<(), HandlerError> {
        self(invocation)
    }
}

/// The point in dispatch at which a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PreAction,
    Action,
    PostAction,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PreAction => "pre-action",
            Self::Action => "action",
            Self::PostAction => "post-action",
        };
        f.write_str(name)
    }
}

/// Callbacks keyed by command path.
///
/// Paths are child names beneath the root, as in
/// [`Resolution::path`](crate::Resolution::path); the empty path is the root.
#[derive(Default)]
pub struct HandlerRegistry {
    pre_action: Option<Box<dyn Handler>>,
    post_action: Option<Box<dyn Handler>>,
    actions: HashMap<Vec<String>, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the handler run before every action.
    pub fn pre_action(mut self, handler: impl Handler + 'static) -> Self {
        self.pre_action = Some(Box::new(handler));
        self
    }

    /// Sets the handler run after every action.
    pub fn post_action(mut self, handler: impl Handler + 'static) -> Self {
        self.post_action = Some(Box::new(handler));
        self
    }

    /// Sets the action for the command at `path`.
    pub fn action(mut self, path: &[&str], handler: impl Handler + 'static) -> Self {
        let key = path.iter().map(|s| s.to_string()).collect();
        self.actions.insert(key, Box::new(handler));
        self
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<String> = self.actions.keys().map(|p| p.join(" ")).collect();
        paths.sort();
        f.debug_struct("HandlerRegistry")
            .field("pre_action", &self.pre_action.is_some())
            .field("post_action", &self.post_action.is_some())
            .field("actions", &paths)
            .finish()
    }
}

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Path of the invoked command beneath the root
    pub path: Vec<String>,
    /// What the user specified
    pub invocation: Invocation,
    /// Stages whose handler ran, in order
    pub fired: Vec<Stage>,
}

impl DispatchReport {
    /// Returns `true` if the handler for `stage` ran.
    pub fn fired(&self, stage: Stage) -> bool {
        self.fired.contains(&stage)
    }
}

/// Result of [`Dispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Help was requested; no handler ran.
    Help { path: Vec<String>, text: String },
    /// Handlers ran as reported.
    Ran(DispatchReport),
}

/// Dispatch failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The tokens did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A handler returned an error; later stages did not run.
    #[error("{stage} for `{path}` failed: {source}")]
    Handler {
        stage: Stage,
        path: String,
        #[source]
        source: HandlerError,
    },
}

/// Parses invocations against a tree and runs the registered handlers.
pub struct Dispatcher<'t> {
    tree: &'t CommandTree,
    handlers: HandlerRegistry,
    config: ClassifyConfig,
    help: fn(&Command) -> String,
}

impl<'t> Dispatcher<'t> {
    /// Creates a dispatcher with default classifier settings and the
    /// built-in help renderer.
    pub fn new(tree: &'t CommandTree, handlers: HandlerRegistry) -> Self {
        Self {
            tree,
            handlers,
            config: ClassifyConfig::default(),
            help: render_help,
        }
    }

    /// Replaces the classifier settings.
    pub fn with_config(mut self, config: ClassifyConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the help renderer.
    pub fn with_help_renderer(mut self, render: fn(&Command) -> String) -> Self {
        self.help = render;
        self
    }

    /// Parses `tokens` and runs the matching handlers.
    ///
    /// # Errors
    ///
    /// [`DispatchError::Parse`] if the tokens do not parse, or
    /// [`DispatchError::Handler`] for the first handler that fails.
    pub fn dispatch<S: AsRef<str>>(&self, tokens: &[S]) -> Result<DispatchOutcome, DispatchError> {
        let parsed = parse_with(tokens, self.tree, &self.config)?;
        let wants_help = parsed.wants_help(self.tree);
        let Parsed {
            path,
            command,
            invocation,
        } = parsed;
        debug!(path = %path.join(" "), command = %command.name, "resolved invocation");

        if wants_help {
            debug!(command = %command.name, "help requested");
            return Ok(DispatchOutcome::Help {
                path,
                text: (self.help)(&command),
            });
        }

        let stages = [
            (Stage::PreAction, self.handlers.pre_action.as_deref()),
            (Stage::Action, self.handlers.actions.get(&path).map(|h| h.as_ref())),
            (Stage::PostAction, self.handlers.post_action.as_deref()),
        ];

        let mut fired = Vec::new();
        for (stage, handler) in stages {
            let Some(handler) = handler else {
                continue;
            };
            if let Err(source) = handler.call(&invocation) {
                warn!(%stage, path = %path.join(" "), error = %source, "handler failed");
                return Err(DispatchError::Handler {
                    stage,
                    path: path.join(" "),
                    source,
                });
            }
            debug!(%stage, "handler ran");
            fired.push(stage);
        }

        Ok(DispatchOutcome::Ran(DispatchReport {
            path,
            invocation,
            fired,
        }))
    }
}
