//! Command catalog type definitions.
//!
//! This module defines the data model shared by the resolver and the
//! classifier. The same shapes play two roles: *templates* declared in the
//! catalog (names and descriptions, never values) and *observations* recorded
//! in an [`Invocation`] (only what the user actually typed). All types
//! serialize with [`serde`] so catalogs can be stored as JSON or YAML.

use serde::{Deserialize, Serialize};

/// Reserved short flag that requests help when auto-help is enabled.
pub const HELP_SHORT: char = 'h';

/// Reserved long flag that requests help when auto-help is enabled.
pub const HELP_LONG: &str = "help";

/// Reserved positional value that requests help when auto-help is enabled.
pub const HELP_ARG: &str = "?";

/// A boolean switch identified by a short and/or long name.
///
/// Names are stored without their leading dashes: the flag typed as `-v` or
/// `--verbose` is declared as `Flag::new(Some('v'), Some("verbose"))`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Flag;
///
/// let verbose = Flag::new(Some('v'), Some("verbose"))
///     .with_description("Enable verbose output");
/// assert!(verbose.matches_short('v'));
/// assert!(verbose.matches_long("verbose"));
/// assert!(!verbose.matches_long("v"));
/// assert!(verbose.same_identity(&Flag::long("verbose")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Short form, typed as `-x`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Long form, typed as `--name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Help text (display only)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Flag {
    /// Creates a flag with the given short and long names.
    pub fn new(short: Option<char>, long: Option<&str>) -> Self {
        Self {
            short,
            long: long.map(String::from),
            description: String::new(),
        }
    }

    /// Creates a flag with only a short name.
    pub fn short(short: char) -> Self {
        Self::new(Some(short), None)
    }

    /// Creates a flag with only a long name.
    pub fn long(long: &str) -> Self {
        Self::new(None, Some(long))
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Returns `true` if `c` is this flag's short name.
    pub fn matches_short(&self, c: char) -> bool {
        self.short == Some(c)
    }

    /// Returns `true` if `name` is this flag's long name.
    pub fn matches_long(&self, name: &str) -> bool {
        self.long.as_deref() == Some(name)
    }

    /// Returns `true` if both flags share a short name or a long name.
    pub fn same_identity(&self, other: &Flag) -> bool {
        (self.short.is_some() && self.short == other.short)
            || (self.long.is_some() && self.long == other.long)
    }

    /// Returns `true` if this flag uses one of the reserved help names.
    pub fn is_help(&self) -> bool {
        self.matches_short(HELP_SHORT) || self.matches_long(HELP_LONG)
    }
}

/// A named switch that takes the following token as its value.
///
/// Catalog templates leave `value` empty; the classifier fills it in on the
/// copy recorded in the [`Invocation`].
///
/// # Examples
///
/// ```
/// use cmdtree_core::Opt;
///
/// let output = Opt::new(Some('o'), Some("output")).with_description("Output file");
/// assert!(output.value.is_none());
///
/// let observed = Opt::short('o').with_value("out.txt");
/// assert_eq!(observed.value.as_deref(), Some("out.txt"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opt {
    /// Short form, typed as `-x VALUE`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Long form, typed as `--name VALUE`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Help text (display only)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Observed value; never set on catalog templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Opt {
    /// Creates an option with the given short and long names.
    pub fn new(short: Option<char>, long: Option<&str>) -> Self {
        Self {
            short,
            long: long.map(String::from),
            description: String::new(),
            value: None,
        }
    }

    /// Creates an option with only a short name.
    pub fn short(short: char) -> Self {
        Self::new(Some(short), None)
    }

    /// Creates an option with only a long name.
    pub fn long(long: &str) -> Self {
        Self::new(None, Some(long))
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Sets the observed value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Returns `true` if `c` is this option's short name.
    pub fn matches_short(&self, c: char) -> bool {
        self.short == Some(c)
    }

    /// Returns `true` if `name` is this option's long name.
    pub fn matches_long(&self, name: &str) -> bool {
        self.long.as_deref() == Some(name)
    }

    /// Returns `true` if both options share a short name or a long name.
    pub fn same_identity(&self, other: &Opt) -> bool {
        (self.short.is_some() && self.short == other.short)
            || (self.long.is_some() && self.long == other.long)
    }
}

/// A positional argument.
///
/// In the catalog an argument is a named slot with a description. In an
/// [`Invocation`] it only carries the `value` the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Slot name shown in usage lines (e.g. `<file>`)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Help text (display only)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Observed positional value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Argument {
    /// Creates a named catalog argument.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Creates an observed positional value.
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Returns `true` if this argument carries the reserved help value.
    pub fn is_help(&self) -> bool {
        self.value.as_deref() == Some(HELP_ARG)
    }
}

/// One allowed shape of positional arguments.
///
/// Argument sets are advisory: they feed help output but the classifier does
/// not check positionals against them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSet {
    /// Arguments in positional order
    pub args: Vec<Argument>,
}

impl ArgumentSet {
    /// Creates an argument set from slot names.
    pub fn of(names: &[&str]) -> Self {
        Self {
            args: names.iter().map(|name| Argument::named(name)).collect(),
        }
    }
}

/// A node in the command catalog.
///
/// Commands form a tree through `subcommands`. Sibling names are expected to
/// be unique; lookups return the first declared match.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Argument, Command, Flag, Opt};
///
/// let commit = Command::new("commit")
///     .with_description("Record changes")
///     .with_flag(Flag::new(Some('a'), Some("all")))
///     .with_opt(Opt::new(Some('m'), Some("message")))
///     .with_arg(Argument::named("pathspec"));
///
/// let git = Command::new("git").with_subcommand(commit);
/// assert_eq!(git.find_subcommand("commit").unwrap().flags.len(), 1);
/// assert!(git.find_subcommand("push").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Name matched exactly against a token
    pub name: String,
    /// Short description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Usage line shown in help
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub usage: String,
    /// Declared flags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,
    /// Declared positional argument slots
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Argument>,
    /// Alternative positional shapes (advisory)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arg_sets: Vec<ArgumentSet>,
    /// Declared options
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opts: Vec<Opt>,
    /// Child commands in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<Command>,
    /// Suppress auto-help for this command
    #[serde(default)]
    pub hide_help: bool,
}

impl Command {
    /// Creates a command with the given name and nothing declared.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Adds a usage line.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    /// Declares a flag.
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Declares an option.
    pub fn with_opt(mut self, opt: Opt) -> Self {
        self.opts.push(opt);
        self
    }

    /// Declares a positional argument slot.
    pub fn with_arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    /// Declares an allowed positional shape.
    pub fn with_arg_set(mut self, set: ArgumentSet) -> Self {
        self.arg_sets.push(set);
        self
    }

    /// Adds a child command.
    pub fn with_subcommand(mut self, sub: Command) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Marks this command as never showing auto-help.
    pub fn hide_help(mut self) -> Self {
        self.hide_help = true;
        self
    }

    /// Finds the first child whose name equals `name`.
    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Follows `path` from this command, one child name per segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::Command;
    ///
    /// let root = Command::new("the")
    ///     .with_subcommand(Command::new("quick").with_subcommand(Command::new("brown")));
    /// assert_eq!(root.descendant(&["quick", "brown"]).unwrap().name, "brown");
    /// assert!(root.descendant(&["brown"]).is_none());
    /// ```
    pub fn descendant<S: AsRef<str>>(&self, path: &[S]) -> Option<&Command> {
        path.iter()
            .try_fold(self, |node, segment| node.find_subcommand(segment.as_ref()))
    }

    /// Gets all child names in declaration order.
    pub fn subcommand_names(&self) -> Vec<&str> {
        self.subcommands.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Parameters merged into every resolved command before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedParameters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Argument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arg_sets: Vec<ArgumentSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opts: Vec<Opt>,
}

fn default_auto_help() -> bool {
    true
}

/// A complete catalog: the root command plus tree-wide settings.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, CommandTree};
///
/// let tree = CommandTree::new(Command::new("app")).with_version("1.2.0");
/// assert!(tree.auto_help);
/// assert_eq!(tree.version.as_deref(), Some("1.2.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTree {
    /// Root command; the first token must equal its name
    pub root: Command,
    /// Vocabulary added to every resolved command
    #[serde(default)]
    pub shared: SharedParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Inject the reserved help vocabulary into every command
    #[serde(default = "default_auto_help")]
    pub auto_help: bool,
}

impl CommandTree {
    /// Creates a tree around `root` with auto-help enabled.
    pub fn new(root: Command) -> Self {
        Self {
            root,
            shared: SharedParameters::default(),
            author: None,
            copyright: None,
            email: None,
            version: None,
            auto_help: true,
        }
    }

    /// Replaces the shared parameters.
    pub fn with_shared(mut self, shared: SharedParameters) -> Self {
        self.shared = shared;
        self
    }

    /// Sets the version string.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Sets the author.
    pub fn with_author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    /// Enables or disables auto-help.
    pub fn with_auto_help(mut self, enabled: bool) -> Self {
        self.auto_help = enabled;
        self
    }
}

/// What the user actually specified for one command.
///
/// Produced by [`classify`](crate::classify). Flags and options record the
/// form the user typed (short or long); positional arguments only carry
/// their values, in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Name of the matched catalog command
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub usage: String,
    /// Observed flags, deduplicated
    #[serde(default)]
    pub flags: Vec<Flag>,
    /// Observed options with their values, deduplicated
    #[serde(default)]
    pub opts: Vec<Opt>,
    /// Positional values in encounter order
    #[serde(default)]
    pub args: Vec<Argument>,
}

impl Invocation {
    /// Returns `true` if a flag was observed under `name`.
    ///
    /// A single-character `name` is compared against short names as well as
    /// long names.
    pub fn has_flag(&self, name: &str) -> bool {
        let short = single_char(name);
        self.flags
            .iter()
            .any(|f| f.matches_long(name) || short.is_some_and(|c| f.matches_short(c)))
    }

    /// Returns the value of the option observed under `name`, if any.
    pub fn opt_value(&self, name: &str) -> Option<&str> {
        let short = single_char(name);
        self.opts
            .iter()
            .find(|o| o.matches_long(name) || short.is_some_and(|c| o.matches_short(c)))
            .and_then(|o| o.value.as_deref())
    }

    /// Positional values in encounter order.
    pub fn positionals(&self) -> Vec<&str> {
        self.args.iter().filter_map(|a| a.value.as_deref()).collect()
    }

    /// Returns `true` if any reserved help flag or argument was observed.
    pub fn help_requested(&self) -> bool {
        self.flags.iter().any(Flag::is_help) || self.args.iter().any(Argument::is_help)
    }
}

fn single_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
