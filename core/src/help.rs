//! Plain-text help and tree rendering.
//!
//! Both renderers return strings; printing is left to the caller.

use crate::types::Command;

/// Renders help text for `command`.
///
/// Sections without entries are omitted. Pass the merged command (see
/// [`CommandTree::effective_command`](crate::CommandTree::effective_command))
/// to include shared parameters.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, Flag, Opt, render_help};
///
/// let brown = Command::new("brown")
///     .with_description("the quick brown")
///     .with_flag(Flag::new(Some('d'), Some("LongD")).with_description("a flag"))
///     .with_opt(Opt::long("LongF"));
///
/// let help = render_help(&brown);
/// assert!(help.starts_with("the quick brown\n"));
/// assert!(help.contains("-d, --LongD"));
/// assert!(help.contains("--LongF <value>"));
/// ```
pub fn render_help(command: &Command) -> String {
    let mut out = String::new();

    if !command.description.is_empty() {
        out.push_str(&format!("{}\n", command.description));
    }

    let usage = if command.usage.is_empty() {
        command.name.as_str()
    } else {
        command.usage.as_str()
    };
    out.push_str(&format!("Usage: {usage}\n"));

    let declared: Vec<String> = command
        .args
        .iter()
        .filter(|a| !a.name.is_empty())
        .map(|a| format!("<{}>", a.name))
        .collect();
    if !declared.is_empty() {
        out.push_str(&format!("  {}\n", declared.join(" ")));
    }
    for set in &command.arg_sets {
        let shape: Vec<String> = set.args.iter().map(|a| format!("<{}>", a.name)).collect();
        out.push_str(&format!("  {}\n", shape.join(" ")));
    }

    let subcommands: Vec<(String, &str)> = command
        .subcommands
        .iter()
        .map(|s| (s.name.clone(), s.description.as_str()))
        .collect();
    write_section(&mut out, "Subcommands", &subcommands);

    let flags: Vec<(String, &str)> = command
        .flags
        .iter()
        .map(|f| (switch_label(f.short, f.long.as_deref(), false), f.description.as_str()))
        .collect();
    write_section(&mut out, "Flags", &flags);

    let opts: Vec<(String, &str)> = command
        .opts
        .iter()
        .map(|o| (switch_label(o.short, o.long.as_deref(), true), o.description.as_str()))
        .collect();
    write_section(&mut out, "Options", &opts);

    out
}

fn switch_label(short: Option<char>, long: Option<&str>, takes_value: bool) -> String {
    let mut label = match (short, long) {
        (Some(s), Some(l)) => format!("-{s}, --{l}"),
        (Some(s), None) => format!("-{s}"),
        (None, Some(l)) => format!("    --{l}"),
        (None, None) => String::new(),
    };
    if takes_value {
        label.push_str(" <value>");
    }
    label
}

fn write_section(out: &mut String, title: &str, rows: &[(String, &str)]) {
    if rows.is_empty() {
        return;
    }
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);

    out.push_str(&format!("\n{title}:\n"));
    for (left, desc) in rows {
        if desc.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:<width$}  {desc}\n"));
        }
    }
}

/// Renders the command tree as indented `depth: name` lines.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, render_tree};
///
/// let root = Command::new("the")
///     .with_subcommand(Command::new("quick").with_subcommand(Command::new("brown")));
/// assert_eq!(render_tree(&root), "0: the\n  1: quick\n    2: brown\n");
/// ```
pub fn render_tree(root: &Command) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &Command, depth: usize) {
    out.push_str(&format!("{}{depth}: {}\n", "  ".repeat(depth), node.name));
    for child in &node.subcommands {
        write_node(out, child, depth + 1);
    }
}
