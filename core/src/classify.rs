//! Token classification.
//!
//! Once the invoked command is known, [`classify`] scans the tokens that
//! follow its name (the *predicate*) against the command's declared flags and
//! options and records what the user specified in an [`Invocation`].
//!
//! Token rules, applied left to right:
//!
//! - blank tokens (`""` or `" "`) are skipped, before any splitting;
//! - `key=value` is split on the first `=` and handled as `key` followed by
//!   `value`, so `--out=x` behaves exactly like `--out x`;
//! - `--name` is a long flag or long option;
//! - `-x` is a short flag or short option, `-xyz` a cluster of short flags;
//! - anything else is a positional argument.
//!
//! Repeating a flag or option under a name already recorded has no further
//! effect, and the value following a repeated option is consumed and dropped.
//! The short and long names of one declaration are recorded separately, so
//! `-d --LongD` yields two entries.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::types::{Argument, Command, Flag, Invocation, Opt};

/// What to do when a long option is the last token and has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Fail with [`ParseError::MissingOptionValue`], like the short form.
    #[default]
    Error,
    /// Drop the option without recording it.
    Ignore,
}

/// Classifier settings.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{ClassifyConfig, MissingValuePolicy};
///
/// let config = ClassifyConfig::default();
/// assert_eq!(config.long_option_policy, MissingValuePolicy::Error);
/// assert!(config.skip_blank_tokens);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// Handling of `--option` with no trailing value.
    #[serde(default)]
    pub long_option_policy: MissingValuePolicy,
    /// Skip `""` and `" "` tokens instead of treating them as positionals.
    #[serde(default = "default_skip_blank")]
    pub skip_blank_tokens: bool,
}

fn default_skip_blank() -> bool {
    true
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            long_option_policy: MissingValuePolicy::default(),
            skip_blank_tokens: true,
        }
    }
}

/// Classifies the predicate of `command` with the default configuration.
///
/// See [`classify_with`].
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, Flag, Opt, classify};
///
/// let tar = Command::new("tar")
///     .with_flag(Flag::short('x'))
///     .with_flag(Flag::short('v'))
///     .with_opt(Opt::new(Some('f'), Some("file")));
///
/// let invocation = classify(&["tar", "-xv", "--file=a.tar", "dest"], &tar).unwrap();
/// assert!(invocation.has_flag("x"));
/// assert!(invocation.has_flag("v"));
/// assert_eq!(invocation.opt_value("file"), Some("a.tar"));
/// assert_eq!(invocation.positionals(), vec!["dest"]);
/// ```
pub fn classify<S: AsRef<str>>(tokens: &[S], command: &Command) -> Result<Invocation> {
    classify_with(tokens, command, &ClassifyConfig::default())
}

/// Classifies the tokens after the first occurrence of `command`'s name.
///
/// `command` is only read. The caller's token buffer is never modified;
/// `key=value` splitting happens on a private token stream.
///
/// # Errors
///
/// - [`ParseError::CommandNotFoundInTokens`] if `command.name` is not among
///   `tokens`.
/// - [`ParseError::UnknownLongForm`] / [`ParseError::UnknownShortForm`] for
///   undeclared names.
/// - [`ParseError::ShortFormTooLong`] if any character of a short cluster is
///   not a declared flag.
/// - [`ParseError::MissingOptionValue`] if a short option (or, under
///   [`MissingValuePolicy::Error`], a long option) ends the input.
pub fn classify_with<S: AsRef<str>>(
    tokens: &[S],
    command: &Command,
    config: &ClassifyConfig,
) -> Result<Invocation> {
    let start = tokens
        .iter()
        .position(|t| t.as_ref() == command.name)
        .ok_or_else(|| ParseError::CommandNotFoundInTokens {
            command: command.name.clone(),
            tokens: tokens
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(" "),
        })?;

    let mut predicate = Predicate::new(&tokens[start + 1..]);
    let mut observed = Observed::new(command, config);

    while let Some(raw) = predicate.next_value() {
        if config.skip_blank_tokens && is_blank(&raw) {
            continue;
        }
        let token = predicate.split_key(raw);

        if let Some(name) = token.strip_prefix("--") {
            observed.long_form(name, &mut predicate)?;
        } else if let Some(name) = token.strip_prefix('-') {
            observed.short_form(name, &mut predicate)?;
        } else {
            observed
                .invocation
                .args
                .push(Argument::positional(token.into_owned()));
        }
    }

    Ok(observed.invocation)
}

fn is_blank(token: &str) -> bool {
    token.is_empty() || token == " "
}

/// Token stream over the predicate.
///
/// A `key=value` token yields `key` and parks `value` as the next token, so
/// the split never touches the caller's slice.
struct Predicate<'a, S> {
    rest: std::slice::Iter<'a, S>,
    pending: Option<String>,
}

impl<'a, S: AsRef<str>> Predicate<'a, S> {
    fn new(tokens: &'a [S]) -> Self {
        Self {
            rest: tokens.iter(),
            pending: None,
        }
    }

    /// Next token exactly as it stands.
    fn next_value(&mut self) -> Option<Cow<'a, str>> {
        match self.pending.take() {
            Some(value) => Some(Cow::Owned(value)),
            None => self.rest.next().map(|t| Cow::Borrowed(t.as_ref())),
        }
    }

    /// Splits `token` on its first `=`, parking the value as the next token.
    fn split_key(&mut self, token: Cow<'a, str>) -> Cow<'a, str> {
        match token.split_once('=') {
            Some((key, value)) => {
                self.pending = Some(value.to_string());
                Cow::Owned(key.to_string())
            }
            None => token,
        }
    }
}

/// Accumulates observations for one classification call.
///
/// Repeats are detected against what has already been recorded, which holds
/// only the form the user typed: `-d` and `--LongD` are distinct entries.
struct Observed<'c> {
    command: &'c Command,
    config: &'c ClassifyConfig,
    invocation: Invocation,
}

impl<'c> Observed<'c> {
    fn new(command: &'c Command, config: &'c ClassifyConfig) -> Self {
        Self {
            command,
            config,
            invocation: Invocation {
                name: command.name.clone(),
                description: command.description.clone(),
                usage: command.usage.clone(),
                ..Default::default()
            },
        }
    }

    fn record_flag(&mut self, flag: Flag) {
        if !self.invocation.flags.iter().any(|f| f.same_identity(&flag)) {
            self.invocation.flags.push(flag);
        }
    }

    fn has_opt(&self, opt: &Opt) -> bool {
        self.invocation.opts.iter().any(|o| o.same_identity(opt))
    }

    fn long_form<S: AsRef<str>>(
        &mut self,
        name: &str,
        predicate: &mut Predicate<'_, S>,
    ) -> Result<()> {
        if self.command.flags.iter().any(|f| f.matches_long(name)) {
            self.record_flag(Flag::long(name));
            return Ok(());
        }

        if self.command.opts.iter().any(|o| o.matches_long(name)) {
            let observed = Opt::long(name);
            let value = predicate.next_value();
            if self.has_opt(&observed) {
                return Ok(());
            }
            return match value {
                Some(value) => {
                    self.invocation
                        .opts
                        .push(observed.with_value(value.into_owned()));
                    Ok(())
                }
                None => match self.config.long_option_policy {
                    MissingValuePolicy::Error => {
                        Err(ParseError::MissingOptionValue(format!("--{name}")))
                    }
                    MissingValuePolicy::Ignore => Ok(()),
                },
            };
        }

        Err(ParseError::UnknownLongForm(name.to_string()))
    }

    fn short_form<S: AsRef<str>>(
        &mut self,
        cluster: &str,
        predicate: &mut Predicate<'_, S>,
    ) -> Result<()> {
        let mut chars = cluster.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.single_short(c, predicate),
            (Some(_), Some(_)) => self.short_cluster(cluster),
            (None, _) => Err(ParseError::UnknownShortForm(String::new())),
        }
    }

    fn single_short<S: AsRef<str>>(
        &mut self,
        c: char,
        predicate: &mut Predicate<'_, S>,
    ) -> Result<()> {
        if self.command.flags.iter().any(|f| f.matches_short(c)) {
            self.record_flag(Flag::short(c));
            return Ok(());
        }

        if self.command.opts.iter().any(|o| o.matches_short(c)) {
            let observed = Opt::short(c);
            if self.has_opt(&observed) {
                predicate.next_value();
                return Ok(());
            }
            let value = predicate
                .next_value()
                .ok_or_else(|| ParseError::MissingOptionValue(format!("-{c}")))?;
            self.invocation
                .opts
                .push(observed.with_value(value.into_owned()));
            return Ok(());
        }

        Err(ParseError::UnknownShortForm(c.to_string()))
    }

    // Every character must be a declared flag before any is recorded.
    fn short_cluster(&mut self, cluster: &str) -> Result<()> {
        if let Some(unknown) = cluster
            .chars()
            .find(|&c| !self.command.flags.iter().any(|f| f.matches_short(c)))
        {
            return Err(ParseError::ShortFormTooLong {
                cluster: cluster.to_string(),
                unknown,
            });
        }

        for c in cluster.chars() {
            self.record_flag(Flag::short(c));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArgumentSet;

    fn brown() -> Command {
        Command::new("brown")
            .with_description("the quick brown")
            .with_usage("use a brown?")
            .with_flag(Flag::long("LongA"))
            .with_flag(Flag::short('b'))
            .with_flag(Flag::new(Some('c'), Some("LongC")))
            .with_flag(Flag::new(Some('d'), Some("LongD")))
            .with_opt(Opt::new(Some('f'), Some("LongF")))
            .with_opt(Opt::new(Some('g'), Some("LongG")))
            .with_opt(Opt::new(Some('i'), Some("LongI")))
            .with_arg(Argument::named("Arg1"))
    }

    fn parse(line: &str) -> Result<Invocation> {
        let tokens: Vec<&str> = line.split(' ').collect();
        classify(&tokens, &brown())
    }

    fn expected() -> Invocation {
        Invocation {
            name: "brown".to_string(),
            description: "the quick brown".to_string(),
            usage: "use a brown?".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_positional_arguments_keep_order() {
        let invocation = parse("the quick brown fox dog").unwrap();

        assert_eq!(
            invocation.args,
            vec![Argument::positional("fox"), Argument::positional("dog")]
        );
        assert!(invocation.flags.is_empty());
        assert!(invocation.opts.is_empty());
    }

    #[test]
    fn test_metadata_copied_from_catalog() {
        let invocation = parse("the quick brown").unwrap();
        assert_eq!(invocation, expected());
    }

    #[test]
    fn test_flags_record_typed_form() {
        let invocation = parse("the quick brown --LongD -c").unwrap();

        assert_eq!(invocation.flags, vec![Flag::long("LongD"), Flag::short('c')]);
    }

    #[test]
    fn test_flag_repeats_are_idempotent() {
        let once = parse("the quick brown -b").unwrap();
        let twice = parse("the quick brown -bb").unwrap();
        let many = parse("the quick brown -bbb -bbb").unwrap();

        assert_eq!(once.flags, vec![Flag::short('b')]);
        assert_eq!(once, twice);
        assert_eq!(once, many);
    }

    #[test]
    fn test_flag_short_and_long_forms_recorded_separately() {
        let invocation = parse("the quick brown -d --LongD -d --LongD").unwrap();
        assert_eq!(invocation.flags, vec![Flag::short('d'), Flag::long("LongD")]);
    }

    #[test]
    fn test_long_and_short_options() {
        let long = parse("the quick brown --LongF val").unwrap();
        assert_eq!(long.opts, vec![Opt::long("LongF").with_value("val")]);

        let short = parse("the quick brown -f val").unwrap();
        assert_eq!(short.opts, vec![Opt::short('f').with_value("val")]);
    }

    #[test]
    fn test_mixed_predicate() {
        let invocation = parse("the quick brown fox -g val --LongF val2 --LongD -c").unwrap();

        assert_eq!(invocation.args, vec![Argument::positional("fox")]);
        assert_eq!(
            invocation.opts,
            vec![
                Opt::short('g').with_value("val"),
                Opt::long("LongF").with_value("val2"),
            ]
        );
        assert_eq!(invocation.flags, vec![Flag::long("LongD"), Flag::short('c')]);
    }

    #[test]
    fn test_option_repeat_keeps_first_value() {
        let invocation = parse("the quick brown -f val -f other tail").unwrap();

        assert_eq!(invocation.opts, vec![Opt::short('f').with_value("val")]);
        assert_eq!(invocation.positionals(), vec!["tail"]);
    }

    #[test]
    fn test_long_option_repeat_keeps_first_value() {
        let invocation = parse("the quick brown --LongF a --LongF b tail").unwrap();

        assert_eq!(invocation.opts, vec![Opt::long("LongF").with_value("a")]);
        assert_eq!(invocation.positionals(), vec!["tail"]);
    }

    #[test]
    fn test_option_short_and_long_forms_recorded_separately() {
        let invocation = parse("the quick brown -f val --LongF val2").unwrap();

        assert_eq!(
            invocation.opts,
            vec![
                Opt::short('f').with_value("val"),
                Opt::long("LongF").with_value("val2"),
            ]
        );
        assert!(invocation.args.is_empty());
    }

    #[test]
    fn test_equals_form_matches_split_form() {
        assert_eq!(
            parse("the quick brown --LongF=val").unwrap(),
            parse("the quick brown --LongF val").unwrap()
        );
        assert_eq!(
            parse("the quick brown -f=val").unwrap(),
            parse("the quick brown -f val").unwrap()
        );
    }

    #[test]
    fn test_equals_splits_on_first_only() {
        let invocation = parse("the quick brown --LongF=a=b").unwrap();
        assert_eq!(invocation.opts, vec![Opt::long("LongF").with_value("a=b")]);
    }

    #[test]
    fn test_equals_in_positional_splits() {
        let invocation = parse("the quick brown key=value").unwrap();
        assert_eq!(invocation.positionals(), vec!["key", "value"]);
    }

    #[test]
    fn test_option_value_is_taken_verbatim() {
        let invocation = parse("the quick brown -f -b").unwrap();

        assert_eq!(invocation.opts, vec![Opt::short('f').with_value("-b")]);
        assert!(invocation.flags.is_empty());
    }

    #[test]
    fn test_blank_tokens_skipped() {
        let tokens = ["the", "quick", "brown", "", "fox", " ", "-b"];
        let invocation = classify(&tokens, &brown()).unwrap();

        assert_eq!(invocation.positionals(), vec!["fox"]);
        assert_eq!(invocation.flags, vec![Flag::short('b')]);
    }

    #[test]
    fn test_empty_key_becomes_positional() {
        let invocation = classify(&["brown", "=x"], &brown()).unwrap();
        assert_eq!(invocation.positionals(), vec!["", "x"]);
    }

    #[test]
    fn test_blank_tokens_kept_when_configured() {
        let config = ClassifyConfig {
            skip_blank_tokens: false,
            ..Default::default()
        };
        let invocation = classify_with(&["brown", "", "fox"], &brown(), &config).unwrap();

        assert_eq!(invocation.positionals(), vec!["", "fox"]);
    }

    #[test]
    fn test_unknown_long_form() {
        assert_eq!(
            parse("the quick brown --bogus"),
            Err(ParseError::UnknownLongForm("bogus".to_string()))
        );
    }

    #[test]
    fn test_unknown_short_form() {
        assert_eq!(
            parse("the quick brown -z"),
            Err(ParseError::UnknownShortForm("z".to_string()))
        );
        assert_eq!(
            parse("the quick brown -"),
            Err(ParseError::UnknownShortForm(String::new()))
        );
    }

    #[test]
    fn test_long_name_does_not_match_short_flag() {
        assert_eq!(
            parse("the quick brown --b"),
            Err(ParseError::UnknownLongForm("b".to_string()))
        );
    }

    #[test]
    fn test_short_cluster_failure_is_atomic() {
        let err = parse("the quick brown -bcz").unwrap_err();
        assert_eq!(
            err,
            ParseError::ShortFormTooLong {
                cluster: "bcz".to_string(),
                unknown: 'z',
            }
        );
    }

    #[test]
    fn test_short_cluster_rejects_options() {
        assert!(matches!(
            parse("the quick brown -bf"),
            Err(ParseError::ShortFormTooLong { unknown: 'f', .. })
        ));
        assert!(parse("the quick brown -TooLong=val  ").is_err());
    }

    #[test]
    fn test_short_option_without_value_fails() {
        assert_eq!(
            parse("the quick brown -f"),
            Err(ParseError::MissingOptionValue("-f".to_string()))
        );
    }

    #[test]
    fn test_long_option_without_value_follows_policy() {
        assert_eq!(
            parse("the quick brown --LongF"),
            Err(ParseError::MissingOptionValue("--LongF".to_string()))
        );

        let lenient = ClassifyConfig {
            long_option_policy: MissingValuePolicy::Ignore,
            ..Default::default()
        };
        let invocation =
            classify_with(&["brown", "fox", "--LongF"], &brown(), &lenient).unwrap();
        assert!(invocation.opts.is_empty());
        assert_eq!(invocation.positionals(), vec!["fox"]);
    }

    #[test]
    fn test_command_missing_from_tokens() {
        let err = parse("the quick red fox").unwrap_err();
        assert_eq!(
            err,
            ParseError::CommandNotFoundInTokens {
                command: "brown".to_string(),
                tokens: "the quick red fox".to_string(),
            }
        );
    }

    #[test]
    fn test_predicate_starts_after_first_occurrence() {
        let invocation = parse("brown brown fox").unwrap();
        assert_eq!(invocation.positionals(), vec!["brown", "fox"]);
    }

    #[test]
    fn test_input_and_catalog_untouched() {
        let command = brown();
        let before = command.clone();
        let tokens = vec!["brown".to_string(), "--LongF=val".to_string()];

        classify(&tokens, &command).unwrap();

        assert_eq!(command, before);
        assert_eq!(tokens, vec!["brown", "--LongF=val"]);
    }

    #[test]
    fn test_arg_sets_are_not_enforced() {
        let command = brown().with_arg_set(ArgumentSet::of(&["one", "two"]));

        let invocation = classify(&["brown", "1", "2", "3"], &command).unwrap();
        assert_eq!(invocation.positionals(), vec!["1", "2", "3"]);
    }
}
