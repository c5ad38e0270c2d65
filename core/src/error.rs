//! Errors produced while resolving and classifying tokens.

use thiserror::Error;

/// Resolution and classification failures.
///
/// The first failure aborts the whole parse; no partially populated
/// [`Invocation`](crate::Invocation) is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token sequence was empty.
    #[error("no arguments provided")]
    NoTokens,
    /// The first token is not the root command's name.
    #[error("command {expected} not found (got {found})")]
    CommandNotFound { expected: String, found: String },
    /// The resolved command's name does not occur in the tokens handed to the
    /// classifier.
    #[error("command {command} not found in arguments `{tokens}`")]
    CommandNotFoundInTokens { command: String, tokens: String },
    /// `--name` is neither a declared flag nor a declared option.
    #[error("long form input --{0} not found")]
    UnknownLongForm(String),
    /// `-x` is neither a declared flag nor a declared option.
    #[error("short form input -{0} not found")]
    UnknownShortForm(String),
    /// A short flag cluster contains a character that is not a declared flag.
    #[error("short form input -{cluster} is too long ('{unknown}' is not a flag)")]
    ShortFormTooLong { cluster: String, unknown: char },
    /// An option was the last token, leaving nothing to use as its value.
    #[error("no value provided for option {0}")]
    MissingOptionValue(String),
}

/// Convenience alias for results with [`ParseError`].
pub(crate) type Result<T> = std::result::Result<T, ParseError>;
