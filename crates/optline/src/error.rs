//! Error types for catalog construction and argument parsing.
//!
//! [`ConfigError`] covers mistakes in how options are declared. These are
//! programmer errors and surface before any argv is looked at.
//! [`ParseError`] covers faults in the user's input.

use std::fmt;

use thiserror::Error;

/// Faults raised while building descriptors, groups or a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Neither a short nor a long name was given.
    #[error("either a short or a long option name must be specified")]
    MissingName,

    /// A name contains characters that cannot appear on a command line.
    #[error("invalid option name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Integer arity below the unbounded sentinel (`-2`).
    #[error("number of arguments out of range: {0}")]
    ArityOutOfRange(i64),

    /// An arity literal that is neither a count nor a known keyword.
    #[error("invalid arity: '{0}'")]
    InvalidArity(String),

    /// A short or long name is already registered.
    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    /// A group must offer at least one alternative.
    #[error("option group has no members")]
    EmptyGroup,

    /// Group membership decides requiredness; members may not set it themselves.
    #[error("option {option} is marked required but belongs to a group")]
    RequiredGroupMember { option: String },
}

/// One unmet requirement reported by [`ParseError::MissingOption`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// A required option that never appeared.
    Option(String),
    /// A required group with no selected member; carries the alternatives.
    Group(Vec<String>),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Option(name) => f.write_str(name),
            Self::Group(alternatives) => write!(f, "one of [{}]", alternatives.join(" | ")),
        }
    }
}

/// Faults raised while scanning an argument vector.
///
/// Parsing is all-or-nothing: any of these aborts the scan and no partial
/// result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized option: {option}")]
    UnrecognizedOption { option: String },

    #[error("ambiguous option: {option} could match {}", .candidates.join(", "))]
    AmbiguousOption {
        option: String,
        candidates: Vec<String>,
    },

    #[error("missing argument for option: {option}")]
    MissingArgument { option: String },

    #[error("missing required option{}: {}", plural(.missing.len()), join_missing(.missing))]
    MissingOption { missing: Vec<Missing> },

    #[error(
        "option {attempted} cannot be used with {selected}: an option from this group has already been selected"
    )]
    AlreadySelected { selected: String, attempted: String },

    #[error("option {option} does not take a value")]
    InvalidArity { option: String },

    #[error("too many values for option {option}")]
    AccumulatorFull { option: String },
}

/// Fieldless discriminant of [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnrecognizedOption,
    AmbiguousOption,
    MissingArgument,
    MissingOption,
    AlreadySelected,
    InvalidArity,
    AccumulatorFull,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedOption { .. } => ErrorKind::UnrecognizedOption,
            Self::AmbiguousOption { .. } => ErrorKind::AmbiguousOption,
            Self::MissingArgument { .. } => ErrorKind::MissingArgument,
            Self::MissingOption { .. } => ErrorKind::MissingOption,
            Self::AlreadySelected { .. } => ErrorKind::AlreadySelected,
            Self::InvalidArity { .. } => ErrorKind::InvalidArity,
            Self::AccumulatorFull { .. } => ErrorKind::AccumulatorFull,
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn join_missing(missing: &[Missing]) -> String {
    missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
