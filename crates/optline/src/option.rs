//! Option descriptors: identity, value arity and the fluent builder.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::ConfigError;

pub const SHORT_PREFIX: &str = "-";
pub const LONG_PREFIX: &str = "--";
/// Splits `--name=value` into a name and an inline value.
pub const VALUE_SEPARATOR: char = '=';
pub const DEFAULT_ARG_NAME: &str = "arg";

/// How many values an option consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Arity {
    /// A plain flag.
    #[default]
    None,
    /// Exactly `n` values, `n >= 1`.
    Fixed(usize),
    /// One or more values, consumed until the next recognized option.
    Unbounded,
}

impl Arity {
    /// Maximum number of values, `None` meaning no limit.
    pub fn capacity(self) -> Option<usize> {
        match self {
            Self::None => Some(0),
            Self::Fixed(n) => Some(n),
            Self::Unbounded => None,
        }
    }
}

/// Integer form used by declarative inputs: `0`/`-1` is no arguments,
/// `-2` is unbounded.
impl TryFrom<i64> for Arity {
    type Error = ConfigError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        match n {
            -2 => Ok(Self::Unbounded),
            -1 | 0 => Ok(Self::None),
            n if n > 0 => Ok(Self::Fixed(n as usize)),
            n => Err(ConfigError::ArityOutOfRange(n)),
        }
    }
}

impl FromStr for Arity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" => Ok(Self::None),
            "unbounded" | "*" => Ok(Self::Unbounded),
            other => other
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidArity(other.to_string()))
                .and_then(Self::try_from),
        }
    }
}

/// Immutable description of one option.
///
/// Equality and hashing only look at the short and long names; the catalog
/// and groups rely on that for duplicate detection.
#[derive(Debug, Clone)]
pub struct OptDef {
    short: Option<String>,
    long: Option<String>,
    description: String,
    arg_name: String,
    required: bool,
    optional_arg: bool,
    arity: Arity,
    value_separator: Option<char>,
}

impl OptDef {
    pub fn builder() -> OptDefBuilder {
        OptDefBuilder::default()
    }

    /// Start a builder with a short name.
    pub fn short(name: impl Into<String>) -> OptDefBuilder {
        OptDefBuilder::default().short(name)
    }

    /// Start a builder with a long name.
    pub fn long(name: impl Into<String>) -> OptDefBuilder {
        OptDefBuilder::default().long(name)
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short.as_deref()
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arg_name(&self) -> &str {
        &self.arg_name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn has_optional_arg(&self) -> bool {
        self.optional_arg
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn value_separator(&self) -> Option<char> {
        self.value_separator
    }

    /// Identity key: the short name if present, else the long name.
    pub fn key(&self) -> &str {
        self.short
            .as_deref()
            .or(self.long.as_deref())
            .unwrap_or_default()
    }

    /// Name as typed on a command line, long form preferred.
    pub fn display_name(&self) -> String {
        match (&self.long, &self.short) {
            (Some(long), _) => format!("{LONG_PREFIX}{long}"),
            (None, Some(short)) => format!("{SHORT_PREFIX}{short}"),
            (None, None) => String::new(),
        }
    }

    /// Whether `name` (with or without leading dashes) names this option.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim_start_matches('-');
        self.short.as_deref() == Some(name) || self.long.as_deref() == Some(name)
    }

    pub fn has_args(&self) -> bool {
        matches!(self.arity, Arity::Fixed(n) if n > 0) || self.arity == Arity::Unbounded
    }

    pub fn has_value_separator(&self) -> bool {
        self.value_separator.is_some_and(|c| !c.is_control())
    }

    /// Whether an occurrence already holding `count` values can take another.
    pub fn accepts_more_values(&self, count: usize) -> bool {
        (self.has_args() || self.optional_arg)
            && self.arity.capacity().is_none_or(|cap| count < cap)
    }

    /// Whether an occurrence holding `count` values is still incomplete.
    pub fn requires_another_value(&self, count: usize) -> bool {
        if self.optional_arg {
            return false;
        }
        if self.arity == Arity::Unbounded {
            return count == 0;
        }
        self.accepts_more_values(count)
    }
}

impl PartialEq for OptDef {
    fn eq(&self, other: &Self) -> bool {
        self.short == other.short && self.long == other.long
    }
}

impl Eq for OptDef {}

impl Hash for OptDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.short.hash(state);
        self.long.hash(state);
    }
}

// [ Option: <short>[ <long>][ [=<arg>]][ :: <description>] ]
impl fmt::Display for OptDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::from("Option: ");
        out.push_str(self.short.as_deref().unwrap_or_default());
        if let Some(long) = &self.long {
            if self.short.is_some() {
                out.push(' ');
            }
            out.push_str(long);
        }
        if self.has_args() {
            out.push(' ');
            if self.optional_arg {
                out.push('[');
            }
            if let Some(sep) = self.value_separator.filter(|c| !c.is_control()) {
                out.push(sep);
            }
            out.push_str(&self.arg_name);
            if self.optional_arg {
                out.push(']');
            }
        }
        if !self.description.is_empty() {
            out.push_str(" :: ");
            out.push_str(&self.description);
        }
        if self.required {
            f.write_str(&out)
        } else {
            write!(f, "[ {out} ]")
        }
    }
}

/// Validating builder for [`OptDef`].
#[derive(Debug, Clone)]
pub struct OptDefBuilder {
    short: Option<String>,
    long: Option<String>,
    description: String,
    arg_name: String,
    required: bool,
    optional_arg: bool,
    arity: Result<Arity, ConfigError>,
    value_separator: Option<char>,
}

impl Default for OptDefBuilder {
    fn default() -> Self {
        Self {
            short: None,
            long: None,
            description: String::new(),
            arg_name: DEFAULT_ARG_NAME.to_string(),
            required: false,
            optional_arg: false,
            arity: Ok(Arity::None),
            value_separator: None,
        }
    }
}

impl OptDefBuilder {
    pub fn short(mut self, name: impl Into<String>) -> Self {
        self.short = Some(name.into());
        self
    }

    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long = Some(name.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Display label for the option's value in help output.
    pub fn arg_name(mut self, name: impl Into<String>) -> Self {
        self.arg_name = name.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The option's value may be omitted.
    pub fn optional_arg(mut self, optional: bool) -> Self {
        self.optional_arg = optional;
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = match arity {
            Arity::Fixed(0) => Ok(Arity::None),
            other => Ok(other),
        };
        self
    }

    /// Integer arity; out-of-range values fail at [`build`](Self::build).
    pub fn args(mut self, n: i64) -> Self {
        self.arity = Arity::try_from(n);
        self
    }

    /// Shorthand for exactly one value.
    pub fn has_arg(self) -> Self {
        self.arity(Arity::Fixed(1))
    }

    /// Shorthand for an unbounded number of values.
    pub fn has_args(self) -> Self {
        self.arity(Arity::Unbounded)
    }

    /// Character splitting one raw value into several, e.g. `,` or `=`.
    pub fn value_separator(mut self, sep: char) -> Self {
        self.value_separator = Some(sep);
        self
    }

    pub fn build(self) -> Result<OptDef, ConfigError> {
        let short = self.short.filter(|s| !s.is_empty());
        let long = self.long.filter(|s| !s.is_empty());
        if short.is_none() && long.is_none() {
            return Err(ConfigError::MissingName);
        }
        if let Some(name) = &short {
            validate_name(name)?;
        }
        if let Some(name) = &long {
            validate_name(name)?;
        }

        Ok(OptDef {
            short,
            long,
            description: self.description,
            arg_name: self.arg_name,
            required: self.required,
            optional_arg: self.optional_arg,
            arity: self.arity?,
            value_separator: self.value_separator,
        })
    }
}

fn validate_name(name: &str) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.starts_with('-') {
        return Err(invalid("must not start with '-'"));
    }
    if name == "?" || name == "@" {
        return Ok(());
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid("only letters, digits, '_' and '-' are allowed"));
    }
    Ok(())
}
