//! The scanning engine: walks argv once, left to right, against a catalog.

use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::error::{Missing, ParseError};
use crate::group::Selection;
use crate::option::{LONG_PREFIX, SHORT_PREFIX, VALUE_SEPARATOR};
use crate::result::{Matched, ParseResult};

/// Knobs for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSettings {
    stop_at_non_option: bool,
    check_required: bool,
    negative_numbers: bool,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            stop_at_non_option: false,
            check_required: true,
            negative_numbers: true,
        }
    }
}

impl ParseSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop recognizing options at the first positional argument; it and
    /// everything after it become leftovers verbatim.
    pub fn stop_at_non_option(mut self, stop: bool) -> Self {
        self.stop_at_non_option = stop;
        self
    }

    /// Report required options and required groups that never appeared.
    pub fn check_required(mut self, check: bool) -> Self {
        self.check_required = check;
        self
    }

    /// Treat tokens like `-5` or `-0.5` as values rather than options, unless
    /// a short option of that exact name exists.
    pub fn negative_numbers(mut self, allow: bool) -> Self {
        self.negative_numbers = allow;
        self
    }

    pub fn stops_at_non_option(&self) -> bool {
        self.stop_at_non_option
    }

    pub fn checks_required(&self) -> bool {
        self.check_required
    }

    pub fn allows_negative_numbers(&self) -> bool {
        self.negative_numbers
    }
}

/// Parse `args` (without the program name) with default settings.
pub fn parse<'c, 'a, S: AsRef<str>>(
    catalog: &'c Catalog,
    args: &'a [S],
) -> Result<ParseResult<'c, 'a>, ParseError> {
    parse_with(catalog, args, &ParseSettings::default())
}

/// Parse `args`, optionally stopping at the first non-option.
pub fn parse_args<'c, 'a, S: AsRef<str>>(
    catalog: &'c Catalog,
    args: &'a [S],
    stop_at_non_option: bool,
) -> Result<ParseResult<'c, 'a>, ParseError> {
    parse_with(
        catalog,
        args,
        &ParseSettings::default().stop_at_non_option(stop_at_non_option),
    )
}

/// Parse `args` against `catalog`.
///
/// Recognized forms:
/// - `--name`, `--name=value`, `--name value`, and unique prefixes of `name`
/// - `-x`, `-xvalue`, `-x=value`, `-x value`, and clusters such as `-abc`
/// - `--` ends option processing; later tokens are leftovers
///
/// Any error aborts the whole parse.
pub fn parse_with<'c, 'a, S: AsRef<str>>(
    catalog: &'c Catalog,
    args: &'a [S],
    settings: &ParseSettings,
) -> Result<ParseResult<'c, 'a>, ParseError> {
    let mut scan = Scan::new(catalog, *settings);
    let mut tokens = args.iter().map(|arg| arg.as_ref());

    while let Some(token) = tokens.next() {
        if let Step::Stop = scan.step(token)? {
            scan.leftovers.extend(tokens.by_ref());
            break;
        }
    }

    scan.finish()
}

enum Step {
    Continue,
    Stop,
}

struct Scan<'c, 'a> {
    catalog: &'c Catalog,
    settings: ParseSettings,
    matched: Vec<Matched<'c, 'a>>,
    leftovers: Vec<&'a str>,
    selections: Vec<Selection>,
    /// Index into `matched` of the occurrence still collecting values.
    pending: Option<usize>,
}

impl<'c, 'a> Scan<'c, 'a> {
    fn new(catalog: &'c Catalog, settings: ParseSettings) -> Self {
        Self {
            catalog,
            settings,
            matched: Vec::new(),
            leftovers: Vec::new(),
            selections: vec![Selection::default(); catalog.group_count()],
            pending: None,
        }
    }

    fn step(&mut self, token: &'a str) -> Result<Step, ParseError> {
        trace!(token, "classifying token");

        if token == LONG_PREFIX {
            self.close_pending()?;
            debug!("end of options marker");
            return Ok(Step::Stop);
        }

        if let Some(index) = self.pending {
            if self.is_value(token) {
                let occurrence = &mut self.matched[index];
                occurrence.add_value(token)?;
                if !occurrence.accepts_more_values() {
                    self.pending = None;
                }
                return Ok(Step::Continue);
            }
            self.close_pending()?;
        }

        if let Some(body) = token.strip_prefix(LONG_PREFIX) {
            self.long_option(token, body)?;
        } else if let Some(body) = token.strip_prefix(SHORT_PREFIX).filter(|b| !b.is_empty()) {
            if self.settings.negative_numbers
                && is_negative_number(token)
                && self.catalog.short(body).is_none()
            {
                return Ok(self.positional(token));
            }
            self.short_options(token, body)?;
        } else {
            return Ok(self.positional(token));
        }
        Ok(Step::Continue)
    }

    fn positional(&mut self, token: &'a str) -> Step {
        self.leftovers.push(token);
        if self.settings.stop_at_non_option {
            debug!(token, "stopping at non-option");
            Step::Stop
        } else {
            Step::Continue
        }
    }

    fn long_option(&mut self, token: &'a str, body: &'a str) -> Result<(), ParseError> {
        let (name, inline) = match body.split_once(VALUE_SEPARATOR) {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        if name.is_empty() {
            return Err(ParseError::UnrecognizedOption {
                option: token.to_string(),
            });
        }

        let index = self
            .catalog
            .long(name)?
            .ok_or_else(|| ParseError::UnrecognizedOption {
                option: format!("{LONG_PREFIX}{name}"),
            })?;
        self.open(index, inline)
    }

    /// Resolve a short token left to right. At each position the longest
    /// registered short name wins; flags keep the cluster going, and the first
    /// option taking values claims the rest of the token (minus a leading
    /// `=`) or, if nothing is left, the following tokens.
    fn short_options(&mut self, token: &'a str, body: &'a str) -> Result<(), ParseError> {
        let mut pos = 0;
        while pos < body.len() {
            let rest = &body[pos..];
            let Some((len, index)) = self.longest_short(rest) else {
                let option = if pos == 0 {
                    token.to_string()
                } else {
                    let ch = rest.chars().next().unwrap_or_default();
                    format!("{SHORT_PREFIX}{ch}")
                };
                return Err(ParseError::UnrecognizedOption { option });
            };

            let def = self.catalog.def(index);
            let after = &rest[len..];
            if def.accepts_more_values(0) {
                let attached = after.strip_prefix(VALUE_SEPARATOR).unwrap_or(after);
                return self.open(index, (!after.is_empty()).then_some(attached));
            }
            if after.starts_with(VALUE_SEPARATOR) {
                return Err(ParseError::InvalidArity {
                    option: def.display_name(),
                });
            }
            self.open(index, None)?;
            pos += len;
        }
        Ok(())
    }

    fn longest_short(&self, rest: &str) -> Option<(usize, usize)> {
        let ends: Vec<usize> = rest.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
        ends.into_iter()
            .rev()
            .find_map(|end| self.catalog.short(&rest[..end]).map(|index| (end, index)))
    }

    /// Record an occurrence of the option at `index`.
    fn open(&mut self, index: usize, inline: Option<&'a str>) -> Result<(), ParseError> {
        let catalog = self.catalog;
        if let Some(group) = catalog.group_index_of(index) {
            self.selections[group].select(index, |i| catalog.def(i).display_name())?;
        }

        let mut occurrence = Matched::new(catalog.def(index));
        match inline {
            Some(value) => {
                occurrence.add_value(value)?;
                if occurrence.requires_another_value() {
                    return Err(ParseError::MissingArgument {
                        option: occurrence.def().display_name(),
                    });
                }
                self.matched.push(occurrence);
            }
            None => {
                let waiting = occurrence.accepts_more_values();
                self.matched.push(occurrence);
                if waiting {
                    self.pending = Some(self.matched.len() - 1);
                }
            }
        }
        Ok(())
    }

    fn close_pending(&mut self) -> Result<(), ParseError> {
        if let Some(index) = self.pending.take() {
            let occurrence = &self.matched[index];
            if occurrence.requires_another_value() {
                return Err(ParseError::MissingArgument {
                    option: occurrence.def().display_name(),
                });
            }
        }
        Ok(())
    }

    /// Whether `token` can be consumed as a value by the pending option.
    fn is_value(&self, token: &str) -> bool {
        if self.settings.negative_numbers
            && is_negative_number(token)
            && token
                .strip_prefix(SHORT_PREFIX)
                .is_some_and(|body| self.catalog.short(body).is_none())
        {
            return true;
        }
        !self.is_option(token)
    }

    /// Whether `token` resolves to a registered option. Ambiguous long
    /// prefixes count as options so the ambiguity is reported.
    fn is_option(&self, token: &str) -> bool {
        if let Some(body) = token.strip_prefix(LONG_PREFIX) {
            let name = body.split_once(VALUE_SEPARATOR).map_or(body, |(name, _)| name);
            return !name.is_empty() && !matches!(self.catalog.long(name), Ok(None));
        }
        match token.strip_prefix(SHORT_PREFIX) {
            Some(body) if !body.is_empty() => {
                let name = body.split_once(VALUE_SEPARATOR).map_or(body, |(name, _)| name);
                !name.is_empty() && self.longest_short(name).is_some()
            }
            _ => false,
        }
    }

    fn finish(mut self) -> Result<ParseResult<'c, 'a>, ParseError> {
        self.close_pending()?;
        if self.settings.check_required {
            self.check_required()?;
        }

        let catalog = self.catalog;
        let selections = self
            .selections
            .iter()
            .map(|s| s.selected().map(|i| catalog.def(i)))
            .collect();
        debug!(
            matched = self.matched.len(),
            leftovers = self.leftovers.len(),
            "parse complete"
        );
        Ok(ParseResult::new(self.matched, self.leftovers, selections))
    }

    fn check_required(&self) -> Result<(), ParseError> {
        let mut missing: Vec<Missing> = self
            .catalog
            .required_options()
            .filter(|def| !self.matched.iter().any(|m| std::ptr::eq(m.def(), *def)))
            .map(|def| Missing::Option(def.display_name()))
            .collect();

        for group in self.catalog.groups() {
            if group.is_required() && self.selections[group.id().index()].selected().is_none() {
                missing.push(Missing::Group(group.alternatives()));
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ParseError::MissingOption { missing })
        }
    }
}

fn is_negative_number(token: &str) -> bool {
    token
        .strip_prefix('-')
        .filter(|n| n.starts_with(|c: char| c.is_ascii_digit() || c == '.'))
        .is_some_and(|n| n.parse::<f64>().is_ok())
}
