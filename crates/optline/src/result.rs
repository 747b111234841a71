//! The outcome of a successful parse.

use crate::catalog::GroupId;
use crate::error::ParseError;
use crate::option::{Arity, OptDef};

/// One occurrence of an option on the command line together with the values
/// it consumed.
///
/// Each occurrence owns its own value list, so repeated options and repeated
/// parses never share state.
#[derive(Debug, Clone)]
pub struct Matched<'c, 'a> {
    def: &'c OptDef,
    values: Vec<&'a str>,
}

impl<'c, 'a> Matched<'c, 'a> {
    pub(crate) fn new(def: &'c OptDef) -> Self {
        Self {
            def,
            values: Vec::new(),
        }
    }

    pub fn def(&self) -> &'c OptDef {
        self.def
    }

    pub fn values(&self) -> &[&'a str] {
        &self.values
    }

    pub fn value(&self) -> Option<&'a str> {
        self.values.first().copied()
    }

    pub fn accepts_more_values(&self) -> bool {
        self.def.accepts_more_values(self.values.len())
    }

    pub fn requires_another_value(&self) -> bool {
        self.def.requires_another_value(self.values.len())
    }

    /// Feed one raw value, splitting it on the option's value separator.
    ///
    /// Splitting stops once only one slot is left, so the remainder lands in
    /// the last value verbatim.
    pub fn add_value(&mut self, raw: &'a str) -> Result<(), ParseError> {
        if self.def.arity() == Arity::None {
            return Err(ParseError::InvalidArity {
                option: self.def.display_name(),
            });
        }

        let mut rest = raw;
        if let Some(sep) = self.def.value_separator().filter(|_| self.def.has_value_separator()) {
            while let Some((head, tail)) = rest.split_once(sep) {
                if let Arity::Fixed(n) = self.def.arity() {
                    if self.values.len() + 1 >= n {
                        break;
                    }
                }
                self.push(head)?;
                rest = tail;
            }
        }
        self.push(rest)
    }

    fn push(&mut self, value: &'a str) -> Result<(), ParseError> {
        if !self.accepts_more_values() {
            return Err(ParseError::AccumulatorFull {
                option: self.def.display_name(),
            });
        }
        self.values.push(value);
        Ok(())
    }
}

/// Matched options in encounter order plus leftover arguments.
///
/// Borrows descriptors from the catalog (`'c`) and values from the argument
/// vector (`'a`).
#[derive(Debug, Clone)]
pub struct ParseResult<'c, 'a> {
    matched: Vec<Matched<'c, 'a>>,
    leftovers: Vec<&'a str>,
    selections: Vec<Option<&'c OptDef>>,
}

impl<'c, 'a> ParseResult<'c, 'a> {
    pub(crate) fn new(
        matched: Vec<Matched<'c, 'a>>,
        leftovers: Vec<&'a str>,
        selections: Vec<Option<&'c OptDef>>,
    ) -> Self {
        Self {
            matched,
            leftovers,
            selections,
        }
    }

    /// Whether the option appeared; `name` may be short or long, dashes optional.
    pub fn has_option(&self, name: &str) -> bool {
        self.matching(name).next().is_some()
    }

    /// First value of the first occurrence.
    pub fn value(&self, name: &str) -> Option<&'a str> {
        self.matching(name).find_map(|m| m.value())
    }

    pub fn value_or(&self, name: &str, default: &'a str) -> &'a str {
        self.value(name).unwrap_or(default)
    }

    /// All values across every occurrence, in order.
    pub fn values(&self, name: &str) -> Vec<&'a str> {
        self.matching(name)
            .flat_map(|m| m.values.iter().copied())
            .collect()
    }

    pub fn occurrences(&self, name: &str) -> usize {
        self.matching(name).count()
    }

    /// Matched options in the order they appeared.
    pub fn iter(&self) -> impl Iterator<Item = &Matched<'c, 'a>> {
        self.matched.iter()
    }

    pub fn len(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    /// Positional arguments, plus everything after `--` or the stop point.
    pub fn leftovers(&self) -> &[&'a str] {
        &self.leftovers
    }

    /// The member chosen from a group, if any appeared.
    pub fn selected(&self, group: GroupId) -> Option<&'c OptDef> {
        self.selections.get(group.index()).copied().flatten()
    }

    fn matching<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Matched<'c, 'a>> {
        self.matched.iter().filter(move |m| m.def.matches(name))
    }
}

impl<'r, 'c, 'a> IntoIterator for &'r ParseResult<'c, 'a> {
    type Item = &'r Matched<'c, 'a>;
    type IntoIter = std::slice::Iter<'r, Matched<'c, 'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matched.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_splits_until_capacity() {
        let def = OptDef::short("D")
            .arity(Arity::Fixed(2))
            .value_separator('=')
            .build()
            .unwrap();
        let mut m = Matched::new(&def);
        m.add_value("key=value=more").unwrap();
        assert_eq!(m.values(), &["key", "value=more"]);
        assert!(!m.accepts_more_values());
    }

    #[test]
    fn separator_splits_everything_when_unbounded() {
        let def = OptDef::long("list")
            .has_args()
            .value_separator(',')
            .build()
            .unwrap();
        let mut m = Matched::new(&def);
        m.add_value("a,b,c").unwrap();
        m.add_value("d").unwrap();
        assert_eq!(m.values(), &["a", "b", "c", "d"]);
    }

    #[test]
    fn flags_reject_values() {
        let def = OptDef::short("v").build().unwrap();
        let mut m = Matched::new(&def);
        let err = m.add_value("x").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidArity {
                option: "-v".to_string()
            }
        );
    }

    #[test]
    fn full_accumulator_rejects_values() {
        let def = OptDef::long("name").has_arg().build().unwrap();
        let mut m = Matched::new(&def);
        m.add_value("one").unwrap();
        let err = m.add_value("two").unwrap_err();
        assert!(matches!(err, ParseError::AccumulatorFull { .. }));
        assert_eq!(m.values(), &["one"]);
    }

    #[test]
    fn cloned_occurrence_has_independent_values() {
        let def = OptDef::long("item").has_args().build().unwrap();
        let mut m = Matched::new(&def);
        m.add_value("a").unwrap();
        let mut copy = m.clone();
        copy.add_value("b").unwrap();
        assert_eq!(m.values(), &["a"]);
        assert_eq!(copy.values(), &["a", "b"]);
    }

    #[test]
    fn queries_span_occurrences() {
        let def = OptDef::short("I").long("include").has_arg().build().unwrap();
        let mut first = Matched::new(&def);
        first.add_value("src").unwrap();
        let mut second = Matched::new(&def);
        second.add_value("lib").unwrap();

        let result = ParseResult::new(vec![first, second], vec!["file"], Vec::new());
        assert!(result.has_option("I"));
        assert!(result.has_option("--include"));
        assert_eq!(result.occurrences("include"), 2);
        assert_eq!(result.value("I"), Some("src"));
        assert_eq!(result.values("I"), vec!["src", "lib"]);
        assert_eq!(result.value_or("missing", "none"), "none");
        assert_eq!(result.leftovers(), &["file"]);
    }
}
