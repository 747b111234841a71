//! Mutually exclusive option groups.

use indexmap::IndexMap;

use crate::error::{ConfigError, ParseError};
use crate::option::OptDef;

/// A set of options of which at most one may appear on a command line.
///
/// A required group needs exactly one member to appear. Members must not
/// carry their own `required` flag; the catalog rejects them at registration.
#[derive(Debug, Clone, Default)]
pub struct OptGroup {
    members: IndexMap<String, OptDef>,
    required: bool,
}

impl OptGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Builder form of [`add`](Self::add).
    pub fn option(mut self, def: OptDef) -> Result<Self, ConfigError> {
        self.add(def)?;
        Ok(self)
    }

    pub fn add(&mut self, def: OptDef) -> Result<&mut Self, ConfigError> {
        if self.members.contains_key(def.key()) {
            return Err(ConfigError::DuplicateOption(def.display_name()));
        }
        self.members.insert(def.key().to_string(), def);
        Ok(self)
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Identity keys of the members, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptDef> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn into_members(self) -> impl Iterator<Item = OptDef> {
        self.members.into_values()
    }
}

/// Per-parse selection state of one group.
///
/// Holds catalog indices; the catalog itself stays untouched while parsing.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Selection {
    selected: Option<usize>,
}

impl Selection {
    pub(crate) fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select `index`, or confirm it if it is already the selection.
    pub(crate) fn select(
        &mut self,
        index: usize,
        name_of: impl Fn(usize) -> String,
    ) -> Result<(), ParseError> {
        match self.selected {
            None => {
                self.selected = Some(index);
                Ok(())
            }
            Some(current) if current == index => Ok(()),
            Some(current) => Err(ParseError::AlreadySelected {
                selected: name_of(current),
                attempted: name_of(index),
            }),
        }
    }
}
