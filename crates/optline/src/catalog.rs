//! The registry of options and groups a command line is parsed against.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use crate::error::{ConfigError, ParseError};
use crate::group::OptGroup;
use crate::option::{LONG_PREFIX, OptDef, SHORT_PREFIX};

/// Handle to a group registered in a [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

impl GroupId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which name table a token is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Short,
    Long,
}

#[derive(Debug, Clone)]
struct GroupEntry {
    members: Vec<usize>,
    required: bool,
}

/// All options and groups for one command-line surface.
///
/// Descriptors live in a single store; the name tables and groups refer to
/// them by index. Build it up front, then share it read-only with
/// [`parse`](crate::parse). Cloning yields an independent copy.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    defs: Vec<OptDef>,
    short_index: HashMap<String, usize>,
    long_index: BTreeMap<String, usize>,
    groups: Vec<GroupEntry>,
    group_of: HashMap<usize, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`register`](Self::register).
    pub fn option(mut self, def: OptDef) -> Result<Self, ConfigError> {
        self.register(def)?;
        Ok(self)
    }

    /// Builder form of [`register_group`](Self::register_group).
    pub fn group(mut self, group: OptGroup) -> Result<Self, ConfigError> {
        self.register_group(group)?;
        Ok(self)
    }

    pub fn register(&mut self, def: OptDef) -> Result<&mut Self, ConfigError> {
        self.check_names(&def)?;
        self.insert(def);
        Ok(self)
    }

    /// Register every member of `group` and record the group.
    ///
    /// Nothing is registered if any member fails validation.
    pub fn register_group(&mut self, group: OptGroup) -> Result<GroupId, ConfigError> {
        if group.is_empty() {
            return Err(ConfigError::EmptyGroup);
        }
        let mut probe = Catalog::new();
        for def in group.iter() {
            if def.is_required() {
                return Err(ConfigError::RequiredGroupMember {
                    option: def.display_name(),
                });
            }
            self.check_names(def)?;
            probe.check_names(def)?;
            probe.insert(def.clone());
        }

        let id = self.groups.len();
        let required = group.is_required();
        let members: Vec<usize> = group.into_members().map(|def| self.insert(def)).collect();
        for &index in &members {
            self.group_of.insert(index, id);
        }
        self.groups.push(GroupEntry { members, required });
        Ok(GroupId(id))
    }

    /// Short and long names share one namespace, since queries such as
    /// [`get`](Self::get) accept either form.
    fn check_names(&self, def: &OptDef) -> Result<(), ConfigError> {
        if let Some(short) = def.short_name() {
            if self.short_index.contains_key(short) || self.long_index.contains_key(short) {
                return Err(ConfigError::DuplicateOption(format!("{SHORT_PREFIX}{short}")));
            }
        }
        if let Some(long) = def.long_name() {
            if self.long_index.contains_key(long) || self.short_index.contains_key(long) {
                return Err(ConfigError::DuplicateOption(format!("{LONG_PREFIX}{long}")));
            }
        }
        Ok(())
    }

    fn insert(&mut self, def: OptDef) -> usize {
        let index = self.defs.len();
        if let Some(short) = def.short_name() {
            self.short_index.insert(short.to_string(), index);
        }
        if let Some(long) = def.long_name() {
            self.long_index.insert(long.to_string(), index);
        }
        self.defs.push(def);
        index
    }

    /// Look up an option by short or long name; leading dashes are ignored.
    pub fn get(&self, name: &str) -> Option<&OptDef> {
        let name = name.trim_start_matches('-');
        self.short_index
            .get(name)
            .or_else(|| self.long_index.get(name))
            .map(|&i| &self.defs[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Resolve a name as typed after its prefix.
    ///
    /// Long names match exactly first, then by unique prefix. Short names only
    /// match exactly.
    pub fn resolve(&self, token: &str, kind: NameKind) -> Result<Option<&OptDef>, ParseError> {
        let index = match kind {
            NameKind::Short => self.short(token),
            NameKind::Long => self.long(token)?,
        };
        Ok(index.map(|i| &self.defs[i]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Options that must appear on every command line.
    pub fn required_options(&self) -> impl Iterator<Item = &OptDef> {
        self.defs.iter().filter(|d| d.is_required())
    }

    pub fn groups(&self) -> impl Iterator<Item = GroupRef<'_>> {
        (0..self.groups.len()).map(|id| GroupRef {
            catalog: self,
            id: GroupId(id),
        })
    }

    pub fn group_by_id(&self, id: GroupId) -> Option<GroupRef<'_>> {
        (id.0 < self.groups.len()).then_some(GroupRef { catalog: self, id })
    }

    /// The group containing `def`, if any.
    pub fn group_of(&self, def: &OptDef) -> Option<GroupId> {
        let index = self.position(def)?;
        self.group_of.get(&index).map(|&g| GroupId(g))
    }

    // Index-based access for the parser.

    pub(crate) fn def(&self, index: usize) -> &OptDef {
        &self.defs[index]
    }

    pub(crate) fn position(&self, def: &OptDef) -> Option<usize> {
        let index = match (def.short_name(), def.long_name()) {
            (Some(short), _) => *self.short_index.get(short)?,
            (None, Some(long)) => *self.long_index.get(long)?,
            (None, None) => return None,
        };
        (self.defs[index] == *def).then_some(index)
    }

    pub(crate) fn short(&self, name: &str) -> Option<usize> {
        self.short_index.get(name).copied()
    }

    pub(crate) fn long(&self, name: &str) -> Result<Option<usize>, ParseError> {
        if let Some(&index) = self.long_index.get(name) {
            return Ok(Some(index));
        }
        let candidates: Vec<(&String, &usize)> = self
            .long_index
            .range::<str, _>((Bound::Included(name), Bound::Unbounded))
            .take_while(|(long, _)| long.starts_with(name))
            .collect();
        match candidates.as_slice() {
            [] => Ok(None),
            &[(_, &index)] => Ok(Some(index)),
            many => Err(ParseError::AmbiguousOption {
                option: format!("{LONG_PREFIX}{name}"),
                candidates: many
                    .iter()
                    .map(|(long, _)| format!("{LONG_PREFIX}{long}"))
                    .collect(),
            }),
        }
    }

    pub(crate) fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn group_index_of(&self, index: usize) -> Option<usize> {
        self.group_of.get(&index).copied()
    }
}

/// Read access to one registered group.
#[derive(Debug, Clone, Copy)]
pub struct GroupRef<'c> {
    catalog: &'c Catalog,
    id: GroupId,
}

impl<'c> GroupRef<'c> {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn is_required(&self) -> bool {
        self.entry().required
    }

    pub fn members(self) -> impl Iterator<Item = &'c OptDef> {
        let catalog = self.catalog;
        catalog.groups[self.id.0]
            .members
            .iter()
            .map(move |&i| &catalog.defs[i])
    }

    /// Display names of the members, as reported in errors.
    pub fn alternatives(&self) -> Vec<String> {
        self.members().map(OptDef::display_name).collect()
    }

    fn entry(&self) -> &'c GroupEntry {
        &self.catalog.groups[self.id.0]
    }
}
