//! Ordered groups of subsystems wired by name.
//!
//! A [`Group`] keeps its members in insertion order, which is also their
//! execution order. Members added with [`Group::add`] have their tagged
//! variables promoted: a promoted input is fed by any same-named output of a
//! sibling, with no explicit connection. Everything else is addressed as
//! `<member>.<variable>` and wired with [`Group::connect`].
//!
//! A group never holds an inconsistent wiring state. Every mutation checks
//! its effect on the group's variable namespace and is rejected with a
//! [`PipelineError`] before anything changes.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::trace;

use super::subsystem::{Subsystem, Tag};

/// Errors raised while placing or wiring group members.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A member with the same name is already present.
    #[error("`{group}` already has a member named `{name}`")]
    DuplicateMember { group: String, name: String },

    /// Two members expose an output under the same name.
    #[error("output `{variable}` is provided by both `{first}` and `{second}`")]
    DuplicateOutput {
        variable: String,
        first: String,
        second: String,
    },

    /// An explicit connection names a source that is not an output.
    #[error("`{variable}` is not an output of `{group}`")]
    UnknownSource { group: String, variable: String },

    /// An explicit connection names a target that is not an input.
    #[error("`{variable}` is not an input of `{group}`")]
    UnknownTarget { group: String, variable: String },

    /// An input would receive values from more than one source.
    #[error("input `{variable}` of `{group}` already has a source")]
    MultipleSources { group: String, variable: String },
}

/// A directed edge from an output to an input.
///
/// Implicit name-equality connections have `source == target`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Connection {
    pub source: String,
    pub target: String,
}

/// Anything that can be placed in a [`Group`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Component(Subsystem),
    Group(Group),
}

impl Member {
    /// The implementation label of the subsystem or group.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Component(subsystem) => subsystem.kind(),
            Self::Group(group) => group.kind(),
        }
    }

    #[must_use]
    pub fn as_subsystem(&self) -> Option<&Subsystem> {
        match self {
            Self::Component(subsystem) => Some(subsystem),
            Self::Group(_) => None,
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Component(_) => None,
        }
    }

    /// Outputs visible from outside the member, with their promotability.
    fn exposed_outputs(&self) -> Vec<(String, bool)> {
        match self {
            Self::Component(subsystem) => subsystem
                .outputs()
                .iter()
                .map(|v| (v.name().to_owned(), v.is_tagged()))
                .collect(),
            Self::Group(group) => group.outputs().into_iter().map(|k| (k, true)).collect(),
        }
    }

    /// Inputs that still need a source outside the member, with their
    /// promotability and declared tag.
    fn exposed_inputs(&self) -> Vec<(String, bool, Option<Tag>)> {
        match self {
            Self::Component(subsystem) => subsystem
                .inputs()
                .iter()
                .map(|v| (v.name().to_owned(), v.is_tagged(), v.tag()))
                .collect(),
            Self::Group(group) => group
                .open_inputs()
                .into_iter()
                .map(|(k, tag)| (k, true, tag))
                .collect(),
        }
    }

    fn component_count(&self) -> usize {
        match self {
            Self::Component(_) => 1,
            Self::Group(group) => group.component_count(),
        }
    }
}

impl From<Subsystem> for Member {
    fn from(subsystem: Subsystem) -> Self {
        Self::Component(subsystem)
    }
}

impl From<Group> for Member {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    member: Member,
    promoted: bool,
}

impl Slot {
    fn key(&self, name: &str, variable: String, tagged: bool) -> String {
        if self.promoted && tagged {
            variable
        } else {
            format!("{name}.{variable}")
        }
    }

    fn output_keys(&self, name: &str) -> Vec<String> {
        self.member
            .exposed_outputs()
            .into_iter()
            .map(|(variable, tagged)| self.key(name, variable, tagged))
            .collect()
    }

    fn input_keys(&self, name: &str) -> Vec<(String, Option<Tag>)> {
        self.member
            .exposed_inputs()
            .into_iter()
            .map(|(variable, tagged, tag)| (self.key(name, variable, tagged), tag))
            .collect()
    }
}

/// An ordered, named collection of members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    kind: String,
    members: IndexMap<String, Slot>,
    connections: Vec<Connection>,
}

impl Group {
    /// Creates an empty group.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            members: IndexMap::new(),
            connections: Vec::new(),
        }
    }

    /// Appends a member whose tagged variables are promoted.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] if the name is taken, if a promoted output
    /// collides with an existing one, or if it would feed an input that is
    /// already explicitly connected.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        member: impl Into<Member>,
    ) -> Result<(), PipelineError> {
        self.insert(name.into(), member.into(), true)
    }

    /// Appends a member whose variables stay under `<name>.<variable>`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Group::add`].
    pub fn add_unpromoted(
        &mut self,
        name: impl Into<String>,
        member: impl Into<Member>,
    ) -> Result<(), PipelineError> {
        self.insert(name.into(), member.into(), false)
    }

    fn insert(
        &mut self,
        name: String,
        member: Member,
        promoted: bool,
    ) -> Result<(), PipelineError> {
        if self.members.contains_key(&name) {
            return Err(PipelineError::DuplicateMember {
                group: self.kind.clone(),
                name,
            });
        }

        let slot = Slot { member, promoted };
        let outputs = self.output_index();
        let targets: BTreeSet<&str> = self.connections.iter().map(|c| c.target.as_str()).collect();
        let mut seen = BTreeSet::new();

        for key in slot.output_keys(&name) {
            if targets.contains(key.as_str()) {
                return Err(PipelineError::MultipleSources {
                    group: self.kind.clone(),
                    variable: key,
                });
            }
            let first = match outputs.get(&key) {
                Some(first) => Some((*first).to_owned()),
                None if seen.contains(&key) => Some(name.clone()),
                None => None,
            };
            if let Some(first) = first {
                return Err(PipelineError::DuplicateOutput {
                    variable: key,
                    first,
                    second: name,
                });
            }
            seen.insert(key);
        }

        trace!(group = %self.kind, member = %name, promoted, "member added");
        self.members.insert(name, slot);
        Ok(())
    }

    /// Connects an output to an input, both named at this group's level.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] if either end does not exist or if the
    /// target already has a source.
    pub fn connect(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<(), PipelineError> {
        let (source, target) = (source.into(), target.into());

        let outputs = self.output_index();
        if !outputs.contains_key(&source) {
            return Err(PipelineError::UnknownSource {
                group: self.kind.clone(),
                variable: source,
            });
        }
        if !self.input_index().contains_key(&target) {
            return Err(PipelineError::UnknownTarget {
                group: self.kind.clone(),
                variable: target,
            });
        }
        if outputs.contains_key(&target) || self.connections.iter().any(|c| c.target == target) {
            return Err(PipelineError::MultipleSources {
                group: self.kind.clone(),
                variable: target,
            });
        }

        trace!(group = %self.kind, %source, %target, "connected");
        self.connections.push(Connection { source, target });
        Ok(())
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Member names in execution order.
    #[must_use]
    pub fn order(&self) -> Vec<&str> {
        self.members.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.get(name).map(|slot| &slot.member)
    }

    /// Returns the named member if it is a single subsystem.
    #[must_use]
    pub fn subsystem(&self, name: &str) -> Option<&Subsystem> {
        self.get(name).and_then(Member::as_subsystem)
    }

    /// Returns the named member if it is a nested group.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.get(name).and_then(Member::as_group)
    }

    /// Iterates members in execution order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members
            .iter()
            .map(|(name, slot)| (name.as_str(), &slot.member))
    }

    /// Output names visible at this group's level.
    #[must_use]
    pub fn outputs(&self) -> Vec<String> {
        self.output_index().into_keys().collect()
    }

    /// Input names visible at this group's level, connected or not.
    #[must_use]
    pub fn inputs(&self) -> Vec<String> {
        self.input_index().into_keys().collect()
    }

    /// Inputs with no source inside this group.
    ///
    /// At the top of a model these are the inputs a host framework would
    /// silently back with default values.
    #[must_use]
    pub fn unconnected_inputs(&self) -> Vec<String> {
        self.open_inputs().into_keys().collect()
    }

    /// Inputs with no source inside this group, with the tag each was
    /// declared with.
    #[must_use]
    pub fn open_inputs(&self) -> BTreeMap<String, Option<Tag>> {
        let outputs = self.output_index();
        self.input_index()
            .into_iter()
            .filter(|(key, _)| {
                !outputs.contains_key(key) && !self.connections.iter().any(|c| &c.target == key)
            })
            .collect()
    }

    /// Explicit connections made at this level, in the order they were made.
    #[must_use]
    pub fn explicit_connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Every connection inside this group, nested groups included.
    ///
    /// Nested connections are reported with their member path prefixed.
    #[must_use]
    pub fn connections(&self) -> BTreeSet<Connection> {
        let outputs = self.output_index();
        let mut all: BTreeSet<Connection> = self
            .input_index()
            .into_keys()
            .filter(|key| outputs.contains_key(key))
            .map(|key| Connection {
                source: key.clone(),
                target: key,
            })
            .collect();

        all.extend(self.connections.iter().cloned());

        for (name, slot) in &self.members {
            if let Member::Group(group) = &slot.member {
                all.extend(group.connections().into_iter().map(|c| Connection {
                    source: format!("{name}.{}", c.source),
                    target: format!("{name}.{}", c.target),
                }));
            }
        }

        all
    }

    /// Number of leaf subsystems, nested groups included.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.members
            .values()
            .map(|slot| slot.member.component_count())
            .sum()
    }

    fn output_index(&self) -> BTreeMap<String, &str> {
        let mut index = BTreeMap::new();
        for (name, slot) in &self.members {
            for key in slot.output_keys(name) {
                index.insert(key, name.as_str());
            }
        }
        index
    }

    /// Input keys with the tag of their first declaration.
    fn input_index(&self) -> BTreeMap<String, Option<Tag>> {
        let mut index = BTreeMap::new();
        for (name, slot) in &self.members {
            for (key, tag) in slot.input_keys(name) {
                index.entry(key).or_insert(tag);
            }
        }
        index
    }
}
