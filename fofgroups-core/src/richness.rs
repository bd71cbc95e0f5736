//! Group richness tabulation.
//!
//! Richness is the number of members in a group. The richness-frequency
//! table (how many groups have each richness) is the artifact consumed by
//! downstream power-law fitting.

use std::collections::BTreeMap;

use crate::groups::{GroupAssignment, GroupId, GroupMember};

/// Member count of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupRichness {
    group: GroupId,
    richness: usize,
}

impl GroupRichness {
    /// Returns the group identifier.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        self.group
    }

    /// Returns the number of members.
    #[must_use]
    pub const fn richness(&self) -> usize {
        self.richness
    }
}

/// Number of groups sharing one richness value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RichnessFrequency {
    richness: usize,
    count: usize,
}

impl RichnessFrequency {
    /// Creates a frequency row.
    #[must_use]
    pub const fn new(richness: usize, count: usize) -> Self {
        Self { richness, count }
    }

    /// Returns the richness value.
    #[must_use]
    pub const fn richness(&self) -> usize {
        self.richness
    }

    /// Returns the number of groups with this richness.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

/// Per-group richness and the derived richness-frequency table.
///
/// # Examples
/// ```
/// use fofgroups_core::{GalaxyId, Link, LinkList, RichnessFrequency, RichnessTable, assemble_groups};
///
/// let id = GalaxyId::new;
/// let links = LinkList::new(vec![
///     Link::new(id(1), id(2)),
///     Link::new(id(3), id(4)),
///     Link::new(id(4), id(5)),
/// ]);
/// let table = RichnessTable::from_assignment(&assemble_groups(&links));
/// assert_eq!(
///     table.frequencies(),
///     vec![RichnessFrequency::new(2, 1), RichnessFrequency::new(3, 1)],
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichnessTable {
    groups: Vec<GroupRichness>,
}

impl RichnessTable {
    /// Counts the members of every group in `assignment`.
    #[must_use]
    pub fn from_assignment(assignment: &GroupAssignment) -> Self {
        let mut counts: BTreeMap<GroupId, usize> = BTreeMap::new();
        for member in assignment.members() {
            *counts.entry(member.group()).or_default() += 1;
        }
        Self::from_counts(counts)
    }

    /// Counts members per group from raw membership records.
    #[must_use]
    pub fn from_members(members: &[GroupMember]) -> Self {
        let mut counts: BTreeMap<GroupId, usize> = BTreeMap::new();
        for member in members {
            *counts.entry(member.group()).or_default() += 1;
        }
        Self::from_counts(counts)
    }

    fn from_counts(counts: BTreeMap<GroupId, usize>) -> Self {
        let groups = counts
            .into_iter()
            .map(|(group, richness)| GroupRichness { group, richness })
            .collect();
        Self { groups }
    }

    /// Returns the richness of every group in group order.
    #[must_use]
    pub fn groups(&self) -> &[GroupRichness] {
        &self.groups
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns the total number of grouped galaxies.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(GroupRichness::richness).sum()
    }

    /// Returns one row per distinct richness value, ascending.
    #[must_use]
    pub fn frequencies(&self) -> Vec<RichnessFrequency> {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for group in &self.groups {
            *counts.entry(group.richness()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(richness, count)| RichnessFrequency::new(richness, count))
            .collect()
    }
}
