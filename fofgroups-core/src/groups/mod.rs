//! Group assembly: connected components of the deduplicated link graph.
//!
//! The assembler is a pure function of a [`LinkList`]; it never sees the
//! catalog or the linking lengths that produced the links. Galaxies absent
//! from every link are not grouped.

mod union_find;


use std::fmt;

use tracing::{info, instrument};

use crate::{galaxy::GalaxyId, links::LinkList};

use self::union_find::DisjointSet;

/// Identifier of an assembled group. Identifiers start at 1.
///
/// # Examples
/// ```
/// use fofgroups_core::GroupId;
///
/// let id = GroupId::new(3);
/// assert_eq!(id.get(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u64);

impl GroupId {
    /// Creates a group identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Membership of one galaxy in one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupMember {
    group: GroupId,
    galaxy: GalaxyId,
}

impl GroupMember {
    /// Creates a membership record.
    #[must_use]
    pub const fn new(group: GroupId, galaxy: GalaxyId) -> Self {
        Self { group, galaxy }
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        self.group
    }

    /// Returns the member galaxy.
    #[must_use]
    pub const fn galaxy(&self) -> GalaxyId {
        self.galaxy
    }
}

/// Partition of the linked galaxies into groups.
///
/// Groups are numbered from 1 in order of their smallest member identifier.
/// Membership records are ordered by group, then by galaxy.
///
/// # Examples
/// ```
/// use fofgroups_core::{GalaxyId, Link, LinkList, assemble_groups};
///
/// let id = GalaxyId::new;
/// let links = LinkList::new(vec![
///     Link::new(id(5), id(7)),
///     Link::new(id(7), id(9)),
///     Link::new(id(1), id(2)),
/// ]);
/// let groups = assemble_groups(&links);
/// assert_eq!(groups.group_count(), 2);
/// assert_eq!(
///     groups.partition(),
///     vec![vec![id(1), id(2)], vec![id(5), id(7), id(9)]],
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAssignment {
    members: Vec<GroupMember>,
    group_count: usize,
}

impl GroupAssignment {
    /// Returns the membership records ordered by group then galaxy.
    #[must_use]
    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Returns the number of grouped (linked) galaxies.
    #[must_use]
    pub fn linked_count(&self) -> usize {
        self.members.len()
    }

    /// Returns whether no galaxy was grouped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the group of `galaxy`, if it was linked.
    #[must_use]
    pub fn group_of(&self, galaxy: GalaxyId) -> Option<GroupId> {
        self.members
            .iter()
            .find(|member| member.galaxy() == galaxy)
            .map(GroupMember::group)
    }

    /// Returns the member lists of every group, in group order.
    #[must_use]
    pub fn partition(&self) -> Vec<Vec<GalaxyId>> {
        self.members
            .chunk_by(|left, right| left.group() == right.group())
            .map(|chunk| chunk.iter().map(GroupMember::galaxy).collect())
            .collect()
    }
}

/// Partitions the galaxies referenced by `links` into connected components.
///
/// Links are first collapsed with [`crate::deduplicate_links`], so reversed
/// duplicates, repeats, and self-links do not affect the result. An empty
/// link list yields an empty assignment.
#[instrument(name = "core.assemble_groups", skip(links), fields(links = links.len()))]
#[must_use]
pub fn assemble_groups(links: &LinkList) -> GroupAssignment {
    let edges = links.undirected_edges();

    let mut nodes: Vec<GalaxyId> = edges
        .iter()
        .flat_map(|edge| [edge.low(), edge.high()])
        .collect();
    nodes.sort_unstable();
    nodes.dedup();

    let mut components = DisjointSet::new(nodes.len());
    for edge in &edges {
        if let (Ok(low), Ok(high)) = (
            nodes.binary_search(&edge.low()),
            nodes.binary_search(&edge.high()),
        ) {
            components.union(low, high);
        }
    }

    let mut labels: Vec<Option<GroupId>> = vec![None; nodes.len()];
    let mut next_group = 1_u64;
    let mut members = Vec::with_capacity(nodes.len());
    for (index, &galaxy) in nodes.iter().enumerate() {
        let root = components.find(index);
        let group = *labels[root].get_or_insert_with(|| {
            let group = GroupId::new(next_group);
            next_group += 1;
            group
        });
        members.push(GroupMember::new(group, galaxy));
    }
    members.sort_by_key(|member| member.group());

    let assignment = GroupAssignment {
        group_count: labels.iter().flatten().count(),
        members,
    };
    info!(
        edges = edges.len(),
        groups = assignment.group_count(),
        linked = assignment.linked_count(),
        "group assembly completed"
    );
    assignment
}
