//! Directed link observations and their deduplication into undirected edges.
//!
//! The pair finder reports every qualifying pair twice, once from each
//! galaxy's neighbour scan. [`deduplicate_links`] is the explicit stage that
//! turns that directed multiset into the undirected edge set the group
//! assembler consumes.

use crate::galaxy::GalaxyId;

/// A directed link observation: `target` qualified during `source`'s scan.
///
/// # Examples
/// ```
/// use fofgroups_core::{GalaxyId, Link};
///
/// let link = Link::new(GalaxyId::new(4), GalaxyId::new(2));
/// assert_eq!(link.source(), GalaxyId::new(4));
/// assert_eq!(link.reversed(), Link::new(GalaxyId::new(2), GalaxyId::new(4)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    source: GalaxyId,
    target: GalaxyId,
}

impl Link {
    /// Creates a directed link.
    #[must_use]
    pub const fn new(source: GalaxyId, target: GalaxyId) -> Self {
        Self { source, target }
    }

    /// Returns the galaxy whose scan produced the link.
    #[must_use]
    pub const fn source(&self) -> GalaxyId {
        self.source
    }

    /// Returns the neighbour found by the scan.
    #[must_use]
    pub const fn target(&self) -> GalaxyId {
        self.target
    }

    /// Returns the same pair observed from the other direction.
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }

    /// Returns whether both ends name the same galaxy.
    #[must_use]
    pub fn is_self_link(&self) -> bool {
        self.source == self.target
    }
}

/// An ordered list of directed link observations for one linking-length pair.
///
/// The list may contain reversed duplicates and, when read from an external
/// artifact, repeated or self-referencing entries.
///
/// # Examples
/// ```
/// use fofgroups_core::{GalaxyId, Link, LinkList};
///
/// let links = LinkList::new(vec![
///     Link::new(GalaxyId::new(1), GalaxyId::new(2)),
///     Link::new(GalaxyId::new(2), GalaxyId::new(1)),
/// ]);
/// assert_eq!(links.len(), 2);
/// assert_eq!(links.undirected_edges().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkList {
    links: Vec<Link>,
}

impl LinkList {
    /// Wraps `links` without modification.
    #[must_use]
    pub const fn new(links: Vec<Link>) -> Self {
        Self { links }
    }

    /// Returns the observations in emission order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Returns the number of directed observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns whether no links were observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Consumes the list, returning the observations.
    #[must_use]
    pub fn into_links(self) -> Vec<Link> {
        self.links
    }

    /// Deduplicates the observations into undirected edges.
    #[must_use]
    pub fn undirected_edges(&self) -> Vec<UndirectedEdge> {
        deduplicate_links(&self.links)
    }
}

impl FromIterator<Link> for LinkList {
    fn from_iter<T: IntoIterator<Item = Link>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// An undirected edge stored with its lower identifier first.
///
/// # Examples
/// ```
/// use fofgroups_core::{GalaxyId, Link, UndirectedEdge};
///
/// let edge = UndirectedEdge::from_link(Link::new(GalaxyId::new(9), GalaxyId::new(3)))
///     .expect("distinct ends form an edge");
/// assert_eq!(edge.low(), GalaxyId::new(3));
/// assert_eq!(edge.high(), GalaxyId::new(9));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UndirectedEdge {
    low: GalaxyId,
    high: GalaxyId,
}

impl UndirectedEdge {
    /// Canonicalises `link`, returning `None` for a self-link.
    #[must_use]
    pub fn from_link(link: Link) -> Option<Self> {
        let (source, target) = (link.source(), link.target());
        match source.cmp(&target) {
            std::cmp::Ordering::Less => Some(Self {
                low: source,
                high: target,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                low: target,
                high: source,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Returns the lower identifier.
    #[must_use]
    pub const fn low(&self) -> GalaxyId {
        self.low
    }

    /// Returns the higher identifier.
    #[must_use]
    pub const fn high(&self) -> GalaxyId {
        self.high
    }
}

/// Collapses directed observations into a sorted set of undirected edges.
///
/// Direction is ignored, repeated observations collapse to one edge, and
/// self-links are dropped.
#[must_use]
pub fn deduplicate_links(links: &[Link]) -> Vec<UndirectedEdge> {
    let mut edges: Vec<UndirectedEdge> = links
        .iter()
        .copied()
        .filter_map(UndirectedEdge::from_link)
        .collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}
