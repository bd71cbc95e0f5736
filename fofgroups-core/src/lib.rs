//! Friends-of-friends galaxy group finding.
//!
//! The crate links galaxies whose line-of-sight velocity separation and
//! projected transverse separation both fall within a linking length, then
//! partitions the linked galaxies into groups by transitive closure and
//! tabulates the resulting group richness distribution.
//!
//! The pipeline runs in three stages:
//!
//! - [`find_links`] scans the [`Catalog`] and emits directed [`Link`]
//!   observations for one [`LinkingLengths`] value.
//! - [`assemble_groups`] deduplicates a [`LinkList`] and labels its connected
//!   components.
//! - [`RichnessTable`] counts members per group and the number of groups per
//!   richness value.
//!
//! [`FriendsOfFriends`] wires the stages together and sweeps a
//! [`TransverseSweep`] in parallel when the `cpu` feature is enabled.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod catalog;
mod error;
mod fof;
mod galaxy;
mod groups;
mod linking;
mod links;
mod metric;
mod pairs;
mod richness;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::FriendsOfFriendsBuilder,
    catalog::Catalog,
    error::{
        CatalogError, CatalogErrorCode, FofError, FofErrorCode, MetricError, MetricErrorCode,
        Result,
    },
    fof::{FriendsOfFriends, LinkingRun, SweepOutcome},
    galaxy::{Galaxy, GalaxyId},
    groups::{GroupAssignment, GroupId, GroupMember, assemble_groups},
    linking::{LinkingLengths, MAX_SWEEP_VALUES, TransverseSweep},
    links::{Link, LinkList, UndirectedEdge, deduplicate_links},
    metric::{
        ClampMode, angular_separation, line_of_sight_separation, transverse_separation,
    },
    pairs::{PairStrategy, find_links},
    richness::{GroupRichness, RichnessFrequency, RichnessTable},
};
