//! Unit and property tests for pair finding.

use std::collections::HashSet;

use proptest::prelude::*;
use rstest::rstest;

use crate::{
    ClampMode, FofError, Galaxy, GalaxyId, Link, LinkingLengths, MetricError,
    catalog::Catalog,
    test_utils::{
        antipodal_catalog, clustered_catalog_strategy, colocated_catalog, suite_proptest_config,
    },
};

use super::{PairStrategy, find_links};

fn link(source: u64, target: u64) -> Link {
    Link::new(GalaxyId::new(source), GalaxyId::new(target))
}

fn run(catalog: &Catalog, los: f64, trans: f64, strategy: PairStrategy) -> Vec<Link> {
    let lengths = LinkingLengths::new(los, trans).expect("lengths are valid");
    find_links(catalog, lengths, ClampMode::Symmetric, strategy)
        .expect("pair finding must succeed")
        .into_links()
}

#[rstest]
#[case::brute(PairStrategy::BruteForce)]
#[case::window(PairStrategy::VelocityWindow)]
fn velocity_boundary_is_inclusive(#[case] strategy: PairStrategy) {
    let catalog = colocated_catalog(&[0.0, 100.0, 600.0, 610.0, 5_000.0]);
    let links = run(&catalog, 500.0, 1.0, strategy);
    assert_eq!(
        links,
        vec![
            link(0, 1),
            link(1, 0),
            link(1, 2),
            link(2, 1),
            link(2, 3),
            link(3, 2),
        ]
    );
}

#[rstest]
#[case::brute(PairStrategy::BruteForce)]
#[case::window(PairStrategy::VelocityWindow)]
fn tighter_velocity_threshold_drops_boundary_pair(#[case] strategy: PairStrategy) {
    let catalog = colocated_catalog(&[0.0, 100.0, 600.0, 610.0, 5_000.0]);
    let links = run(&catalog, 499.0, 1.0, strategy);
    assert_eq!(links, vec![link(0, 1), link(1, 0), link(2, 3), link(3, 2)]);
}

#[rstest]
#[case::brute(PairStrategy::BruteForce)]
#[case::window(PairStrategy::VelocityWindow)]
fn transverse_threshold_filters_sky_neighbours(#[case] strategy: PairStrategy) {
    // 0.001 rad at 500 Mpc is 0.5 Mpc; 0.003 rad is 1.5 Mpc.
    let catalog = Catalog::try_new(vec![
        Galaxy::new(GalaxyId::new(1), 0.0, 0.0, 1_000.0, 500.0),
        Galaxy::new(GalaxyId::new(2), 0.001, 0.0, 1_050.0, 500.0),
        Galaxy::new(GalaxyId::new(3), 0.003, 0.0, 1_100.0, 500.0),
    ])
    .expect("catalog must validate");

    let links = run(&catalog, 500.0, 0.6, strategy);
    assert_eq!(links, vec![link(1, 2), link(2, 1)]);

    let links = run(&catalog, 500.0, 1.2, strategy);
    assert_eq!(
        links,
        vec![link(1, 2), link(2, 1), link(2, 3), link(3, 2)]
    );
}

#[test]
fn empty_and_single_galaxy_catalogs_yield_no_links() {
    assert!(run(&colocated_catalog(&[]), 500.0, 1.0, PairStrategy::BruteForce).is_empty());
    assert!(run(&colocated_catalog(&[10.0]), 500.0, 1.0, PairStrategy::VelocityWindow).is_empty());
}

#[test]
fn duplicate_positions_never_link_to_themselves() {
    let catalog = colocated_catalog(&[42.0, 42.0, 42.0]);
    let links = run(&catalog, 0.0, 0.001, PairStrategy::VelocityWindow);
    assert_eq!(links.len(), 6);
    assert!(links.iter().all(|link| !link.is_self_link()));
}

#[rstest]
#[case::brute(PairStrategy::BruteForce)]
#[case::window(PairStrategy::VelocityWindow)]
fn upper_only_clamp_reports_out_of_domain_pair(#[case] strategy: PairStrategy) {
    let catalog = antipodal_catalog();
    let lengths = LinkingLengths::new(500.0, 5_000.0).expect("lengths are valid");

    let err = find_links(&catalog, lengths, ClampMode::UpperOnly, strategy)
        .expect_err("cosine below -1 must fail in upper-only mode");
    match err {
        FofError::NumericDomain {
            left,
            right,
            error: MetricError::OutOfDomain { cosine },
        } => {
            assert_eq!((left, right), (GalaxyId::new(1), GalaxyId::new(2)));
            assert!(cosine < -1.0);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Half a great circle at 1 Mpc is pi Mpc.
    let links = find_links(&catalog, lengths, ClampMode::Symmetric, strategy)
        .expect("symmetric clamp must succeed");
    assert_eq!(links.into_links(), vec![link(1, 2), link(2, 1)]);
}

#[test]
fn upper_only_clamp_skips_pairs_outside_velocity_threshold() {
    let antipodal = antipodal_catalog();
    let lengths = LinkingLengths::new(0.0, 5_000.0).expect("lengths are valid");
    let catalog = Catalog::try_new(
        antipodal
            .galaxies()
            .iter()
            .zip([0.0, 10.0])
            .map(|(galaxy, offset)| {
                Galaxy::new(
                    galaxy.id(),
                    galaxy.ra(),
                    galaxy.dec(),
                    galaxy.line_of_sight_velocity() + offset,
                    galaxy.transverse_distance(),
                )
            })
            .collect(),
    )
    .expect("catalog must validate");

    let links = find_links(&catalog, lengths, ClampMode::UpperOnly, PairStrategy::BruteForce)
        .expect("pairs outside the velocity threshold are never measured");
    assert!(links.is_empty());
}

fn link_set(links: &[Link]) -> HashSet<Link> {
    links.iter().copied().collect()
}

proptest! {
    #![proptest_config(suite_proptest_config(96))]

    #[test]
    fn strategies_produce_identical_links(
        catalog in clustered_catalog_strategy(),
        los in 0.0_f64..1_500.0,
        trans in 0.0_f64..3.0,
    ) {
        let brute = run(&catalog, los, trans, PairStrategy::BruteForce);
        let window = run(&catalog, los, trans, PairStrategy::VelocityWindow);
        prop_assert_eq!(brute, window);
    }

    #[test]
    fn links_are_symmetric_and_never_self_referencing(
        catalog in clustered_catalog_strategy(),
        los in 0.0_f64..1_500.0,
        trans in 0.0_f64..3.0,
    ) {
        let links = run(&catalog, los, trans, PairStrategy::VelocityWindow);
        let set = link_set(&links);
        prop_assert_eq!(set.len(), links.len(), "each directed link is emitted once");
        for link in &links {
            prop_assert!(!link.is_self_link());
            prop_assert!(set.contains(&link.reversed()));
        }
    }

    #[test]
    fn growing_transverse_threshold_never_loses_links(
        catalog in clustered_catalog_strategy(),
        los in 0.0_f64..1_500.0,
        trans in 0.0_f64..2.0,
        extra in 0.0_f64..2.0,
    ) {
        let narrow = link_set(&run(&catalog, los, trans, PairStrategy::VelocityWindow));
        let wide = link_set(&run(&catalog, los, trans + extra, PairStrategy::VelocityWindow));
        prop_assert!(narrow.is_subset(&wide));
    }
}
