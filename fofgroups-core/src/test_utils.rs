//! Shared test utilities for `fofgroups-core`.

use fofgroups_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

use crate::{
    catalog::Catalog,
    galaxy::{Galaxy, GalaxyId},
};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `FOFGROUPS_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds a catalog of galaxies sharing one sky position, identified by
/// their index and differing only in velocity.
pub(crate) fn colocated_catalog(velocities: &[f64]) -> Catalog {
    let galaxies = velocities
        .iter()
        .zip(0_u64..)
        .map(|(&velocity, id)| Galaxy::new(GalaxyId::new(id), 0.4, 0.2, velocity, 500.0))
        .collect();
    Catalog::try_new(galaxies).expect("colocated catalog must validate")
}

/// Declination at which `sin(d)·sin(-d) + cos(d)·cos(-d)·cos(π)` rounds to
/// `-1.0000000000000002`.
pub(crate) const ANTIPODAL_DECLINATION: f64 = 0.0049;

/// Builds two galaxies at antipodal sky positions with equal velocities.
///
/// The inverse cosine argument of their angular separation lands one ulp
/// below `-1`.
pub(crate) fn antipodal_catalog() -> Catalog {
    Catalog::try_new(vec![
        Galaxy::new(GalaxyId::new(1), 0.0, ANTIPODAL_DECLINATION, 1_000.0, 1.0),
        Galaxy::new(
            GalaxyId::new(2),
            std::f64::consts::PI,
            -ANTIPODAL_DECLINATION,
            1_000.0,
            1.0,
        ),
    ])
    .expect("antipodal catalog must validate")
}

/// Generates small catalogs packed into a narrow patch of sky so that
/// sub-Mpc transverse linking lengths produce a mix of linked and isolated
/// galaxies.
pub(crate) fn clustered_catalog_strategy() -> impl Strategy<Value = Catalog> {
    proptest::collection::vec(
        (0.0_f64..0.004, -0.002_f64..0.002, 0.0_f64..3_000.0, 300.0_f64..700.0),
        0..40,
    )
    .prop_map(|rows| {
        let galaxies = rows
            .into_iter()
            .zip(100_u64..)
            .map(|((ra, dec, velocity, distance), id)| {
                Galaxy::new(GalaxyId::new(id), ra, dec, velocity, distance)
            })
            .collect();
        Catalog::try_new(galaxies).expect("generated catalog must validate")
    })
}
