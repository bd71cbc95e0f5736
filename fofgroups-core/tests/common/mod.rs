use fofgroups_core::{Catalog, Galaxy, GalaxyId};

/// Galaxies sharing one sky position and distance, identified by row index.
#[must_use]
pub fn colocated(velocities: &[f64]) -> Catalog {
    let galaxies = velocities
        .iter()
        .zip(0_u64..)
        .map(|(&velocity, id)| Galaxy::new(GalaxyId::new(id), 1.1, -0.3, velocity, 250.0))
        .collect();
    Catalog::try_new(galaxies).expect("colocated catalog must validate")
}

/// Three compact clumps on the equator at 500 Mpc plus one isolated galaxy.
///
/// Clump members sit 0.0004 rad (0.2 Mpc) apart in RA; the clumps themselves
/// are 0.01 rad (5 Mpc) apart.
#[must_use]
pub fn clumps() -> Catalog {
    let mut galaxies = Vec::new();
    let mut next_id = 1_u64;
    for (clump, size) in [3_usize, 2, 4].into_iter().enumerate() {
        for member in 0..size {
            let ra = clump as f64 * 0.01 + member as f64 * 0.0004;
            galaxies.push(Galaxy::new(GalaxyId::new(next_id), ra, 0.0, 3_000.0, 500.0));
            next_id += 1;
        }
    }
    galaxies.push(Galaxy::new(GalaxyId::new(next_id), 0.5, 0.0, 3_000.0, 500.0));
    Catalog::try_new(galaxies).expect("clump catalog must validate")
}

/// Two galaxies at antipodal sky positions with equal velocities and 1 Mpc
/// transverse distances.
///
/// At declination ±0.0049 the inverse cosine argument of their separation
/// rounds to one ulp below `-1`.
#[must_use]
pub fn antipodal() -> Catalog {
    Catalog::try_new(vec![
        Galaxy::new(GalaxyId::new(1), 0.0, 0.0049, 1_000.0, 1.0),
        Galaxy::new(GalaxyId::new(2), std::f64::consts::PI, -0.0049, 1_000.0, 1.0),
    ])
    .expect("antipodal catalog must validate")
}
