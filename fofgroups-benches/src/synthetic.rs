//! Seeded synthetic galaxy catalogs for benchmarking.
//!
//! Galaxies are scattered around a handful of cluster centres inside a
//! narrow sky patch so that realistic linking lengths produce a mix of rich
//! groups, pairs, and isolated galaxies.

use fofgroups_core::{Catalog, CatalogError, Galaxy, GalaxyId};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Hubble constant in km/s/Mpc used to derive distances from velocities.
const HUBBLE: f64 = 70.0;

/// Errors that may occur during synthetic catalog generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum SyntheticError {
    /// The requested galaxy count was zero.
    #[error("galaxy count must be greater than zero")]
    ZeroGalaxies,
    /// The requested cluster count was zero.
    #[error("cluster count must be greater than zero")]
    ZeroClusters,
    /// The generated rows failed catalog validation.
    #[error("generated catalog is invalid: {0}")]
    Catalog(#[from] CatalogError),
}

/// Configuration for synthetic catalog generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of galaxies to generate.
    pub galaxies: usize,
    /// Number of cluster centres.
    pub clusters: usize,
    /// Fraction of galaxies drawn around a centre; the rest are field
    /// galaxies spread uniformly.
    pub clustered_fraction: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl SyntheticConfig {
    /// Returns a configuration with `galaxies` galaxies and defaults for the
    /// rest.
    #[must_use]
    pub fn with_galaxies(galaxies: usize) -> Self {
        Self {
            galaxies,
            clusters: galaxies.div_ceil(50).max(1),
            clustered_fraction: 0.6,
            seed: 42,
        }
    }
}

/// Generates a catalog from `config`.
///
/// # Errors
/// Returns [`SyntheticError::ZeroGalaxies`] or
/// [`SyntheticError::ZeroClusters`] for empty configurations.
///
/// # Examples
/// ```
/// use fofgroups_benches::synthetic::{SyntheticConfig, generate_catalog};
///
/// let catalog = generate_catalog(&SyntheticConfig::with_galaxies(25)).expect("valid config");
/// assert_eq!(catalog.len(), 25);
/// ```
pub fn generate_catalog(config: &SyntheticConfig) -> Result<Catalog, SyntheticError> {
    if config.galaxies == 0 {
        return Err(SyntheticError::ZeroGalaxies);
    }
    if config.clusters == 0 {
        return Err(SyntheticError::ZeroClusters);
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let centres: Vec<(f64, f64, f64)> = (0..config.clusters)
        .map(|_| {
            (
                rng.gen_range(0.0..0.5),
                rng.gen_range(-0.2..0.2),
                rng.gen_range(2_000.0..25_000.0),
            )
        })
        .collect();

    let galaxies = (0..config.galaxies)
        .zip(1_u64..)
        .map(|(_, id)| {
            let (ra, dec, velocity) = if rng.gen_bool(config.clustered_fraction.clamp(0.0, 1.0)) {
                let (ra, dec, velocity) = centres[rng.gen_range(0..centres.len())];
                (
                    ra + rng.gen_range(-0.002..0.002),
                    dec + rng.gen_range(-0.002..0.002),
                    velocity + rng.gen_range(-400.0..400.0),
                )
            } else {
                (
                    rng.gen_range(0.0..0.5),
                    rng.gen_range(-0.2..0.2),
                    rng.gen_range(2_000.0..25_000.0),
                )
            };
            Galaxy::new(GalaxyId::new(id), ra, dec, velocity, velocity / HUBBLE)
        })
        .collect();

    Ok(Catalog::try_new(galaxies)?)
}
