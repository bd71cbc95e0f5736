//! Validated galaxy catalog shared read-only by every linking run.

use std::collections::HashMap;

use crate::{
    error::CatalogError,
    galaxy::{Galaxy, GalaxyId},
};

/// An immutable, validated collection of galaxies.
///
/// Construction rejects duplicate identifiers, non-finite values, and
/// negative transverse distances so the pair finder can assume every metric
/// input is a well-defined number.
///
/// # Examples
/// ```
/// use fofgroups_core::{Catalog, CatalogError, Galaxy, GalaxyId};
///
/// let catalog = Catalog::try_new(vec![
///     Galaxy::new(GalaxyId::new(10), 0.0, 0.0, 100.0, 50.0),
///     Galaxy::new(GalaxyId::new(11), 0.0, 0.0, 200.0, 50.0),
/// ])?;
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.position(GalaxyId::new(11)), Some(1));
/// # Ok::<(), CatalogError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    galaxies: Vec<Galaxy>,
    positions: HashMap<GalaxyId, usize>,
}

impl Catalog {
    /// Validates `galaxies` and builds a catalog preserving their order.
    ///
    /// # Errors
    /// Returns [`CatalogError::NonFiniteField`] when any numeric field is NaN
    /// or infinite, [`CatalogError::NegativeDistance`] when a transverse
    /// comoving distance is negative, and
    /// [`CatalogError::DuplicateIdentifier`] when two rows share an id.
    pub fn try_new(galaxies: Vec<Galaxy>) -> Result<Self, CatalogError> {
        let mut positions = HashMap::with_capacity(galaxies.len());
        for (row, galaxy) in galaxies.iter().enumerate() {
            validate_galaxy(galaxy)?;
            if let Some(&first_row) = positions.get(&galaxy.id()) {
                return Err(CatalogError::DuplicateIdentifier {
                    id: galaxy.id(),
                    first_row,
                    duplicate_row: row,
                });
            }
            positions.insert(galaxy.id(), row);
        }
        Ok(Self {
            galaxies,
            positions,
        })
    }

    /// Returns the number of galaxies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.galaxies.len()
    }

    /// Returns whether the catalog holds no galaxies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.galaxies.is_empty()
    }

    /// Returns the galaxies in load order.
    #[must_use]
    pub fn galaxies(&self) -> &[Galaxy] {
        &self.galaxies
    }

    /// Returns the galaxy at `row`, if any.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Galaxy> {
        self.galaxies.get(row)
    }

    /// Returns the load-order row of the galaxy with identifier `id`.
    #[must_use]
    pub fn position(&self, id: GalaxyId) -> Option<usize> {
        self.positions.get(&id).copied()
    }
}

fn validate_galaxy(galaxy: &Galaxy) -> Result<(), CatalogError> {
    let fields = [
        ("ra", galaxy.ra()),
        ("dec", galaxy.dec()),
        ("line_v", galaxy.line_of_sight_velocity()),
        ("codist_tran", galaxy.transverse_distance()),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(CatalogError::NonFiniteField {
                id: galaxy.id(),
                field,
                value,
            });
        }
    }
    if galaxy.transverse_distance() < 0.0 {
        return Err(CatalogError::NegativeDistance {
            id: galaxy.id(),
            value: galaxy.transverse_distance(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn galaxy(id: u64, velocity: f64) -> Galaxy {
        Galaxy::new(GalaxyId::new(id), 0.1, 0.2, velocity, 100.0)
    }

    #[test]
    fn preserves_load_order_and_indexes_ids() {
        let catalog = Catalog::try_new(vec![galaxy(30, 1.0), galaxy(10, 2.0), galaxy(20, 3.0)])
            .expect("catalog must validate");
        let ids: Vec<u64> = catalog.galaxies().iter().map(|g| g.id().get()).collect();
        assert_eq!(ids, vec![30, 10, 20]);
        assert_eq!(catalog.position(GalaxyId::new(20)), Some(2));
        assert_eq!(catalog.position(GalaxyId::new(99)), None);
    }

    #[test]
    fn rejects_duplicate_identifiers() {
        let err = Catalog::try_new(vec![galaxy(1, 1.0), galaxy(2, 2.0), galaxy(1, 3.0)])
            .expect_err("duplicate id must be rejected");
        assert_eq!(
            err,
            CatalogError::DuplicateIdentifier {
                id: GalaxyId::new(1),
                first_row: 0,
                duplicate_row: 2,
            }
        );
    }

    #[rstest]
    #[case::nan_velocity(Galaxy::new(GalaxyId::new(5), 0.0, 0.0, f64::NAN, 1.0), "line_v")]
    #[case::infinite_ra(Galaxy::new(GalaxyId::new(5), f64::INFINITY, 0.0, 1.0, 1.0), "ra")]
    #[case::nan_dec(Galaxy::new(GalaxyId::new(5), 0.0, f64::NAN, 1.0, 1.0), "dec")]
    #[case::nan_distance(Galaxy::new(GalaxyId::new(5), 0.0, 0.0, 1.0, f64::NAN), "codist_tran")]
    fn rejects_non_finite_fields(#[case] bad: Galaxy, #[case] expected_field: &str) {
        let err = Catalog::try_new(vec![bad]).expect_err("non-finite field must be rejected");
        match err {
            CatalogError::NonFiniteField { field, .. } => assert_eq!(field, expected_field),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_transverse_distance() {
        let bad = Galaxy::new(GalaxyId::new(3), 0.0, 0.0, 1.0, -2.0);
        let err = Catalog::try_new(vec![bad]).expect_err("negative distance must be rejected");
        assert!(matches!(err, CatalogError::NegativeDistance { .. }));
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = Catalog::try_new(Vec::new()).expect("empty catalog is valid");
        assert!(catalog.is_empty());
    }
}
