//! Velocity-sorted candidate index.
//!
//! The line-of-sight test only depends on velocity, so sorting the catalog by
//! velocity turns the set of galaxies within `los` of a query into one
//! contiguous slice. The slice bounds are located with the same separation
//! function the link predicate uses, so floating-point rounding cannot make
//! the window disagree with the exhaustive scan.

use crate::{
    catalog::Catalog,
    error::Result,
    galaxy::Galaxy,
    linking::LinkingLengths,
    links::Link,
    metric::{ClampMode, line_of_sight_separation},
};

use super::qualifies;

#[derive(Debug, Clone)]
pub(super) struct VelocityIndex {
    /// Catalog rows ordered by ascending velocity.
    order: Vec<usize>,
    /// Velocities in the same order as `order`.
    velocities: Vec<f64>,
}

impl VelocityIndex {
    pub(super) fn new(catalog: &Catalog) -> Self {
        let galaxies = catalog.galaxies();
        let mut keyed: Vec<(f64, usize)> = galaxies
            .iter()
            .enumerate()
            .map(|(row, galaxy)| (galaxy.line_of_sight_velocity(), row))
            .collect();
        keyed.sort_by(|left, right| left.0.total_cmp(&right.0).then(left.1.cmp(&right.1)));
        let (velocities, order) = keyed.into_iter().unzip();
        Self { order, velocities }
    }

    /// Returns the catalog rows whose velocity lies within `threshold` of
    /// `velocity`, in velocity order.
    pub(super) fn window(&self, velocity: f64, threshold: f64) -> &[usize] {
        let low = self.velocities.partition_point(|&other| {
            other < velocity && line_of_sight_separation(velocity, other) > threshold
        });
        let high = self.velocities.partition_point(|&other| {
            other <= velocity || line_of_sight_separation(velocity, other) <= threshold
        });
        self.order.get(low..high).unwrap_or(&[])
    }
}

/// Tests `galaxy` (at `row`) against the galaxies in its velocity window.
pub(super) fn neighbours(
    catalog: &Catalog,
    index: &VelocityIndex,
    row: usize,
    galaxy: &Galaxy,
    lengths: LinkingLengths,
    clamp: ClampMode,
) -> Result<Vec<Link>> {
    let mut candidates: Vec<usize> = index
        .window(galaxy.line_of_sight_velocity(), lengths.line_of_sight())
        .iter()
        .copied()
        .filter(|&candidate| candidate != row)
        .collect();
    candidates.sort_unstable();

    let mut links = Vec::new();
    for other in candidates.iter().filter_map(|&candidate| catalog.get(candidate)) {
        if qualifies(galaxy, other, lengths, clamp)? {
            links.push(Link::new(galaxy.id(), other.id()));
        }
    }
    Ok(links)
}
