//! Exhaustive neighbour scan.

use crate::{
    catalog::Catalog,
    error::Result,
    galaxy::Galaxy,
    linking::LinkingLengths,
    links::Link,
    metric::ClampMode,
};

use super::qualifies;

/// Tests `galaxy` (at `row`) against every other galaxy in the catalog.
pub(super) fn neighbours(
    catalog: &Catalog,
    row: usize,
    galaxy: &Galaxy,
    lengths: LinkingLengths,
    clamp: ClampMode,
) -> Result<Vec<Link>> {
    let mut links = Vec::new();
    for (other_row, other) in catalog.galaxies().iter().enumerate() {
        if other_row != row && qualifies(galaxy, other, lengths, clamp)? {
            links.push(Link::new(galaxy.id(), other.id()));
        }
    }
    Ok(links)
}
