//! Pair finding: directed link detection for one linking-length pair.
//!
//! Every galaxy is compared against the rest of the catalog and one
//! [`Link`] is emitted per neighbour satisfying both thresholds, with the
//! scanning galaxy as the source. Qualifying pairs are therefore reported in
//! both directions; [`crate::deduplicate_links`] collapses them later.
//!
//! Two strategies produce identical link lists:
//!
//! - [`PairStrategy::BruteForce`] tests every ordered pair.
//! - [`PairStrategy::VelocityWindow`] sorts the catalog by line-of-sight
//!   velocity once and only tests candidates inside the
//!   `[v - los, v + los]` window.
//!
//! Output is ordered by the catalog row of the source, then of the target,
//! regardless of strategy or thread scheduling.

mod brute;
mod velocity;

#[cfg(test)]
mod tests;

use std::time::Instant;

#[cfg(feature = "cpu")]
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    catalog::Catalog,
    error::{FofError, Result},
    galaxy::Galaxy,
    linking::LinkingLengths,
    links::{Link, LinkList},
    metric::{ClampMode, line_of_sight_separation, transverse_separation},
};

use self::velocity::VelocityIndex;

/// Selects how candidate neighbours are enumerated.
///
/// # Examples
/// ```
/// use fofgroups_core::PairStrategy;
///
/// assert_eq!(PairStrategy::default(), PairStrategy::VelocityWindow);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PairStrategy {
    /// Test every ordered pair of galaxies.
    BruteForce,
    /// Restrict candidates to the line-of-sight velocity window.
    #[default]
    VelocityWindow,
}

/// Finds every directed link in `catalog` admitted by `lengths`.
///
/// A link `(a, b)` is emitted for each ordered pair of distinct galaxies
/// whose line-of-sight separation and transverse separation are both within
/// the thresholds (inclusive).
///
/// # Errors
/// Returns [`FofError::NumericDomain`] when `clamp` is
/// [`ClampMode::UpperOnly`] and the angular separation of a candidate pair
/// leaves the inverse cosine domain.
///
/// # Examples
/// ```
/// use fofgroups_core::{
///     Catalog, ClampMode, FofError, Galaxy, GalaxyId, LinkingLengths, PairStrategy, find_links,
/// };
///
/// let catalog = Catalog::try_new(vec![
///     Galaxy::new(GalaxyId::new(1), 0.0, 0.0, 1_000.0, 300.0),
///     Galaxy::new(GalaxyId::new(2), 0.0, 0.0, 1_200.0, 300.0),
///     Galaxy::new(GalaxyId::new(3), 0.0, 0.0, 9_000.0, 300.0),
/// ])?;
/// let lengths = LinkingLengths::new(500.0, 1.0)?;
/// let links = find_links(&catalog, lengths, ClampMode::Symmetric, PairStrategy::BruteForce)?;
/// assert_eq!(links.len(), 2);
/// # Ok::<(), FofError>(())
/// ```
#[instrument(
    name = "core.find_links",
    err,
    skip(catalog),
    fields(
        galaxies = catalog.len(),
        line_of_sight = lengths.line_of_sight(),
        transverse = lengths.transverse(),
    ),
)]
pub fn find_links(
    catalog: &Catalog,
    lengths: LinkingLengths,
    clamp: ClampMode,
    strategy: PairStrategy,
) -> Result<LinkList> {
    let started = Instant::now();
    let links = match strategy {
        PairStrategy::BruteForce => scan_rows(catalog, |row, galaxy| {
            brute::neighbours(catalog, row, galaxy, lengths, clamp)
        })?,
        PairStrategy::VelocityWindow => {
            let index = VelocityIndex::new(catalog);
            scan_rows(catalog, |row, galaxy| {
                velocity::neighbours(catalog, &index, row, galaxy, lengths, clamp)
            })?
        }
    };
    info!(
        links = links.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "pair finding completed"
    );
    Ok(links)
}

/// Runs `scan` for every catalog row and concatenates the per-row links in
/// row order. The first failing row, in row order, determines the error.
fn scan_rows<F>(catalog: &Catalog, scan: F) -> Result<LinkList>
where
    F: Fn(usize, &Galaxy) -> Result<Vec<Link>> + Sync,
{
    #[cfg(feature = "cpu")]
    let per_row: Vec<Result<Vec<Link>>> = catalog
        .galaxies()
        .par_iter()
        .enumerate()
        .map(|(row, galaxy)| scan(row, galaxy))
        .collect();
    #[cfg(not(feature = "cpu"))]
    let per_row: Vec<Result<Vec<Link>>> = catalog
        .galaxies()
        .iter()
        .enumerate()
        .map(|(row, galaxy)| scan(row, galaxy))
        .collect();

    let mut links = Vec::new();
    for row_links in per_row {
        links.extend(row_links?);
    }
    Ok(LinkList::new(links))
}

/// Applies the dual-threshold link predicate to one ordered pair.
///
/// The transverse separation is only evaluated for pairs already within the
/// line-of-sight threshold.
fn qualifies(
    source: &Galaxy,
    target: &Galaxy,
    lengths: LinkingLengths,
    clamp: ClampMode,
) -> Result<bool> {
    let line_of_sight = line_of_sight_separation(
        source.line_of_sight_velocity(),
        target.line_of_sight_velocity(),
    );
    if line_of_sight > lengths.line_of_sight() {
        return Ok(false);
    }
    let transverse =
        transverse_separation(source, target, clamp).map_err(|error| FofError::NumericDomain {
            left: source.id(),
            right: target.id(),
            error,
        })?;
    Ok(lengths.admits(line_of_sight, transverse))
}
