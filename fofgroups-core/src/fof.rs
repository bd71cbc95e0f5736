//! Friends-of-friends orchestration.
//!
//! Provides the [`FriendsOfFriends`] entry point that runs pair finding,
//! group assembly, and richness tabulation for one transverse linking length
//! and fans a [`TransverseSweep`] out across worker threads.

use std::time::Instant;

#[cfg(feature = "cpu")]
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::{
    Result,
    catalog::Catalog,
    groups::{GroupAssignment, assemble_groups},
    linking::{LinkingLengths, TransverseSweep},
    links::LinkList,
    metric::ClampMode,
    pairs::{PairStrategy, find_links},
    richness::RichnessTable,
};

/// Entry point for running the friends-of-friends pipeline.
///
/// # Examples
/// ```
/// use fofgroups_core::{Catalog, FofError, FriendsOfFriendsBuilder, Galaxy, GalaxyId};
///
/// let catalog = Catalog::try_new(vec![
///     Galaxy::new(GalaxyId::new(1), 0.5, 0.1, 1_000.0, 400.0),
///     Galaxy::new(GalaxyId::new(2), 0.5, 0.1, 1_300.0, 400.0),
///     Galaxy::new(GalaxyId::new(3), 0.5, 0.1, 1_700.0, 400.0),
///     Galaxy::new(GalaxyId::new(4), 0.5, 0.1, 9_000.0, 400.0),
/// ])?;
/// let fof = FriendsOfFriendsBuilder::new().build()?;
/// let run = fof.run(&catalog, 1.0)?;
/// assert_eq!(run.links().len(), 4);
/// assert_eq!(run.groups().group_count(), 1);
/// assert_eq!(run.richness().groups()[0].richness(), 3);
/// # Ok::<(), FofError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FriendsOfFriends {
    line_of_sight: f64,
    clamp_mode: ClampMode,
    pair_strategy: PairStrategy,
}

impl FriendsOfFriends {
    pub(crate) fn new(line_of_sight: f64, clamp_mode: ClampMode, pair_strategy: PairStrategy) -> Self {
        Self {
            line_of_sight,
            clamp_mode,
            pair_strategy,
        }
    }

    /// Returns the line-of-sight velocity linking length.
    #[must_use]
    pub fn line_of_sight(&self) -> f64 {
        self.line_of_sight
    }

    /// Returns the clamp mode applied to the angular separation.
    #[must_use]
    pub fn clamp_mode(&self) -> ClampMode {
        self.clamp_mode
    }

    /// Returns the neighbour enumeration strategy.
    #[must_use]
    pub fn pair_strategy(&self) -> PairStrategy {
        self.pair_strategy
    }

    /// Pairs the configured line-of-sight threshold with `transverse`.
    ///
    /// # Errors
    /// Returns [`crate::FofError::InvalidLinkingLength`] when `transverse` is
    /// negative, NaN, or infinite.
    pub fn lengths(&self, transverse: f64) -> Result<LinkingLengths> {
        LinkingLengths::new(self.line_of_sight, transverse)
    }

    /// Finds the directed links of `catalog` for one transverse threshold.
    ///
    /// # Errors
    /// Returns [`crate::FofError::InvalidLinkingLength`] for an invalid
    /// threshold and [`crate::FofError::NumericDomain`] when the metric
    /// rejects a pair under [`ClampMode::UpperOnly`].
    pub fn link(&self, catalog: &Catalog, transverse: f64) -> Result<LinkList> {
        let lengths = self.lengths(transverse)?;
        find_links(catalog, lengths, self.clamp_mode, self.pair_strategy)
    }

    /// Assembles groups from `links` and tabulates their richness.
    ///
    /// Group assembly depends only on the link list, so this also accepts
    /// lists read back from earlier runs.
    #[must_use]
    pub fn group(&self, links: &LinkList) -> (GroupAssignment, RichnessTable) {
        let groups = assemble_groups(links);
        let richness = RichnessTable::from_assignment(&groups);
        (groups, richness)
    }

    /// Runs pair finding, group assembly, and richness tabulation for one
    /// transverse threshold.
    ///
    /// # Errors
    /// Propagates the errors of [`FriendsOfFriends::link`].
    #[instrument(
        name = "core.run",
        err,
        skip(self, catalog),
        fields(
            galaxies = catalog.len(),
            line_of_sight = self.line_of_sight,
            transverse = transverse,
        ),
    )]
    pub fn run(&self, catalog: &Catalog, transverse: f64) -> Result<LinkingRun> {
        let started = Instant::now();
        let lengths = self.lengths(transverse)?;
        let links = find_links(catalog, lengths, self.clamp_mode, self.pair_strategy)?;
        let (groups, richness) = self.group(&links);
        info!(
            links = links.len(),
            groups = groups.group_count(),
            linked = groups.linked_count(),
            elapsed_ms = started.elapsed().as_millis(),
            "linking run completed"
        );
        Ok(LinkingRun {
            lengths,
            links,
            groups,
            richness,
        })
    }

    /// Runs [`FriendsOfFriends::run`] once per sweep value.
    ///
    /// Values are processed in parallel when the `cpu` feature is enabled.
    /// Outcomes are returned in sweep order; a failing value does not abort
    /// the others.
    ///
    /// # Examples
    /// ```
    /// use fofgroups_core::{
    ///     Catalog, FofError, FriendsOfFriendsBuilder, Galaxy, GalaxyId, TransverseSweep,
    /// };
    ///
    /// let catalog = Catalog::try_new(vec![
    ///     Galaxy::new(GalaxyId::new(1), 0.0, 0.0, 1_000.0, 500.0),
    ///     Galaxy::new(GalaxyId::new(2), 0.0016, 0.0, 1_000.0, 500.0),
    /// ])?;
    /// let fof = FriendsOfFriendsBuilder::new().build()?;
    /// let sweep = TransverseSweep::range(0.5, 1.5, 0.5)?;
    /// let linked: Vec<usize> = fof
    ///     .sweep(&catalog, &sweep)
    ///     .into_iter()
    ///     .map(|outcome| outcome.into_result().map(|run| run.groups().linked_count()))
    ///     .collect::<Result<_, _>>()?;
    /// assert_eq!(linked, vec![0, 2, 2]);
    /// # Ok::<(), FofError>(())
    /// ```
    pub fn sweep(&self, catalog: &Catalog, sweep: &TransverseSweep) -> Vec<SweepOutcome> {
        self.sweep_with(catalog, sweep, |outcome| outcome)
    }

    /// Runs [`FriendsOfFriends::run`] once per sweep value and hands each
    /// outcome to `visit` on the worker that produced it.
    ///
    /// `visit` runs as soon as its value completes, so callers can persist
    /// or reduce a run without holding every [`LinkingRun`] in memory.
    /// Visit results are returned in sweep order.
    ///
    /// # Examples
    /// ```
    /// use fofgroups_core::{
    ///     Catalog, FofError, FriendsOfFriendsBuilder, Galaxy, GalaxyId, TransverseSweep,
    /// };
    ///
    /// let catalog = Catalog::try_new(vec![
    ///     Galaxy::new(GalaxyId::new(1), 0.0, 0.0, 1_000.0, 500.0),
    ///     Galaxy::new(GalaxyId::new(2), 0.0016, 0.0, 1_000.0, 500.0),
    /// ])?;
    /// let fof = FriendsOfFriendsBuilder::new().build()?;
    /// let sweep = TransverseSweep::from_values(vec![0.5, 1.0])?;
    /// let links = fof.sweep_with(&catalog, &sweep, |outcome| {
    ///     outcome.result().map(|run| run.links().len()).ok()
    /// });
    /// assert_eq!(links, vec![Some(0), Some(2)]);
    /// # Ok::<(), FofError>(())
    /// ```
    #[instrument(
        name = "core.sweep",
        skip(self, catalog, sweep, visit),
        fields(galaxies = catalog.len(), values = sweep.len()),
    )]
    pub fn sweep_with<T, F>(&self, catalog: &Catalog, sweep: &TransverseSweep, visit: F) -> Vec<T>
    where
        T: Send,
        F: Fn(SweepOutcome) -> T + Sync,
    {
        let started = Instant::now();
        let visited = fan_out(sweep, |transverse| {
            let result = self.run(catalog, transverse);
            let failed = result.is_err();
            (failed, visit(SweepOutcome { transverse, result }))
        });
        finish_sweep(visited, started, "sweep completed")
    }

    /// Finds links once per sweep value and hands each link list to `visit`
    /// on the worker that produced it.
    ///
    /// Visit results are returned in sweep order; a failing value does not
    /// abort the others.
    #[instrument(
        name = "core.sweep_links",
        skip(self, catalog, sweep, visit),
        fields(galaxies = catalog.len(), values = sweep.len()),
    )]
    pub fn sweep_links_with<T, F>(
        &self,
        catalog: &Catalog,
        sweep: &TransverseSweep,
        visit: F,
    ) -> Vec<T>
    where
        T: Send,
        F: Fn(f64, Result<LinkList>) -> T + Sync,
    {
        let started = Instant::now();
        let visited = fan_out(sweep, |transverse| {
            let result = self.link(catalog, transverse);
            (result.is_err(), visit(transverse, result))
        });
        finish_sweep(visited, started, "link sweep completed")
    }
}

fn fan_out<T, F>(sweep: &TransverseSweep, work: F) -> Vec<(bool, T)>
where
    T: Send,
    F: Fn(f64) -> (bool, T) + Sync,
{
    #[cfg(feature = "cpu")]
    let visited = sweep
        .values()
        .par_iter()
        .map(|&transverse| work(transverse))
        .collect();
    #[cfg(not(feature = "cpu"))]
    let visited = sweep
        .values()
        .iter()
        .map(|&transverse| work(transverse))
        .collect();
    visited
}

fn finish_sweep<T>(visited: Vec<(bool, T)>, started: Instant, message: &'static str) -> Vec<T> {
    let failed = visited.iter().filter(|(failed, _)| *failed).count();
    if failed > 0 {
        warn!(failed, "some sweep values failed");
    }
    info!(
        values = visited.len(),
        failed,
        elapsed_ms = started.elapsed().as_millis(),
        "{message}"
    );
    visited.into_iter().map(|(_, value)| value).collect()
}

/// Links, groups, and richness produced for one linking-length pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkingRun {
    lengths: LinkingLengths,
    links: LinkList,
    groups: GroupAssignment,
    richness: RichnessTable,
}

impl LinkingRun {
    /// Returns the linking lengths used for the run.
    #[must_use]
    pub fn lengths(&self) -> LinkingLengths {
        self.lengths
    }

    /// Returns the directed links.
    #[must_use]
    pub fn links(&self) -> &LinkList {
        &self.links
    }

    /// Returns the group assignment.
    #[must_use]
    pub fn groups(&self) -> &GroupAssignment {
        &self.groups
    }

    /// Returns the richness table.
    #[must_use]
    pub fn richness(&self) -> &RichnessTable {
        &self.richness
    }
}

/// Result of one sweep value.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome {
    transverse: f64,
    result: Result<LinkingRun>,
}

impl SweepOutcome {
    /// Returns the transverse linking length of this value.
    #[must_use]
    pub fn transverse(&self) -> f64 {
        self.transverse
    }

    /// Returns the run, or the error that aborted it.
    ///
    /// # Errors
    /// Returns the error raised while processing this sweep value.
    pub fn result(&self) -> core::result::Result<&LinkingRun, &crate::FofError> {
        self.result.as_ref()
    }

    /// Consumes the outcome, returning the owned run result.
    ///
    /// # Errors
    /// Returns the error raised while processing this sweep value.
    pub fn into_result(self) -> Result<LinkingRun> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::{
        FofError, FofErrorCode, FriendsOfFriendsBuilder, Galaxy, GalaxyId, RichnessFrequency,
        test_utils::{antipodal_catalog, colocated_catalog},
    };

    fn fof(line_of_sight: f64) -> FriendsOfFriends {
        FriendsOfFriendsBuilder::new()
            .with_line_of_sight(line_of_sight)
            .build()
            .expect("configuration is valid")
    }

    #[test]
    fn boundary_velocity_separation_joins_one_group() {
        let catalog = colocated_catalog(&[0.0, 100.0, 600.0, 610.0, 5_000.0]);
        let run = fof(500.0).run(&catalog, 1.0).expect("run must succeed");
        assert_eq!(run.groups().group_count(), 1);
        assert_eq!(
            run.richness().frequencies(),
            vec![RichnessFrequency::new(4, 1)]
        );
        assert_eq!(run.groups().group_of(GalaxyId::new(4)), None);
    }

    #[test]
    fn tightened_velocity_threshold_splits_the_group() {
        let catalog = colocated_catalog(&[0.0, 100.0, 600.0, 610.0, 5_000.0]);
        let run = fof(499.0).run(&catalog, 1.0).expect("run must succeed");
        assert_eq!(
            run.richness().frequencies(),
            vec![RichnessFrequency::new(2, 2)]
        );
    }

    #[test]
    fn run_rejects_invalid_transverse_length() {
        let catalog = colocated_catalog(&[0.0, 10.0]);
        let err = fof(500.0)
            .run(&catalog, f64::NAN)
            .expect_err("NaN threshold must fail");
        assert_eq!(err.code(), FofErrorCode::InvalidLinkingLength);
    }

    #[test]
    fn run_on_empty_catalog_is_empty() {
        let run = fof(500.0)
            .run(&colocated_catalog(&[]), 1.0)
            .expect("empty catalog is valid");
        assert!(run.links().is_empty());
        assert!(run.groups().is_empty());
        assert!(run.richness().frequencies().is_empty());
    }

    #[test]
    fn sweep_preserves_value_order() {
        // 0.5 rad at 10 Mpc is 5 Mpc.
        let catalog = Catalog::try_new(vec![
            Galaxy::new(GalaxyId::new(1), 0.0, 0.0, 100.0, 10.0),
            Galaxy::new(GalaxyId::new(2), 0.5, 0.0, 100.0, 10.0),
        ])
        .expect("catalog must validate");
        let sweep = TransverseSweep::from_values(vec![0.1, 20.0, 2.0]).expect("sweep is valid");
        let outcomes = fof(500.0).sweep(&catalog, &sweep);

        let transverse: Vec<f64> = outcomes.iter().map(SweepOutcome::transverse).collect();
        assert_eq!(transverse, vec![0.1, 20.0, 2.0]);
        let linked: Vec<usize> = outcomes
            .iter()
            .map(|outcome| {
                outcome
                    .result()
                    .expect("symmetric clamp never fails")
                    .groups()
                    .linked_count()
            })
            .collect();
        assert_eq!(linked, vec![0, 2, 0]);
    }

    #[test]
    fn sweep_matches_individual_runs() {
        let catalog = colocated_catalog(&[0.0, 300.0, 700.0, 1_500.0]);
        let engine = fof(400.0);
        let sweep = TransverseSweep::range(0.5, 1.5, 0.5).expect("sweep is valid");
        for outcome in engine.sweep(&catalog, &sweep) {
            let expected = engine
                .run(&catalog, outcome.transverse())
                .expect("run must succeed");
            assert_eq!(outcome.into_result(), Ok::<_, FofError>(expected));
        }
    }

    #[test]
    fn sweep_with_visits_every_value_once() {
        let catalog = colocated_catalog(&[0.0, 300.0, 700.0, 1_500.0]);
        let sweep = TransverseSweep::from_values(vec![1.5, 0.5, 1.0]).expect("sweep is valid");
        let seen = Mutex::new(Vec::new());

        let links = fof(400.0).sweep_with(&catalog, &sweep, |outcome| {
            seen.lock().expect("lock poisoned").push(outcome.transverse());
            outcome.into_result().map(|run| run.links().len())
        });

        assert_eq!(links, vec![Ok(4), Ok(4), Ok(4)]);
        let mut seen = seen.into_inner().expect("lock poisoned");
        seen.sort_by(f64::total_cmp);
        assert_eq!(seen, vec![0.5, 1.0, 1.5]);
    }

    #[test]
    fn sweep_links_with_isolates_failing_values() {
        let catalog = antipodal_catalog();
        let sweep = TransverseSweep::from_values(vec![0.1, 5_000.0]).expect("sweep is valid");
        let upper_only = FriendsOfFriendsBuilder::new()
            .with_clamp_mode(ClampMode::UpperOnly)
            .build()
            .expect("configuration is valid");

        let codes = upper_only.sweep_links_with(&catalog, &sweep, |transverse, result| {
            (transverse, result.map(|links| links.len()).map_err(|err| err.code()))
        });
        assert_eq!(
            codes,
            vec![
                (0.1, Err(FofErrorCode::NumericDomain)),
                (5_000.0, Err(FofErrorCode::NumericDomain)),
            ]
        );

        let counts = fof(500.0).sweep_links_with(&catalog, &sweep, |_, result| {
            result.map(|links| links.len())
        });
        assert_eq!(counts, vec![Ok(0), Ok(2)]);
    }
}
