//! Benchmark parameter labels.

use std::fmt;

use fofgroups_core::PairStrategy;

/// Parameters for a pair-finding benchmark run.
#[derive(Clone, Debug)]
pub struct PairBenchParams {
    /// Number of galaxies in the catalog.
    pub galaxies: usize,
    /// Neighbour enumeration strategy under test.
    pub strategy: PairStrategy,
}

impl fmt::Display for PairBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match self.strategy {
            PairStrategy::BruteForce => "brute",
            PairStrategy::VelocityWindow => "window",
        };
        write!(f, "n={},{strategy}", self.galaxies)
    }
}

/// Parameters for a group assembly benchmark run.
#[derive(Clone, Debug)]
pub struct AssemblyBenchParams {
    /// Number of galaxies in the catalog.
    pub galaxies: usize,
    /// Number of directed links fed to the assembler.
    pub links: usize,
}

impl fmt::Display for AssemblyBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},links={}", self.galaxies, self.links)
    }
}
