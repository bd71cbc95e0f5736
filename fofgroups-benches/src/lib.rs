//! Benchmark support crate for fofgroups.
//!
//! Provides seeded synthetic catalogs and parameter labels used by the
//! Criterion benchmarks of pair finding and group assembly.

pub mod params;
pub mod synthetic;
