//! Group assembly benchmarks.
//!
//! Measures the union-find grouping stage on link lists harvested once per
//! catalog, isolating it from pair finding.
#![allow(missing_docs, reason = "Criterion macros generate undocumented items")]
#![allow(
    clippy::expect_used,
    reason = "benchmark setup is infallible for valid constants"
)]
#![allow(
    clippy::excessive_nesting,
    reason = "Criterion bench_with_input + b.iter pattern requires deep nesting"
)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use fofgroups_benches::{
    params::AssemblyBenchParams,
    synthetic::{SyntheticConfig, generate_catalog},
};
use fofgroups_core::{
    ClampMode, LinkingLengths, PairStrategy, RichnessTable, assemble_groups, find_links,
};

const GALAXY_COUNTS: &[usize] = &[1_000, 4_000, 16_000];

fn group_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_assembly");
    group.sample_size(20);

    let lengths = LinkingLengths::new(500.0, 2.0).expect("linking lengths must be valid");

    for &galaxies in GALAXY_COUNTS {
        let catalog = generate_catalog(&SyntheticConfig::with_galaxies(galaxies))
            .expect("synthetic catalog generation must succeed");
        let links = find_links(
            &catalog,
            lengths,
            ClampMode::Symmetric,
            PairStrategy::VelocityWindow,
        )
        .expect("pair finding must succeed");

        let params = AssemblyBenchParams {
            galaxies,
            links: links.len(),
        };
        group.bench_with_input(BenchmarkId::from_parameter(&params), &links, |b, links| {
            b.iter(|| {
                let assignment = assemble_groups(black_box(links));
                RichnessTable::from_assignment(&assignment)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, group_assembly);
criterion_main!(benches);
