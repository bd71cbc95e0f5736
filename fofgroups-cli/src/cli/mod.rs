//! Command-line interface for friends-of-friends group finding.
//!
//! `links` writes one link list per transverse linking length, `groups`
//! turns existing link lists into group and richness-frequency artifacts, and
//! `run` performs both steps for a whole sweep.

mod commands;

pub use commands::{
    Cli, CliError, ClampArg, Command, ExecutionSummary, GroupSummary, GroupsCommand,
    LinkingArgs, RunSummary, StrategyArg, SweepArgs, SweepFailure, render_summary, run_cli,
};
