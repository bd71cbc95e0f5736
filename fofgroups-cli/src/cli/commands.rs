//! Command implementations and argument parsing for the fofgroups CLI.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use fofgroups_core::{
    Catalog, ClampMode, FofError, FriendsOfFriends, FriendsOfFriendsBuilder, GroupAssignment,
    PairStrategy, RichnessFrequency, RichnessTable, TransverseSweep, assemble_groups,
};
use fofgroups_providers_csv::{
    ArtifactKind, CsvProviderError, artifact_file_name, read_catalog_path, read_links_path,
    write_frequencies, write_groups, write_links, write_run,
};
use thiserror::Error;
use tracing::{Span, error, field, info, instrument};

const DEFAULT_LINE_OF_SIGHT: f64 = 500.0;
const DEFAULT_TRANS_START: f64 = 0.1;
const DEFAULT_TRANS_STOP: f64 = 2.0;
const DEFAULT_TRANS_STEP: f64 = 0.1;
const LINKS_PREFIX: &str = "links_";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "fofgroups", about = "Find friends-of-friends galaxy groups.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Write one link list per transverse linking length.
    Links(LinkingArgs),
    /// Assemble groups and richness tables from existing link lists.
    Groups(GroupsCommand),
    /// Find links, assemble groups, and tabulate richness for every sweep value.
    Run(LinkingArgs),
}

/// Options shared by the `links` and `run` commands.
#[derive(Debug, Args, Clone)]
pub struct LinkingArgs {
    /// Catalog CSV providing `CATAID`, `RA_rad`, `DEC_rad`, `line_v`, and
    /// `CoDistTran` columns.
    pub catalog: PathBuf,

    /// Line-of-sight velocity linking length in km/s.
    #[arg(long, default_value_t = DEFAULT_LINE_OF_SIGHT)]
    pub los: f64,

    /// Transverse linking lengths to sweep.
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Inverse cosine clamping policy for the angular separation.
    #[arg(long, value_enum, default_value_t = ClampArg::Symmetric)]
    pub clamp: ClampArg,

    /// Neighbour enumeration strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::VelocityWindow)]
    pub strategy: StrategyArg,

    /// Directory receiving the artifacts; created when missing.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

/// Transverse linking lengths, either as an inclusive range or an explicit
/// list.
#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    /// Explicit transverse linking length in Mpc; repeat for several values.
    #[arg(long = "trans", conflicts_with_all = ["trans_start", "trans_stop", "trans_step"])]
    pub values: Vec<f64>,

    /// First transverse linking length of the range in Mpc.
    #[arg(long, default_value_t = DEFAULT_TRANS_START)]
    pub trans_start: f64,

    /// Last transverse linking length of the range in Mpc (inclusive).
    #[arg(long, default_value_t = DEFAULT_TRANS_STOP)]
    pub trans_stop: f64,

    /// Increment between consecutive range values in Mpc.
    #[arg(long, default_value_t = DEFAULT_TRANS_STEP)]
    pub trans_step: f64,
}

impl SweepArgs {
    /// Builds the sweep described by the arguments.
    ///
    /// # Errors
    /// Returns the sweep validation errors of [`TransverseSweep`].
    pub fn to_sweep(&self) -> Result<TransverseSweep, FofError> {
        if self.values.is_empty() {
            TransverseSweep::range(self.trans_start, self.trans_stop, self.trans_step)
        } else {
            TransverseSweep::from_values(self.values.clone())
        }
    }
}

/// Options accepted by the `groups` command.
#[derive(Debug, Args, Clone)]
pub struct GroupsCommand {
    /// Link list CSV files with `CATAID1` and `CATAID2` columns.
    #[arg(required = true)]
    pub links: Vec<PathBuf>,

    /// Directory receiving the artifacts; created when missing.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

/// Inverse cosine clamping policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClampArg {
    /// Clamp into `[-1, 1]`.
    Symmetric,
    /// Clamp the upper bound only and fail on arguments below `-1`.
    UpperOnly,
}

impl From<ClampArg> for ClampMode {
    fn from(value: ClampArg) -> Self {
        match value {
            ClampArg::Symmetric => Self::Symmetric,
            ClampArg::UpperOnly => Self::UpperOnly,
        }
    }
}

/// Neighbour enumeration strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Compare every ordered pair.
    BruteForce,
    /// Compare only galaxies inside the line-of-sight velocity window.
    VelocityWindow,
}

impl From<StrategyArg> for PairStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::BruteForce => Self::BruteForce,
            StrategyArg::VelocityWindow => Self::VelocityWindow,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The output directory could not be created.
    #[error("failed to create `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Reading or writing a CSV file failed.
    #[error(transparent)]
    Csv(#[from] CsvProviderError),
    /// Configuration or catalog-wide processing failed.
    #[error(transparent)]
    Core(#[from] FofError),
    /// At least one sweep value failed; the others completed.
    #[error("{failed} of {total} sweep values failed; first failure: {first}")]
    SweepFailed {
        /// Number of failed values.
        failed: usize,
        /// Number of values in the sweep.
        total: usize,
        /// Error of the first failed value in sweep order.
        #[source]
        first: FofError,
    },
}

impl CliError {
    /// Returns the stable code of the underlying library error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } => None,
            Self::Csv(error) => Some(error.code().as_str()),
            Self::Core(error) | Self::SweepFailed { first: error, .. } => {
                Some(error.code().as_str())
            }
        }
    }

    /// Returns the catalog validation code when catalog loading failed.
    #[must_use]
    pub fn catalog_code(&self) -> Option<&'static str> {
        match self {
            Self::Csv(error) => error.catalog_code().map(|code| code.as_str()),
            Self::Core(error) => error.catalog_code().map(|code| code.as_str()),
            _ => None,
        }
    }
}

/// Group statistics for one linking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    /// Number of groups.
    pub groups: usize,
    /// Number of grouped galaxies.
    pub linked: usize,
    /// Richness-frequency table, ascending by richness.
    pub frequencies: Vec<RichnessFrequency>,
}

impl GroupSummary {
    fn new(groups: &GroupAssignment, richness: &RichnessTable) -> Self {
        Self {
            groups: groups.group_count(),
            linked: groups.linked_count(),
            frequencies: richness.frequencies(),
        }
    }
}

/// Outcome of one linking-length pair or link list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// `<los>_<trans>` label of the run.
    pub label: String,
    /// Number of directed links.
    pub links: usize,
    /// Group statistics, when groups were assembled.
    pub groups: Option<GroupSummary>,
    /// Artifacts written for the run.
    pub artifacts: Vec<PathBuf>,
}

/// A sweep value whose run failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepFailure {
    /// Transverse linking length of the failed value.
    pub transverse: f64,
    /// Error raised for the value.
    pub error: FofError,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Name of the executed command.
    pub command: &'static str,
    /// Input files read by the command.
    pub inputs: Vec<PathBuf>,
    /// Completed runs in sweep or input order.
    pub runs: Vec<RunSummary>,
    /// Sweep values that failed.
    pub failures: Vec<SweepFailure>,
}

impl ExecutionSummary {
    fn new(command: &'static str, inputs: Vec<PathBuf>) -> Self {
        Self {
            command,
            inputs,
            runs: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn record_failure(&mut self, failure: SweepFailure) {
        error!(
            transverse = failure.transverse,
            error = %failure.error,
            code = failure.error.code().as_str(),
            "sweep value failed"
        );
        self.failures.push(failure);
    }

    /// Folds per-value outcomes into the summary in sweep order.
    ///
    /// Every outcome is recorded before the first artifact error, if any, is
    /// returned.
    fn absorb(&mut self, outcomes: Vec<Result<ValueOutcome, CliError>>) -> Result<(), CliError> {
        let mut first_error = None;
        for outcome in outcomes {
            match outcome {
                Ok(ValueOutcome::Written(run)) => self.runs.push(run),
                Ok(ValueOutcome::Failed(failure)) => self.record_failure(failure),
                Err(err) => {
                    error!(error = %err, code = err.code(), "artifact write failed");
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Converts recorded sweep failures into an error.
    ///
    /// # Errors
    /// Returns [`CliError::SweepFailed`] when any sweep value failed.
    pub fn ensure_complete(&self) -> Result<(), CliError> {
        match self.failures.first() {
            None => Ok(()),
            Some(first) => Err(CliError::SweepFailed {
                failed: self.failures.len(),
                total: self.failures.len() + self.runs.len(),
                first: first.error.clone(),
            }),
        }
    }
}

/// What happened to one sweep value inside the parallel fan-out.
enum ValueOutcome {
    Written(RunSummary),
    Failed(SweepFailure),
}

/// Executes the CLI command represented by `cli`.
///
/// Sweep values that fail are recorded in
/// [`ExecutionSummary::failures`]; the remaining values still run and write
/// their artifacts.
///
/// # Errors
/// Returns [`CliError`] when configuration is invalid, an input cannot be
/// read, or an artifact cannot be written.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use fofgroups_cli::cli::{Cli, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let catalog = dir.path().join("catalog.csv");
/// std::fs::write(
///     &catalog,
///     "CATAID,RA_rad,DEC_rad,line_v,CoDistTran\n1,0.2,0.1,1000,300\n2,0.2,0.1,1100,300\n",
/// )?;
/// let cli = Cli::try_parse_from([
///     "fofgroups".to_owned(),
///     "run".to_owned(),
///     catalog.display().to_string(),
///     "--trans".to_owned(),
///     "0.5".to_owned(),
///     "--output-dir".to_owned(),
///     dir.path().display().to_string(),
/// ])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.runs.len(), 1);
/// assert_eq!(summary.runs[0].label, "500_0.5");
/// assert!(dir.path().join("freq_500_0.5.csv").exists());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Links(args) => {
            span.record("command", "links");
            run_links(args)
        }
        Command::Groups(args) => {
            span.record("command", "groups");
            run_groups(args)
        }
        Command::Run(args) => {
            span.record("command", "run");
            run_pipeline(args)
        }
    }
}

struct Prepared {
    fof: FriendsOfFriends,
    sweep: TransverseSweep,
    catalog: Catalog,
}

/// Validates configuration before touching the file system, then loads the
/// catalog.
fn prepare(args: &LinkingArgs) -> Result<Prepared, CliError> {
    let fof = FriendsOfFriendsBuilder::new()
        .with_line_of_sight(args.los)
        .with_clamp_mode(args.clamp.into())
        .with_pair_strategy(args.strategy.into())
        .build()?;
    let sweep = args.sweep.to_sweep()?;
    ensure_directory(&args.output_dir)?;
    let catalog = read_catalog_path(&args.catalog)?;
    Ok(Prepared {
        fof,
        sweep,
        catalog,
    })
}

#[instrument(
    name = "cli.links",
    err,
    skip(args),
    fields(catalog = %args.catalog.display(), los = args.los, values = field::Empty),
)]
pub(super) fn run_links(args: LinkingArgs) -> Result<ExecutionSummary, CliError> {
    let Prepared {
        fof,
        sweep,
        catalog,
    } = prepare(&args)?;
    Span::current().record("values", sweep.len());

    let outcomes = fof.sweep_links_with(
        &catalog,
        &sweep,
        |transverse, result| -> Result<ValueOutcome, CliError> {
            let links = match result {
                Ok(links) => links,
                Err(error) => return Ok(ValueOutcome::Failed(SweepFailure { transverse, error })),
            };
            let lengths = fof.lengths(transverse)?;
            let path = args
                .output_dir
                .join(artifact_file_name(ArtifactKind::Links, lengths));
            write_links(&path, &links)?;
            Ok(ValueOutcome::Written(RunSummary {
                label: lengths.to_string(),
                links: links.len(),
                groups: None,
                artifacts: vec![path],
            }))
        },
    );

    let mut summary = ExecutionSummary::new("links", vec![args.catalog.clone()]);
    summary.absorb(outcomes)?;

    info!(
        written = summary.runs.len(),
        failed = summary.failures.len(),
        "links command completed"
    );
    Ok(summary)
}

#[instrument(
    name = "cli.pipeline",
    err,
    skip(args),
    fields(catalog = %args.catalog.display(), los = args.los, values = field::Empty),
)]
pub(super) fn run_pipeline(args: LinkingArgs) -> Result<ExecutionSummary, CliError> {
    let Prepared {
        fof,
        sweep,
        catalog,
    } = prepare(&args)?;
    Span::current().record("values", sweep.len());

    let outcomes = fof.sweep_with(&catalog, &sweep, |outcome| -> Result<ValueOutcome, CliError> {
        let transverse = outcome.transverse();
        let run = match outcome.into_result() {
            Ok(run) => run,
            Err(error) => return Ok(ValueOutcome::Failed(SweepFailure { transverse, error })),
        };
        let paths = write_run(&args.output_dir, &run)?;
        Ok(ValueOutcome::Written(RunSummary {
            label: run.lengths().to_string(),
            links: run.links().len(),
            groups: Some(GroupSummary::new(run.groups(), run.richness())),
            artifacts: vec![paths.links, paths.groups, paths.frequencies],
        }))
    });

    let mut summary = ExecutionSummary::new("run", vec![args.catalog.clone()]);
    summary.absorb(outcomes)?;

    info!(
        written = summary.runs.len(),
        failed = summary.failures.len(),
        "run command completed"
    );
    Ok(summary)
}

#[instrument(
    name = "cli.groups",
    err,
    skip(command),
    fields(files = command.links.len()),
)]
pub(super) fn run_groups(command: GroupsCommand) -> Result<ExecutionSummary, CliError> {
    ensure_directory(&command.output_dir)?;

    let mut summary = ExecutionSummary::new("groups", command.links.clone());
    for path in &command.links {
        let links = read_links_path(path)?;
        let groups = assemble_groups(&links);
        let richness = RichnessTable::from_assignment(&groups);

        let label = derive_run_label(path);
        let groups_path = command.output_dir.join(format!(
            "{}_{label}.csv",
            ArtifactKind::Groups.prefix()
        ));
        let freq_path = command.output_dir.join(format!(
            "{}_{label}.csv",
            ArtifactKind::Frequencies.prefix()
        ));
        write_groups(&groups_path, &groups)?;
        write_frequencies(&freq_path, &richness.frequencies())?;

        summary.runs.push(RunSummary {
            label,
            links: links.len(),
            groups: Some(GroupSummary::new(&groups, &richness)),
            artifacts: vec![groups_path, freq_path],
        });
    }

    info!(written = summary.runs.len(), "groups command completed");
    Ok(summary)
}

/// Recovers the `<los>_<trans>` label from a `links_<los>_<trans>.csv` name,
/// falling back to the whole file stem for other names.
pub(super) fn derive_run_label(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("links");
    stem.strip_prefix(LINKS_PREFIX)
        .filter(|label| !label.is_empty())
        .unwrap_or(stem)
        .to_owned()
}

fn ensure_directory(path: &Path) -> Result<(), CliError> {
    fs::create_dir_all(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::io::Cursor;
/// # use fofgroups_cli::cli::{ExecutionSummary, GroupSummary, RunSummary, render_summary};
/// # use fofgroups_core::RichnessFrequency;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     command: "run",
///     inputs: vec!["catalog.csv".into()],
///     runs: vec![RunSummary {
///         label: "500_1".into(),
///         links: 6,
///         groups: Some(GroupSummary {
///             groups: 1,
///             linked: 4,
///             frequencies: vec![RichnessFrequency::new(4, 1)],
///         }),
///         artifacts: Vec::new(),
///     }],
///     failures: Vec::new(),
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer.into_inner())?;
/// assert!(text.contains("500_1\tlinks 6\tgroups 1\tlinked 4"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "command: {}", summary.command)?;
    for input in &summary.inputs {
        writeln!(writer, "input: {}", input.display())?;
    }
    for run in &summary.runs {
        write!(writer, "{}\tlinks {}", run.label, run.links)?;
        match &run.groups {
            Some(groups) => {
                writeln!(writer, "\tgroups {}\tlinked {}", groups.groups, groups.linked)?;
                for row in &groups.frequencies {
                    writeln!(writer, "\trichness {}\tcount {}", row.richness(), row.count())?;
                }
            }
            None => writeln!(writer)?,
        }
    }
    for failure in &summary.failures {
        writeln!(writer, "failed {}: {}", failure.transverse, failure.error)?;
    }
    Ok(())
}
