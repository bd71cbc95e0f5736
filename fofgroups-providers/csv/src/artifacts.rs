//! Link, group membership, and richness-frequency artifacts.
//!
//! Each artifact is one CSV file per linking-length pair, named
//! `<kind>_<los>_<trans>.csv`. Headers are always written, so an empty result
//! still yields a well-formed file.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use fofgroups_core::{
    GalaxyId, GroupAssignment, Link, LinkList, LinkingLengths, LinkingRun, RichnessFrequency,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{atomic::write_atomically, errors::CsvProviderError};

const LINK_HEADER: [&str; 2] = ["CATAID1", "CATAID2"];
const GROUP_HEADER: [&str; 2] = ["group", "CATAID"];
const FREQUENCY_HEADER: [&str; 2] = ["richness", "count"];

/// The three per-run artifact families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Directed link list.
    Links,
    /// Group membership records.
    Groups,
    /// Richness-frequency table.
    Frequencies,
}

impl ArtifactKind {
    /// Returns the file-name prefix of this artifact family.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Links => "links",
            Self::Groups => "groups",
            Self::Frequencies => "freq",
        }
    }
}

/// Returns the file name of `kind` for `lengths`.
///
/// # Examples
/// ```
/// use fofgroups_core::LinkingLengths;
/// use fofgroups_providers_csv::{ArtifactKind, artifact_file_name};
///
/// let lengths = LinkingLengths::new(500.0, 0.1).expect("lengths are valid");
/// assert_eq!(artifact_file_name(ArtifactKind::Links, lengths), "links_500_0.1.csv");
/// assert_eq!(artifact_file_name(ArtifactKind::Frequencies, lengths), "freq_500_0.1.csv");
/// ```
#[must_use]
pub fn artifact_file_name(kind: ArtifactKind, lengths: LinkingLengths) -> String {
    format!("{}_{lengths}.csv", kind.prefix())
}

/// Paths of the artifacts written for one linking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Link list file.
    pub links: PathBuf,
    /// Group membership file.
    pub groups: PathBuf,
    /// Richness-frequency file.
    pub frequencies: PathBuf,
}

impl ArtifactPaths {
    /// Resolves the artifact paths for `lengths` inside `directory`.
    #[must_use]
    pub fn new(directory: &Path, lengths: LinkingLengths) -> Self {
        Self {
            links: directory.join(artifact_file_name(ArtifactKind::Links, lengths)),
            groups: directory.join(artifact_file_name(ArtifactKind::Groups, lengths)),
            frequencies: directory.join(artifact_file_name(ArtifactKind::Frequencies, lengths)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LinkRow {
    #[serde(rename = "CATAID1")]
    source: u64,
    #[serde(rename = "CATAID2")]
    target: u64,
}

#[derive(Debug, Serialize)]
struct GroupRow {
    group: u64,
    #[serde(rename = "CATAID")]
    galaxy: u64,
}

#[derive(Debug, Serialize)]
struct FrequencyRow {
    richness: usize,
    count: usize,
}

/// Writes `links` to `path`, one directed link per row.
///
/// # Errors
/// Returns [`CsvProviderError::Io`] or [`CsvProviderError::Csv`] when the
/// file cannot be written.
#[instrument(name = "csv.write_links", err, skip_all, fields(path = %path.display(), rows = links.len()))]
pub fn write_links(path: &Path, links: &LinkList) -> Result<(), CsvProviderError> {
    write_atomically(path, |writer| {
        writer.write_record(LINK_HEADER)?;
        for link in links.links() {
            writer.serialize(LinkRow {
                source: link.source().get(),
                target: link.target().get(),
            })?;
        }
        Ok(())
    })
}

/// Writes the membership records of `groups` to `path`.
///
/// # Errors
/// Returns [`CsvProviderError::Io`] or [`CsvProviderError::Csv`] when the
/// file cannot be written.
#[instrument(name = "csv.write_groups", err, skip_all, fields(path = %path.display(), rows = groups.linked_count()))]
pub fn write_groups(path: &Path, groups: &GroupAssignment) -> Result<(), CsvProviderError> {
    write_atomically(path, |writer| {
        writer.write_record(GROUP_HEADER)?;
        for member in groups.members() {
            writer.serialize(GroupRow {
                group: member.group().get(),
                galaxy: member.galaxy().get(),
            })?;
        }
        Ok(())
    })
}

/// Writes a richness-frequency table to `path`.
///
/// # Errors
/// Returns [`CsvProviderError::Io`] or [`CsvProviderError::Csv`] when the
/// file cannot be written.
#[instrument(name = "csv.write_frequencies", err, skip_all, fields(path = %path.display(), rows = frequencies.len()))]
pub fn write_frequencies(
    path: &Path,
    frequencies: &[RichnessFrequency],
) -> Result<(), CsvProviderError> {
    write_atomically(path, |writer| {
        writer.write_record(FREQUENCY_HEADER)?;
        for row in frequencies {
            writer.serialize(FrequencyRow {
                richness: row.richness(),
                count: row.count(),
            })?;
        }
        Ok(())
    })
}

/// Writes all three artifacts of `run` into `directory`.
///
/// # Errors
/// Propagates the first write failure; artifacts written before it are
/// kept.
pub fn write_run(directory: &Path, run: &LinkingRun) -> Result<ArtifactPaths, CsvProviderError> {
    let paths = ArtifactPaths::new(directory, run.lengths());
    write_links(&paths.links, run.links())?;
    write_groups(&paths.groups, run.groups())?;
    write_frequencies(&paths.frequencies, &run.richness().frequencies())?;
    info!(directory = %directory.display(), lengths = %run.lengths(), "artifacts written");
    Ok(paths)
}

/// Reads a link list from the CSV file at `path`.
///
/// # Errors
/// Returns [`CsvProviderError::Io`] when the file cannot be opened, and
/// otherwise the errors of [`read_links`].
#[instrument(name = "csv.read_links", err, skip_all, fields(path = %path.as_ref().display()))]
pub fn read_links_path(path: impl AsRef<Path>) -> Result<LinkList, CsvProviderError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CsvProviderError::io(path, source))?;
    read_links(file)
}

/// Reads a link list with `CATAID1` and `CATAID2` columns.
///
/// A leading unnamed index column, as written by dataframe tooling, is
/// ignored along with any other extra column.
///
/// # Errors
/// Returns [`CsvProviderError::MissingColumn`] when either identifier column
/// is absent and [`CsvProviderError::MalformedRecord`] for a row that does
/// not parse.
///
/// # Examples
/// ```
/// use fofgroups_providers_csv::read_links;
///
/// let csv = ",CATAID1,CATAID2\n0,10,11\n1,11,10\n";
/// let links = read_links(csv.as_bytes()).expect("links must parse");
/// assert_eq!(links.len(), 2);
/// assert_eq!(links.links()[0].source().get(), 10);
/// ```
pub fn read_links<R: Read>(reader: R) -> Result<LinkList, CsvProviderError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    if let Some(column) = LINK_HEADER
        .into_iter()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(CsvProviderError::MissingColumn { column });
    }

    let links = reader
        .deserialize::<LinkRow>()
        .map(|row| {
            row.map(|row| Link::new(GalaxyId::new(row.source), GalaxyId::new(row.target)))
                .map_err(CsvProviderError::from_record)
        })
        .collect::<Result<LinkList, _>>()?;
    info!(links = links.len(), "link list loaded");
    Ok(links)
}
