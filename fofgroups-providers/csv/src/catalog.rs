//! Galaxy catalog ingestion.

use std::{fs::File, io::Read, path::Path};

use fofgroups_core::{Catalog, Galaxy, GalaxyId};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::CsvProviderError;

/// Columns a catalog file must provide. Any other column is ignored.
pub const CATALOG_COLUMNS: [&str; 5] = ["CATAID", "RA_rad", "DEC_rad", "line_v", "CoDistTran"];

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "CATAID")]
    id: u64,
    #[serde(rename = "RA_rad")]
    ra: f64,
    #[serde(rename = "DEC_rad")]
    dec: f64,
    #[serde(rename = "line_v")]
    line_of_sight_velocity: f64,
    #[serde(rename = "CoDistTran")]
    transverse_distance: f64,
}

impl From<CatalogRow> for Galaxy {
    fn from(row: CatalogRow) -> Self {
        Galaxy::new(
            GalaxyId::new(row.id),
            row.ra,
            row.dec,
            row.line_of_sight_velocity,
            row.transverse_distance,
        )
    }
}

/// Reads and validates a catalog from the CSV file at `path`.
///
/// # Errors
/// Returns [`CsvProviderError::Io`] when the file cannot be opened, and
/// otherwise the errors of [`read_catalog`].
#[instrument(name = "csv.read_catalog", err, skip_all, fields(path = %path.as_ref().display()))]
pub fn read_catalog_path(path: impl AsRef<Path>) -> Result<Catalog, CsvProviderError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CsvProviderError::io(path, source))?;
    read_catalog(file)
}

/// Reads and validates a catalog from CSV text with a header row.
///
/// Columns are selected by name, so their order and any extra columns do
/// not matter.
///
/// # Errors
/// Returns [`CsvProviderError::MissingColumn`] when a required column is
/// absent, [`CsvProviderError::MalformedRecord`] for a row that does not
/// parse, and [`CsvProviderError::Catalog`] when the parsed rows fail
/// catalog validation.
///
/// # Examples
/// ```
/// use fofgroups_providers_csv::read_catalog;
///
/// let csv = "CATAID,RA,RA_rad,DEC_rad,line_v,CoDistTran\n\
///            7,12.5,0.218,0.01,3000.0,42.0\n";
/// let catalog = read_catalog(csv.as_bytes()).expect("catalog must parse");
/// assert_eq!(catalog.len(), 1);
/// assert_eq!(catalog.galaxies()[0].line_of_sight_velocity(), 3000.0);
/// ```
pub fn read_catalog<R: Read>(reader: R) -> Result<Catalog, CsvProviderError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    if let Some(column) = CATALOG_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(CsvProviderError::MissingColumn { column });
    }

    let galaxies = reader
        .deserialize::<CatalogRow>()
        .map(|row| row.map(Galaxy::from).map_err(CsvProviderError::from_record))
        .collect::<Result<Vec<_>, _>>()?;
    let catalog = Catalog::try_new(galaxies)?;
    info!(galaxies = catalog.len(), "catalog loaded");
    Ok(catalog)
}
