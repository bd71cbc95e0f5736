//! Whole-file replacement through a temporary sibling file.

use std::{
    io::{BufWriter, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::errors::CsvProviderError;

/// Writes `path` by running `fill` against a temporary file in the same
/// directory and renaming it into place once `fill` succeeds.
///
/// Readers observe either the previous file or the complete new one. On
/// failure the temporary file is removed and `path` is left untouched.
pub(crate) fn write_atomically<F>(path: &Path, fill: F) -> Result<(), CsvProviderError>
where
    F: FnOnce(&mut csv::Writer<BufWriter<&mut NamedTempFile>>) -> Result<(), CsvProviderError>,
{
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temporary =
        NamedTempFile::new_in(directory).map_err(|source| CsvProviderError::io(directory, source))?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(&mut temporary));
        fill(&mut writer)?;
        let mut buffered = writer
            .into_inner()
            .map_err(|error| CsvProviderError::io(path, error.into_error()))?;
        buffered
            .flush()
            .map_err(|source| CsvProviderError::io(path, source))?;
    }

    temporary
        .as_file()
        .sync_all()
        .map_err(|source| CsvProviderError::io(path, source))?;
    temporary
        .persist(path)
        .map_err(|error| CsvProviderError::io(path, error.error))?;
    Ok(())
}
