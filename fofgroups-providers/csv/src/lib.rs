//! CSV ingestion of galaxy catalogs and link lists, and atomic writers for
//! the link, group, and richness-frequency artifacts.

mod artifacts;
mod atomic;
mod catalog;
mod errors;

pub use artifacts::{
    ArtifactKind, ArtifactPaths, artifact_file_name, read_links, read_links_path, write_frequencies,
    write_groups, write_links, write_run,
};
pub use catalog::{CATALOG_COLUMNS, read_catalog, read_catalog_path};
pub use errors::{CsvProviderError, CsvProviderErrorCode};
