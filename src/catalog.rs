//! Loading the archive index into the browser's in-memory collection.
//!
//! A [`Catalog`] is the flattened, read-only view of one index file: every
//! year's records concatenated in the file's year order, plus the filter
//! vocabularies derived from those records.

use crate::types::{ArchiveIndex, MediaRecord};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("archive index not found at {0}")]
    NotFound(PathBuf),
    #[error("IO error reading archive index: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive index is not valid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Distinct values available to each filter control, sorted ascending.
///
/// The wildcard is always available in addition to these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabularies {
    pub years: Vec<String>,
    pub media: Vec<String>,
    pub artists: Vec<String>,
}

impl Vocabularies {
    pub fn derive(records: &[MediaRecord]) -> Self {
        Self {
            years: distinct_sorted(records, MediaRecord::year),
            media: distinct_sorted(records, MediaRecord::medium),
            artists: distinct_sorted(records, MediaRecord::artist_display),
        }
    }
}

fn distinct_sorted(records: &[MediaRecord], field: fn(&MediaRecord) -> &str) -> Vec<String> {
    records
        .iter()
        .map(field)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone)]
pub struct Catalog {
    index_years: Vec<String>,
    records: Vec<MediaRecord>,
    vocabularies: Vocabularies,
}

impl Catalog {
    pub fn from_index(index: &ArchiveIndex) -> Self {
        let records: Vec<MediaRecord> = index.records().cloned().collect();
        let vocabularies = Vocabularies::derive(&records);
        Self {
            index_years: index.years().map(String::from).collect(),
            records,
            vocabularies,
        }
    }

    /// Year keys of the source index, in file order, including empty years.
    pub fn index_years(&self) -> &[String] {
        &self.index_years
    }

    /// All records, flattened in year-bucket order.
    pub fn records(&self) -> &[MediaRecord] {
        &self.records
    }

    pub fn vocabularies(&self) -> &Vocabularies {
        &self.vocabularies
    }
}

/// Read and parse the index file at `path`.
pub fn load(path: &Path) -> Result<Catalog, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let index: ArchiveIndex = serde_json::from_str(&content)?;
    let catalog = Catalog::from_index(&index);
    info!("Loaded {} media items", catalog.records.len());
    Ok(catalog)
}
