//! Shared test utilities for the archive-browser test suite.
//!
//! Provides fixture builders for on-disk archives, record constructors that
//! follow the filename convention, and extractors for asserting on ids.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = archive_with(&[
//!     ("2022", &["2022-kim-01-final.jpg"]),
//!     ("2023", &[]),
//! ]);
//! let report = scan(tmp.path(), &scan_config());
//! assert_eq!(year_ids(&report.index, "2022"), vec!["2022-kim-01"]);
//! ```

use std::fs;
use tempfile::TempDir;

use crate::config::ScanConfig;
use crate::types::{ArchiveIndex, MediaRecord};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp archive root with one directory per year and an empty file
/// for each listed name.
///
/// A year with no files still gets its directory; omit the year entirely to
/// simulate a missing folder.
pub fn archive_with(years: &[(&str, &[&str])]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (year, files) in years {
        let dir = tmp.path().join(year);
        fs::create_dir_all(&dir).unwrap();
        for file in *files {
            fs::write(dir.join(file), b"").unwrap();
        }
    }
    tmp
}

/// Stock scanner settings.
pub fn scan_config() -> ScanConfig {
    ScanConfig::default()
}

// =========================================================================
// Record construction
// =========================================================================

/// Build a `.jpg` record the way the scanner would for
/// `<year>-<artist>-<seq>-<medium>.jpg` under the default prefix.
pub fn record(year: &str, artist: &str, seq: &str, medium: &str) -> MediaRecord {
    let filename = format!("{year}-{artist}-{seq}-{medium}.jpg");
    let path = format!("img/Archive/{year}/{filename}");
    MediaRecord::new(year, artist, seq, medium, &filename, &path, "jpg")
}

/// Build an index from year buckets, in the given order.
pub fn index_of(years: &[(&str, Vec<MediaRecord>)]) -> ArchiveIndex {
    let mut index = ArchiveIndex::new();
    for (year, records) in years {
        index.insert(year, records.clone());
    }
    index
}

// =========================================================================
// Extractors
// =========================================================================

/// Record ids for one year, in stored order. Panics if the year is absent.
pub fn year_ids<'a>(index: &'a ArchiveIndex, year: &str) -> Vec<&'a str> {
    index
        .get(year)
        .unwrap_or_else(|| {
            let years: Vec<&str> = index.years().collect();
            panic!("year '{year}' not found. Available: {years:?}")
        })
        .iter()
        .map(MediaRecord::id)
        .collect()
}

/// Ids of a filtered record list, in order.
pub fn ids<'a>(records: &[&'a MediaRecord]) -> Vec<&'a str> {
    records.iter().map(|r| r.id()).collect()
}
