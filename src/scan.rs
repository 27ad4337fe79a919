//! Archive scanning and index generation.
//!
//! Walks one directory per configured year, turns every recognized image into
//! a [`MediaRecord`], and produces the [`ArchiveIndex`] the browser consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! img/Archive/                                 # Scan root
//! ├── 2022/
//! │   ├── 2022-alban_ovanessian-01-bts.jpeg
//! │   ├── 2022-alban_ovanessian-02-final.png
//! │   └── notes.txt                            # Ignored (extension)
//! ├── 2023/                                    # Missing folders are allowed
//! └── 2024/
//!     └── 2024-kim-01-behind-the-scenes.gif
//! ```
//!
//! ## Failure Policy
//!
//! Nothing about an individual file or year aborts the scan. Problems are
//! collected as [`ScanIssue`]s and logged:
//!
//! - missing year folder → empty list for that year
//! - filename with fewer than four fields → file excluded
//! - embedded year disagreeing with the folder → record kept under the folder year
//! - two files producing the same id → both kept
//! - file name that is not valid UTF-8 → file excluded
//!
//! Dot-prefixed names get no special treatment: they are parsed like any
//! other file.
//!
//! Only writing the index can fail a run.

use crate::config::ScanConfig;
use crate::naming::{ParsedFilename, parse_media_filename};
use crate::types::{ArchiveIndex, MediaRecord, sort_records};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A non-fatal problem found while scanning.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanIssue {
    MissingDirectory { year: String, path: PathBuf },
    UnreadableEntry { year: String, message: String },
    ParseFailure { year: String, filename: String },
    YearMismatch {
        filename: String,
        expected: String,
        found: String,
    },
    DuplicateId { id: String },
}

impl std::fmt::Display for ScanIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanIssue::MissingDirectory { path, .. } => {
                write!(f, "Folder not found: {}", path.display())
            }
            ScanIssue::UnreadableEntry { year, message } => {
                write!(f, "Unreadable entry in {year}: {message}")
            }
            ScanIssue::ParseFailure { filename, .. } => write!(f, "Could not parse: {filename}"),
            ScanIssue::YearMismatch {
                filename,
                expected,
                found,
            } => write!(
                f,
                "Year mismatch in {filename}: expected {expected}, got {found}"
            ),
            ScanIssue::DuplicateId { id } => write!(f, "Duplicate id: {id}"),
        }
    }
}

/// Result of a scan: the index plus every issue encountered along the way.
#[derive(Debug)]
pub struct ScanReport {
    pub index: ArchiveIndex,
    pub issues: Vec<ScanIssue>,
}

/// Scan every configured year under `root`.
pub fn scan(root: &Path, config: &ScanConfig) -> ScanReport {
    let mut index = ArchiveIndex::new();
    let mut issues = Vec::new();

    for year in &config.years {
        let records = scan_year(root, year, config, &mut issues);
        info!(year = %year, files = records.len(), "scanned year");
        index.insert(year, records);
    }

    issues.extend(duplicate_ids(&index));

    ScanReport { index, issues }
}

fn scan_year(
    root: &Path,
    year: &str,
    config: &ScanConfig,
    issues: &mut Vec<ScanIssue>,
) -> Vec<MediaRecord> {
    let year_path = root.join(year);
    if !year_path.is_dir() {
        warn!("Folder not found: {}", year_path.display());
        issues.push(ScanIssue::MissingDirectory {
            year: year.to_string(),
            path: year_path,
        });
        return Vec::new();
    }

    let mut records = Vec::new();
    let entries = WalkDir::new(&year_path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Unreadable entry in {}: {}", year_path.display(), e);
                issues.push(ScanIssue::UnreadableEntry {
                    year: year.to_string(),
                    message: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(filename) = entry.file_name().to_str() else {
            let message = format!(
                "file name is not valid UTF-8: {}",
                entry.file_name().to_string_lossy()
            );
            warn!("Unreadable entry in {}: {}", year_path.display(), message);
            issues.push(ScanIssue::UnreadableEntry {
                year: year.to_string(),
                message,
            });
            continue;
        };

        match parse_media_filename(filename, year, &config.extensions, &config.path_prefix) {
            ParsedFilename::Unrecognized => {
                debug!(file = %filename, "skipping unrecognized file");
            }
            ParsedFilename::Malformed { tokens } => {
                warn!(tokens, "Could not parse: {}", filename);
                issues.push(ScanIssue::ParseFailure {
                    year: year.to_string(),
                    filename: filename.to_string(),
                });
            }
            ParsedFilename::Record {
                record,
                year_mismatch,
            } => {
                if let Some(found) = year_mismatch {
                    warn!(
                        "Year mismatch in {}: expected {}, got {}",
                        filename, year, found
                    );
                    issues.push(ScanIssue::YearMismatch {
                        filename: filename.to_string(),
                        expected: year.to_string(),
                        found,
                    });
                }
                records.push(record);
            }
        }
    }

    sort_records(&mut records);
    records
}

/// Ids shared by more than one record, each reported once.
fn duplicate_ids(index: &ArchiveIndex) -> Vec<ScanIssue> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut issues = Vec::new();
    for record in index.records() {
        if !seen.insert(record.id()) && reported.insert(record.id()) {
            warn!("Duplicate id: {}", record.id());
            issues.push(ScanIssue::DuplicateId {
                id: record.id().to_string(),
            });
        }
    }
    issues
}

/// Serialize the index as pretty JSON and write it, creating parent directories.
pub fn write_index(index: &ArchiveIndex, output: &Path) -> Result<(), ScanError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(index)?;
    fs::write(output, json)?;
    info!("Archive data saved to: {}", output.display());
    Ok(())
}
