//! Filename parsing for the `YEAR-artist-sequence-medium.ext` convention.
//!
//! Every archive file carries its metadata in its name. The stem is split on
//! dashes into four logical fields:
//!
//! ```text
//! 2022-alban_ovanessian-01-behind-the-scenes.jpeg
//! ^^^^ ^^^^^^^^^^^^^^^^ ^^ ^^^^^^^^^^^^^^^^^ ^^^^
//! year artist slug      seq medium           extension
//! ```
//!
//! The medium swallows every token after the sequence, so mediums may contain
//! dashes of their own. The year token is only cross-checked: the directory a
//! file lives in decides which year bucket it belongs to.
//!
//! ## Display names
//!
//! Two separate capitalization rules turn slugs into labels:
//! - [`format_artist_name`] splits on `_` only: `alban_ovanessian` → "Alban Ovanessian"
//! - [`format_medium_name`] splits on `-` and `_`: `behind-the-scenes` → "Behind The Scenes"

use crate::types::MediaRecord;

/// Outcome of parsing a single directory entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFilename {
    /// No extension, or an extension outside the allow-list. Not an error.
    Unrecognized,
    /// Fewer than four dash-separated stem tokens.
    Malformed { tokens: usize },
    /// A complete record. `year_mismatch` holds the embedded year when it
    /// disagrees with the directory year.
    Record {
        record: MediaRecord,
        year_mismatch: Option<String>,
    },
}

/// Parse `filename`, found in the directory for `year`, into a record.
///
/// `extensions` is the lowercase allow-list without leading dots.
/// `path_prefix` is prepended to `<year>/<filename>` to build the record path.
///
/// - `"2022-alban_ovanessian-01-bts.jpeg"` → Record, medium="bts"
/// - `"2022-a-01-behind-the-scenes.png"` → Record, medium="behind-the-scenes"
/// - `"2022-a-01.jpg"` → Malformed { tokens: 3 }
/// - `"notes.txt"`, `"README"` → Unrecognized
pub fn parse_media_filename(
    filename: &str,
    year: &str,
    extensions: &[String],
    path_prefix: &str,
) -> ParsedFilename {
    let Some((stem, ext)) = filename.rsplit_once('.') else {
        return ParsedFilename::Unrecognized;
    };
    let extension = ext.to_lowercase();
    if !extensions.iter().any(|allowed| *allowed == extension) {
        return ParsedFilename::Unrecognized;
    }

    let tokens: Vec<&str> = stem.split('-').collect();
    if tokens.len() < 4 {
        return ParsedFilename::Malformed {
            tokens: tokens.len(),
        };
    }

    let embedded_year = tokens[0];
    let medium = tokens[3..].join("-");
    let relative_path = join_path(&[path_prefix, year, filename]);

    let record = MediaRecord::new(
        year,
        tokens[1],
        tokens[2],
        &medium,
        filename,
        &relative_path,
        &extension,
    );

    let year_mismatch = (embedded_year != year).then(|| embedded_year.to_string());
    ParsedFilename::Record {
        record,
        year_mismatch,
    }
}

/// Convert an artist slug into a display name.
///
/// Splits on `_` only, uppercases the first character of each word and joins
/// with single spaces. Empty words pass through unchanged, so doubled
/// underscores become doubled spaces.
pub fn format_artist_name(slug: &str) -> String {
    slug.split('_').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Convert a raw medium into a display label.
///
/// Splits on both `-` and `_`, otherwise identical to [`format_artist_name`].
pub fn format_medium_name(medium: &str) -> String {
    medium
        .split(['-', '_'])
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join_path(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
