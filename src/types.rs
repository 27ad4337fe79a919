//! The archive index data contract shared by the scanner and the browser.
//!
//! The scanner serializes an [`ArchiveIndex`] to `archive-data.json`; the
//! browser deserializes the same file. Field names on [`MediaRecord`] are
//! part of that contract:
//!
//! ```json
//! {
//!   "2022": [
//!     {
//!       "id": "2022-alban_ovanessian-01",
//!       "year": "2022",
//!       "artist": "alban_ovanessian",
//!       "artistDisplay": "Alban Ovanessian",
//!       "sequence": "01",
//!       "medium": "bts",
//!       "filename": "2022-alban_ovanessian-01-bts.jpeg",
//!       "path": "img/Archive/2022/2022-alban_ovanessian-01-bts.jpeg",
//!       "extension": "jpeg"
//!     }
//!   ],
//!   "2023": []
//! }
//! ```

use crate::naming::format_artist_name;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One image file in the archive.
///
/// Immutable once built: fields are private and `artist_display` and `id`
/// are always derived from the other fields, including when a record is
/// read back from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredRecord")]
pub struct MediaRecord {
    id: String,
    year: String,
    #[serde(rename = "artist")]
    artist_slug: String,
    artist_display: String,
    sequence: String,
    medium: String,
    filename: String,
    #[serde(rename = "path")]
    relative_path: String,
    extension: String,
}

impl MediaRecord {
    pub fn new(
        year: &str,
        artist_slug: &str,
        sequence: &str,
        medium: &str,
        filename: &str,
        relative_path: &str,
        extension: &str,
    ) -> Self {
        Self {
            id: format!("{year}-{artist_slug}-{sequence}"),
            year: year.to_string(),
            artist_slug: artist_slug.to_string(),
            artist_display: format_artist_name(artist_slug),
            sequence: sequence.to_string(),
            medium: medium.to_string(),
            filename: filename.to_string(),
            relative_path: relative_path.to_string(),
            extension: extension.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn artist_slug(&self) -> &str {
        &self.artist_slug
    }

    pub fn artist_display(&self) -> &str {
        &self.artist_display
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn medium(&self) -> &str {
        &self.medium
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

/// Wire shape of a record. `id` and `artistDisplay` are accepted but ignored.
#[derive(Deserialize)]
struct StoredRecord {
    year: String,
    artist: String,
    sequence: String,
    medium: String,
    filename: String,
    path: String,
    extension: String,
}

impl From<StoredRecord> for MediaRecord {
    fn from(s: StoredRecord) -> Self {
        MediaRecord::new(
            &s.year,
            &s.artist,
            &s.sequence,
            &s.medium,
            &s.filename,
            &s.path,
            &s.extension,
        )
    }
}

/// Sort records in place by `(artist_slug, sequence)`, plain string order.
pub fn sort_records(records: &mut [MediaRecord]) {
    records.sort_by(|a, b| {
        a.artist_slug
            .cmp(&b.artist_slug)
            .then_with(|| a.sequence.cmp(&b.sequence))
    });
}

/// Year → records mapping, in insertion order.
///
/// Serializes as a JSON object whose keys appear in the same order they were
/// inserted (the configured year order), and deserializes preserving the
/// file's key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveIndex {
    years: Vec<YearBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearBucket {
    pub year: String,
    pub records: Vec<MediaRecord>,
}

impl ArchiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a year bucket, replacing any existing bucket for the same year
    /// in place.
    pub fn insert(&mut self, year: &str, records: Vec<MediaRecord>) {
        match self.years.iter_mut().find(|b| b.year == year) {
            Some(bucket) => bucket.records = records,
            None => self.years.push(YearBucket {
                year: year.to_string(),
                records,
            }),
        }
    }

    pub fn get(&self, year: &str) -> Option<&[MediaRecord]> {
        self.years
            .iter()
            .find(|b| b.year == year)
            .map(|b| b.records.as_slice())
    }

    pub fn buckets(&self) -> &[YearBucket] {
        &self.years
    }

    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.years.iter().map(|b| b.year.as_str())
    }

    /// Every record, year bucket order first, then per-year order.
    pub fn records(&self) -> impl Iterator<Item = &MediaRecord> {
        self.years.iter().flat_map(|b| b.records.iter())
    }

    pub fn total(&self) -> usize {
        self.years.iter().map(|b| b.records.len()).sum()
    }
}

impl Serialize for ArchiveIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.years.len()))?;
        for bucket in &self.years {
            map.serialize_entry(&bucket.year, &bucket.records)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ArchiveIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(IndexVisitor)
    }
}

struct IndexVisitor;

impl<'de> Visitor<'de> for IndexVisitor {
    type Value = ArchiveIndex;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping years to arrays of media records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut index = ArchiveIndex::new();
        while let Some((year, records)) = access.next_entry::<String, Vec<MediaRecord>>()? {
            if index.get(&year).is_some() {
                return Err(serde::de::Error::custom(format!("duplicate year {year}")));
            }
            index.insert(&year, records);
        }
        Ok(index)
    }
}
