//! # Layout Index
//!
//! Answers "which page and line of the printed mushaf does word X sit on?".
//!
//! The layout database has one row per printed line, covering a contiguous
//! range of word ids. Only `ayah` lines take part in lookups; headers such
//! as chapter names or the basmallah carry other line types.
//!
//! Two backends implement [`LayoutIndex`]:
//!
//! - [`RangeTable`]: all ayah rows loaded into a sorted vector, binary search.
//! - [`SqliteLayoutIndex`]: one range query per lookup against the open DB.
//!
//! Lookups never fail. Anything that goes wrong on a single lookup is logged
//! and reported as "no layout".

pub mod range_table;
pub mod sqlite;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::content::WordId;

pub use range_table::RangeTable;
pub use sqlite::SqliteLayoutIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Ayah,
    Other,
}

impl LineType {
    /// Exactly `ayah`, as the SQL filters match it. Anything else
    /// (surah_name, basmallah, ...) is `Other`.
    pub fn parse(raw: &str) -> Self {
        if raw == "ayah" {
            LineType::Ayah
        } else {
            LineType::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutRecord {
    pub first_word_id: WordId,
    pub last_word_id: WordId,
    pub page_number: u32,
    pub line_number: u32,
    pub line_type: LineType,
}

impl LayoutRecord {
    pub fn contains(&self, word_id: WordId) -> bool {
        self.first_word_id <= word_id && word_id <= self.last_word_id
    }
}

/// Point-in-range lookup over the layout table.
pub trait LayoutIndex: Send + Sync {
    /// Returns the ayah line containing `word_id`, or `None` when the layout
    /// is unavailable for it.
    fn lookup(&self, word_id: WordId) -> Option<LayoutRecord>;
}

/// Errors opening or reading the layout store. Always fatal at startup.
#[derive(Debug)]
pub enum LayoutError {
    Open { path: PathBuf, source: rusqlite::Error },
    Query { path: PathBuf, source: rusqlite::Error },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Open { path, source } => {
                write!(f, "cannot open layout database {}: {source}", path.display())
            }
            LayoutError::Query { path, source } => {
                write!(f, "cannot read layout database {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Open { source, .. } | LayoutError::Query { source, .. } => Some(source),
        }
    }
}

/// Opens the database read-only. A missing file is an error rather than a
/// silently created empty database.
pub(crate) fn open_read_only(path: &std::path::Path) -> Result<rusqlite::Connection, LayoutError> {
    use rusqlite::OpenFlags;

    rusqlite::Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| LayoutError::Open {
        path: path.to_path_buf(),
        source,
    })
}
