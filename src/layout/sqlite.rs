//! Per-lookup range queries against the layout database.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{info, warn};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{LayoutError, LayoutIndex, LayoutRecord, LineType, open_read_only};
use crate::content::WordId;

pub(crate) const SELECT_AYAH_LINES_SQL: &str =
    "SELECT first_word_id, last_word_id, page_number, line_number, line_type \
     FROM pages WHERE line_type = 'ayah'";

const LOOKUP_SQL: &str = "SELECT first_word_id, last_word_id, page_number, line_number, line_type \
     FROM pages \
     WHERE line_type = 'ayah' AND first_word_id <= ?1 AND last_word_id >= ?1 \
     LIMIT 1";

/// Converts one `pages` row. Fails on NULLs, text in numeric columns and
/// negative or oversized numbers.
pub(crate) fn record_from_row(row: &Row<'_>) -> rusqlite::Result<LayoutRecord> {
    Ok(LayoutRecord {
        first_word_id: column_u32(row, 0)?,
        last_word_id: column_u32(row, 1)?,
        page_number: column_u32(row, 2)?,
        line_number: column_u32(row, 3)?,
        line_type: LineType::parse(&row.get::<_, String>(4)?),
    })
}

fn column_u32(row: &Row<'_>, idx: usize) -> rusqlite::Result<u32> {
    let value: i64 = row.get(idx)?;
    u32::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, value))
}

/// Keeps the connection open and asks SQLite for every lookup.
#[derive(Debug)]
pub struct SqliteLayoutIndex {
    path: PathBuf,
    // rusqlite connections are Send but not Sync.
    conn: Mutex<Connection>,
}

impl SqliteLayoutIndex {
    pub fn open(path: &Path) -> Result<Self, LayoutError> {
        let conn = open_read_only(path)?;
        // Fail at startup rather than on the first request if the table is missing.
        conn.prepare_cached(LOOKUP_SQL)
            .map_err(|source| LayoutError::Query {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Opened layout database {} for per-lookup queries", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    fn query(&self, word_id: WordId) -> rusqlite::Result<Option<LayoutRecord>> {
        let conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut stmt = conn.prepare_cached(LOOKUP_SQL)?;
        stmt.query_row(params![word_id], record_from_row).optional()
    }
}

impl LayoutIndex for SqliteLayoutIndex {
    fn lookup(&self, word_id: WordId) -> Option<LayoutRecord> {
        if word_id == 0 {
            return None;
        }
        match self.query(word_id) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    "Layout lookup for word {word_id} in {} failed: {e}",
                    self.path.display()
                );
                None
            }
        }
    }
}
