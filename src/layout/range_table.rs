//! In-memory layout index: ayah ranges sorted by first word id.

use std::path::Path;

use log::{debug, info, warn};

use super::sqlite::{SELECT_AYAH_LINES_SQL, record_from_row};
use super::{LayoutError, LayoutIndex, LayoutRecord, LineType, open_read_only};
use crate::content::WordId;

#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: Vec<LayoutRecord>,
    /// Set when two ayah ranges share a word id. Lookup then scans instead
    /// of binary searching and returns the first containing range.
    has_overlaps: bool,
}

impl RangeTable {
    /// Builds the table from raw records. Non-ayah lines and inverted
    /// ranges are dropped.
    pub fn new(records: impl IntoIterator<Item = LayoutRecord>) -> Self {
        let mut ranges: Vec<LayoutRecord> = records
            .into_iter()
            .filter(|r| r.line_type == LineType::Ayah)
            .filter(|r| {
                let ok = r.first_word_id <= r.last_word_id;
                if !ok {
                    warn!(
                        "Skipping inverted layout range {}..{} on page {} line {}",
                        r.first_word_id, r.last_word_id, r.page_number, r.line_number
                    );
                }
                ok
            })
            .collect();
        ranges.sort_by_key(|r| (r.first_word_id, r.last_word_id));

        let overlap = find_overlap(&ranges);
        if let Some((a, b)) = overlap {
            warn!(
                "Layout ranges overlap ({}..{} page {} and {}..{} page {}); \
                 lookups return the first range in word order",
                a.first_word_id,
                a.last_word_id,
                a.page_number,
                b.first_word_id,
                b.last_word_id,
                b.page_number
            );
        }

        Self {
            ranges,
            has_overlaps: overlap.is_some(),
        }
    }

    /// Reads every ayah row of the `pages` table. Rows that can't be decoded are
    /// skipped with a warning; failing to open or query the table is fatal.
    pub fn load_sqlite(path: &Path) -> Result<Self, LayoutError> {
        let query_err = |source| LayoutError::Query {
            path: path.to_path_buf(),
            source,
        };

        let conn = open_read_only(path)?;
        let mut stmt = conn.prepare(SELECT_AYAH_LINES_SQL).map_err(query_err)?;
        let rows = stmt.query_map([], record_from_row).map_err(query_err)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in rows {
            match row {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    debug!("Skipping malformed layout row: {e}");
                }
            }
        }
        if skipped > 0 {
            warn!("Skipped {skipped} malformed rows in {}", path.display());
        }

        let table = Self::new(records);
        info!(
            "Loaded {} ayah line ranges from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn has_overlaps(&self) -> bool {
        self.has_overlaps
    }
}

/// Returns the first pair of ranges that share a word id. `ranges` must be
/// sorted by first word id.
fn find_overlap(ranges: &[LayoutRecord]) -> Option<(LayoutRecord, LayoutRecord)> {
    let mut widest = *ranges.first()?;
    for next in &ranges[1..] {
        if next.first_word_id <= widest.last_word_id {
            return Some((widest, *next));
        }
        if next.last_word_id > widest.last_word_id {
            widest = *next;
        }
    }
    None
}

impl LayoutIndex for RangeTable {
    fn lookup(&self, word_id: WordId) -> Option<LayoutRecord> {
        if word_id == 0 {
            return None;
        }
        if self.has_overlaps {
            return self.ranges.iter().find(|r| r.contains(word_id)).copied();
        }
        let idx = self.ranges.partition_point(|r| r.first_word_id <= word_id);
        let candidate = self.ranges.get(idx.checked_sub(1)?)?;
        candidate.contains(word_id).then_some(*candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ayah_line, write_layout_db};
    use tempfile::TempDir;

    fn table() -> RangeTable {
        RangeTable::new(vec![
            ayah_line(11, 20, 1, 2),
            ayah_line(1, 10, 1, 1),
            ayah_line(30, 35, 2, 1),
            LayoutRecord {
                first_word_id: 21,
                last_word_id: 29,
                page_number: 2,
                line_number: 0,
                line_type: LineType::Other,
            },
        ])
    }

    #[test]
    fn test_only_ayah_lines_are_kept() {
        let t = table();
        assert_eq!(t.len(), 3);
        assert!(!t.has_overlaps());
    }

    #[test]
    fn test_every_id_in_a_range_returns_that_range() {
        let t = table();
        for id in 1..=10 {
            let r = t.lookup(id).unwrap();
            assert_eq!((r.first_word_id, r.last_word_id), (1, 10));
            assert_eq!((r.page_number, r.line_number), (1, 1));
        }
        for id in 30..=35 {
            let r = t.lookup(id).unwrap();
            assert_eq!((r.page_number, r.line_number), (2, 1));
        }
    }

    #[test]
    fn test_ids_outside_ranges_are_none() {
        let t = table();
        for id in [0, 21, 25, 29, 36, 1000, u32::MAX] {
            assert_eq!(t.lookup(id), None, "word {id}");
        }
    }

    #[test]
    fn test_empty_table_never_matches() {
        let t = RangeTable::new(Vec::new());
        assert!(t.is_empty());
        assert_eq!(t.lookup(1), None);
    }

    #[test]
    fn test_inverted_range_is_dropped() {
        let t = RangeTable::new(vec![ayah_line(10, 5, 1, 1)]);
        assert!(t.is_empty());
        assert_eq!(t.lookup(7), None);
    }

    #[test]
    fn test_overlap_returns_first_range_in_word_order() {
        let t = RangeTable::new(vec![ayah_line(5, 15, 2, 1), ayah_line(1, 10, 1, 1)]);
        assert!(t.has_overlaps());
        assert_eq!(t.lookup(7).unwrap().page_number, 1);
        assert_eq!(t.lookup(12).unwrap().page_number, 2);
    }

    #[test]
    fn test_nested_range_overlap_still_finds_outer() {
        // Without the overlap fallback, a binary search for 20 would land on
        // the inner 5..8 range and miss.
        let t = RangeTable::new(vec![ayah_line(1, 30, 1, 1), ayah_line(5, 8, 1, 2)]);
        assert!(t.has_overlaps());
        assert_eq!(t.lookup(20).unwrap().line_number, 1);
    }

    #[test]
    fn test_load_sqlite_skips_malformed_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_layout_db(&dir, &[(1, 10, 1, 1, "ayah"), (11, 20, 1, 2, "ayah")]);
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch(
                "INSERT INTO pages (page_number, line_number, line_type, first_word_id, last_word_id)
                     VALUES (2, 1, 'ayah', 'x', 30);
                 INSERT INTO pages (page_number, line_number, line_type, first_word_id, last_word_id)
                     VALUES (2, 2, 'ayah', -4, 40);",
            )
            .unwrap();

        let t = RangeTable::load_sqlite(&path).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.lookup(15).unwrap().line_number, 2);
        assert_eq!(t.lookup(35), None);
    }

    #[test]
    fn test_load_sqlite_missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = RangeTable::load_sqlite(&dir.path().join("missing.db")).unwrap_err();
        assert!(err.to_string().contains("missing.db"));
    }
}
