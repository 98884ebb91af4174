//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::content::{AudioEntry, ChapterMeta, ContentStore, Translation, Word};
use crate::core::library::Library;
use crate::layout::{LayoutRecord, LineType, RangeTable};

/// Writes `contents` to `name` inside `dir` and returns its path.
pub fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

pub fn word(chapter: u32, verse: u32, word_id: u32, text: &str) -> Word {
    Word {
        chapter,
        verse,
        word_id,
        text: text.to_string(),
    }
}

pub fn ayah_line(first: u32, last: u32, page: u32, line: u32) -> LayoutRecord {
    LayoutRecord {
        first_word_id: first,
        last_word_id: last,
        page_number: page,
        line_number: line,
        line_type: LineType::Ayah,
    }
}

/// Creates `layout.db` with a `pages` table holding
/// `(first_word_id, last_word_id, page_number, line_number, line_type)` rows.
pub fn write_layout_db(dir: &TempDir, rows: &[(u32, u32, u32, u32, &str)]) -> PathBuf {
    let path = dir.path().join("layout.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE pages (
            page_number INTEGER,
            line_number INTEGER,
            line_type TEXT,
            first_word_id INTEGER,
            last_word_id INTEGER
        );",
    )
    .unwrap();
    for (first, last, page, line, kind) in rows {
        conn.execute(
            "INSERT INTO pages (page_number, line_number, line_type, first_word_id, last_word_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![page, line, kind, first, last],
        )
        .unwrap();
    }
    path
}

/// Chapter 1 verse 1 is fully populated except for audio; chapter 2
/// verse 5 has audio but no translation and no layout.
pub fn sample_store() -> ContentStore {
    let words = vec![
        word(1, 1, 1, "Bismillah"),
        word(1, 1, 2, "ArRahman"),
        word(2, 5, 500, "Ulaika"),
        word(2, 5, 501, "ala"),
    ];
    let translations = HashMap::from([(
        "1:1".to_string(),
        Translation {
            text: "In the name of God".to_string(),
        },
    )]);
    let audio = HashMap::from([(
        "2:5".to_string(),
        AudioEntry {
            audio_url: "https://cdn.example/2_5.mp3".to_string(),
        },
    )]);
    let chapters = vec![
        ChapterMeta {
            surah_number: Some(1),
            surah_name: Some("Al-Fatihah".to_string()),
        },
        ChapterMeta {
            surah_number: Some(2),
            surah_name: Some("Al-Baqarah".to_string()),
        },
    ];
    ContentStore::from_parts(words, translations, audio, chapters)
}

pub fn sample_library() -> Library {
    Library::new(
        sample_store(),
        Box::new(RangeTable::new(vec![ayah_line(1, 10, 1, 1)])),
    )
}
