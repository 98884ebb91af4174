//! # Library
//!
//! Everything a request reads from, built once at startup:
//!
//! ```text
//! Library
//! ├── store: ContentStore          // words, translations, metadata, audio
//! ├── layout: Box<dyn LayoutIndex> // word id → page/line
//! └── grouped: GroupedVerses       // chapter → verse → words
//! ```
//!
//! Nothing here is mutated after construction, so it is shared across
//! requests behind an `Arc` without locking.

use std::fmt;

use log::info;

use crate::LayoutBackend;
use crate::content::{ContentStore, LoadError};
use crate::core::aggregate::{GroupedVerses, Verse, group_by_chapter_and_verse, verses_of};
use crate::core::config::ResolvedConfig;
use crate::layout::{LayoutError, LayoutIndex, RangeTable, SqliteLayoutIndex};

/// Anything that stops the viewer from starting.
#[derive(Debug)]
pub enum StartupError {
    Content(LoadError),
    Layout(LayoutError),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Content(e) => write!(f, "content data unavailable: {e}"),
            StartupError::Layout(e) => write!(f, "layout data unavailable: {e}"),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::Content(e) => Some(e),
            StartupError::Layout(e) => Some(e),
        }
    }
}

impl From<LoadError> for StartupError {
    fn from(value: LoadError) -> Self {
        StartupError::Content(value)
    }
}

impl From<LayoutError> for StartupError {
    fn from(value: LayoutError) -> Self {
        StartupError::Layout(value)
    }
}

pub struct Library {
    store: ContentStore,
    layout: Box<dyn LayoutIndex>,
    grouped: GroupedVerses,
}

impl Library {
    pub fn new(store: ContentStore, layout: Box<dyn LayoutIndex>) -> Self {
        let grouped = group_by_chapter_and_verse(store.words());
        Self {
            store,
            layout,
            grouped,
        }
    }

    /// Opens the layout store first: without it nothing can be served.
    pub fn open(config: &ResolvedConfig) -> Result<Self, StartupError> {
        let layout: Box<dyn LayoutIndex> = match config.layout_backend {
            LayoutBackend::Memory => Box::new(RangeTable::load_sqlite(&config.layout_db)?),
            LayoutBackend::Sqlite => Box::new(SqliteLayoutIndex::open(&config.layout_db)?),
        };
        let store = ContentStore::load(&config.sources)?;
        let library = Self::new(store, layout);
        info!(
            "Library ready: {} chapters with verses, {} chapter entries",
            library.grouped.len(),
            library.store.chapters().len()
        );
        Ok(library)
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn layout(&self) -> &dyn LayoutIndex {
        self.layout.as_ref()
    }

    pub fn grouped(&self) -> &GroupedVerses {
        &self.grouped
    }

    pub fn verses(&self, chapter: u32) -> impl Iterator<Item = Verse<'_>> {
        verses_of(&self.grouped, chapter)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::sample_library;

    #[test]
    fn test_library_groups_store_words() {
        let library = sample_library();
        assert_eq!(library.verses(1).count(), 1);
        assert_eq!(library.verses(2).map(|v| v.verse).collect::<Vec<_>>(), vec![5]);
        assert_eq!(library.verses(3).count(), 0);
    }

    #[test]
    fn test_library_layout_is_shared_index() {
        let library = sample_library();
        assert_eq!(library.layout().lookup(1).map(|r| r.page_number), Some(1));
        assert_eq!(library.layout().lookup(500), None);
    }
}
