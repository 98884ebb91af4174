//! # View Model Builder
//!
//! One display record per verse. Every piece of optional data that is
//! missing turns into a placeholder or `None` here; nothing in this module
//! can fail a request.

use serde::{Deserialize, Serialize};

use crate::content::ContentStore;
use crate::core::aggregate::Verse;
use crate::core::library::Library;
use crate::layout::LayoutIndex;

/// Shown in place of a missing translation.
pub const TRANSLATION_PLACEHOLDER: &str = "Translation unavailable";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    pub translation: String,
    pub audio_url: Option<String>,
    pub page_number: Option<u32>,
    pub line_number: Option<u32>,
}

impl ViewModel {
    /// File name of the scanned page, e.g. `007.png`.
    pub fn page_image_name(&self, ext: &str) -> Option<String> {
        self.page_number.map(|page| format!("{page:03}.{ext}"))
    }
}

pub fn build(verse: &Verse<'_>, store: &ContentStore, layout: &dyn LayoutIndex) -> ViewModel {
    let translation = store
        .get_translation(verse.chapter, verse.verse)
        .unwrap_or(TRANSLATION_PLACEHOLDER)
        .to_string();
    let audio_url = store
        .get_audio_url(verse.chapter, verse.verse)
        .map(str::to_string);
    let line = verse.first_word_id().and_then(|id| layout.lookup(id));

    ViewModel {
        chapter: verse.chapter,
        verse: verse.verse,
        text: verse.text(),
        translation,
        audio_url,
        page_number: line.map(|l| l.page_number),
        line_number: line.map(|l| l.line_number),
    }
}

/// View models for every verse of `chapter`, in verse order.
pub fn build_chapter(library: &Library, chapter: u32) -> Vec<ViewModel> {
    library
        .verses(chapter)
        .map(|verse| build(&verse, library.store(), library.layout()))
        .collect()
}
