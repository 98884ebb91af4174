//! # Aggregator
//!
//! Turns the flat word list into chapters of verses.
//!
//! ```text
//! [Word, Word, Word, ...]  ──►  chapter ─► verse ─► [Word, Word]
//!                                         verse ─► [Word]
//!                               chapter ─► ...
//! ```
//!
//! Word order inside a verse is the order the words appeared in the source;
//! that order is the rendered reading order. Chapters and verses iterate in
//! ascending number.

use std::collections::BTreeMap;

use crate::content::{Word, WordId};

pub type GroupedVerses = BTreeMap<u32, BTreeMap<u32, Vec<Word>>>;

/// Buckets every word under its own (chapter, verse). Numbers are taken as-is.
pub fn group_by_chapter_and_verse(words: &[Word]) -> GroupedVerses {
    let mut grouped = GroupedVerses::new();
    for word in words {
        grouped
            .entry(word.chapter)
            .or_default()
            .entry(word.verse)
            .or_default()
            .push(word.clone());
    }
    grouped
}

/// Id of the first word in sequence order, `None` for an empty verse.
pub fn first_word_id(verse_words: &[Word]) -> Option<WordId> {
    verse_words.first().map(|w| w.word_id)
}

/// A verse as seen by the view model builder.
#[derive(Debug, Clone, Copy)]
pub struct Verse<'a> {
    pub chapter: u32,
    pub verse: u32,
    pub words: &'a [Word],
}

impl Verse<'_> {
    pub fn first_word_id(&self) -> Option<WordId> {
        first_word_id(self.words)
    }

    /// Word texts joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Verses of one chapter in verse order. Empty for unknown chapters.
pub fn verses_of(grouped: &GroupedVerses, chapter: u32) -> impl Iterator<Item = Verse<'_>> {
    grouped
        .get(&chapter)
        .into_iter()
        .flat_map(move |verses| {
            verses.iter().map(move |(verse, words)| Verse {
                chapter,
                verse: *verse,
                words,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::word;

    #[test]
    fn test_grouping_preserves_order_with_interleaving() {
        let words = vec![
            word(2, 1, 50, "c"),
            word(1, 1, 3, "x"),
            word(1, 2, 7, "p"),
            word(1, 1, 1, "y"),
            word(2, 1, 51, "d"),
            word(1, 1, 2, "z"),
        ];
        let grouped = group_by_chapter_and_verse(&words);

        let v11 = &grouped[&1][&1];
        let ids: Vec<_> = v11.iter().map(|w| w.word_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(first_word_id(v11), Some(3));

        assert_eq!(first_word_id(&grouped[&2][&1]), Some(50));
        assert_eq!(first_word_id(&grouped[&1][&2]), Some(7));
    }

    #[test]
    fn test_every_word_lands_in_exactly_one_bucket() {
        let words = vec![
            word(1, 1, 1, "a"),
            word(1, 2, 2, "b"),
            word(3, 7, 3, "c"),
            word(1, 1, 4, "d"),
        ];
        let grouped = group_by_chapter_and_verse(&words);
        let total: usize = grouped.values().flat_map(|v| v.values()).map(Vec::len).sum();
        assert_eq!(total, words.len());
        // No renumbering: chapter 3 verse 7 stays 3:7.
        assert_eq!(grouped[&3][&7][0].text, "c");
        assert!(!grouped.contains_key(&2));
    }

    #[test]
    fn test_first_word_id_of_empty_verse_is_none() {
        assert_eq!(first_word_id(&[]), None);
        let verse = Verse {
            chapter: 1,
            verse: 1,
            words: &[],
        };
        assert_eq!(verse.first_word_id(), None);
        assert_eq!(verse.text(), "");
    }

    #[test]
    fn test_verse_text_joins_with_single_spaces() {
        let words = vec![word(1, 1, 1, "Bismillah"), word(1, 1, 2, "ArRahman")];
        let verse = Verse {
            chapter: 1,
            verse: 1,
            words: &words,
        };
        assert_eq!(verse.text(), "Bismillah ArRahman");
    }

    #[test]
    fn test_verses_of_iterates_in_verse_order() {
        let words = vec![word(1, 3, 9, "c"), word(1, 1, 1, "a"), word(1, 2, 5, "b")];
        let grouped = group_by_chapter_and_verse(&words);
        let numbers: Vec<_> = verses_of(&grouped, 1).map(|v| v.verse).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(verses_of(&grouped, 42).count(), 0);
    }
}
