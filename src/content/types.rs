use std::collections::HashMap;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Globally unique, corpus-wide word identifier. Valid ids start at 1.
pub type WordId = u32;

/// A single word of the text, exactly as it appears in the word-level source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Word {
    #[serde(rename = "surah", deserialize_with = "lenient_u32")]
    pub chapter: u32,
    #[serde(rename = "ayah", deserialize_with = "lenient_u32")]
    pub verse: u32,
    #[serde(rename = "id", deserialize_with = "lenient_u32")]
    pub word_id: WordId,
    pub text: String,
}

/// Chapter metadata entry. Both fields are optional in the source; the
/// chapter list renders `?` / `Unknown` for whatever is missing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ChapterMeta {
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub surah_number: Option<u32>,
    #[serde(default)]
    pub surah_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    #[serde(rename = "t")]
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AudioEntry {
    pub audio_url: String,
}

/// The words file is either a list of words or an object keyed by
/// `chapter:verse:position`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum WordsFile {
    List(Vec<Word>),
    Keyed(HashMap<String, Word>),
}

impl WordsFile {
    /// Word ids increase through the corpus, so sorting keyed entries by id
    /// restores reading order.
    pub(crate) fn into_words(self) -> Vec<Word> {
        match self {
            WordsFile::List(words) => words,
            WordsFile::Keyed(map) => {
                let mut words: Vec<Word> = map.into_values().collect();
                words.sort_by_key(|w| w.word_id);
                words
            }
        }
    }
}

/// The metadata file is either a list of entries or an object keyed by
/// chapter number.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum MetadataFile {
    List(Vec<ChapterMeta>),
    Keyed(HashMap<String, ChapterMeta>),
}

impl MetadataFile {
    /// Flattens either shape into a list ordered the way the chapter list
    /// should render it.
    pub(crate) fn into_entries(self) -> Vec<ChapterMeta> {
        match self {
            MetadataFile::List(entries) => entries,
            MetadataFile::Keyed(map) => {
                let mut entries: Vec<(Option<u32>, ChapterMeta)> = map
                    .into_iter()
                    .map(|(key, mut meta)| {
                        let key_number = key.trim().parse::<u32>().ok();
                        if meta.surah_number.is_none() {
                            meta.surah_number = key_number;
                        }
                        (meta.surah_number.or(key_number), meta)
                    })
                    .collect();
                // Entries without any number go last.
                entries.sort_by_key(|(n, _)| (n.is_none(), *n));
                entries.into_iter().map(|(_, meta)| meta).collect()
            }
        }
    }
}

/// Lookup key shared by the translation and audio collections.
pub fn verse_key(chapter: u32, verse: u32) -> String {
    format!("{chapter}:{verse}")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Int(u32),
    Text(String),
}

impl LenientNumber {
    fn into_u32<E: de::Error>(self) -> Result<u32, E> {
        match self {
            LenientNumber::Int(n) => Ok(n),
            LenientNumber::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a positive integer, got {s:?}"))),
        }
    }
}

/// Accepts `7` as well as `"7"`; the word sources are not consistent.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    LenientNumber::deserialize(deserializer)?.into_u32()
}

fn lenient_opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    match Option::<LenientNumber>::deserialize(deserializer)? {
        Some(n) => n.into_u32().map(Some),
        None => Ok(None),
    }
}
