//! # Content Store
//!
//! The four read-only collections the viewer renders from: words,
//! translations, chapter metadata and audio recitation URLs.
//!
//! Words and metadata are required. Translations and audio are optional:
//! a source that is missing or corrupt degrades to an empty collection and
//! a warning in the log. A single malformed entry in an optional source is
//! dropped on its own.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::types::{
    AudioEntry, ChapterMeta, MetadataFile, Translation, Word, WordsFile, verse_key,
};

/// Where each collection is read from.
#[derive(Debug, Clone)]
pub struct ContentSources {
    pub words: PathBuf,
    pub translations: PathBuf,
    pub metadata: PathBuf,
    pub audio: PathBuf,
}

#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            LoadError::Parse { path, source } => {
                write!(f, "cannot parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    words: Vec<Word>,
    translations: HashMap<String, Translation>,
    audio: HashMap<String, AudioEntry>,
    chapters: Vec<ChapterMeta>,
}

impl ContentStore {
    /// Loads all four sources. Fails only when words or metadata can't be
    /// read or parsed.
    pub fn load(sources: &ContentSources) -> Result<Self, LoadError> {
        let words = read_json::<WordsFile>(&sources.words)?.into_words();
        info!("Loaded {} words from {}", words.len(), sources.words.display());

        let metadata: MetadataFile = read_json(&sources.metadata)?;
        let chapters = metadata.into_entries();
        info!(
            "Loaded {} chapter entries from {}",
            chapters.len(),
            sources.metadata.display()
        );

        let translations = read_optional(&sources.translations, "translations");
        let audio = read_optional(&sources.audio, "audio");

        Ok(Self::from_parts(words, translations, audio, chapters))
    }

    /// Assembles a store from already-parsed collections.
    pub fn from_parts(
        words: Vec<Word>,
        translations: HashMap<String, Translation>,
        audio: HashMap<String, AudioEntry>,
        chapters: Vec<ChapterMeta>,
    ) -> Self {
        Self {
            words,
            translations,
            audio,
            chapters,
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Chapter metadata in the order the chapter list renders it.
    pub fn chapters(&self) -> &[ChapterMeta] {
        &self.chapters
    }

    pub fn get_translation(&self, chapter: u32, verse: u32) -> Option<&str> {
        self.translations
            .get(&verse_key(chapter, verse))
            .map(|t| t.text.as_str())
    }

    pub fn get_audio_url(&self, chapter: u32, verse: u32) -> Option<&str> {
        self.audio
            .get(&verse_key(chapter, verse))
            .map(|a| a.audio_url.as_str())
    }

    pub fn get_chapter_name(&self, chapter: u32) -> Option<&str> {
        self.chapters
            .iter()
            .find(|meta| meta.surah_number == Some(chapter))
            .and_then(|meta| meta.surah_name.as_deref())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an optional keyed collection, falling back to empty when the file
/// can't be read or isn't a JSON object. Entries that don't decode are
/// skipped individually.
fn read_optional<V: DeserializeOwned>(path: &Path, label: &str) -> HashMap<String, V> {
    let raw = match read_json::<HashMap<String, serde_json::Value>>(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("No {label} available, continuing without them: {e}");
            debug!("{label} source error: {e:?}");
            return HashMap::new();
        }
    };

    let total = raw.len();
    let map: HashMap<String, V> = raw
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(entry) => Some((key, entry)),
            Err(e) => {
                warn!("Skipping malformed {label} entry {key:?}: {e}");
                None
            }
        })
        .collect();
    if map.len() < total {
        warn!(
            "Dropped {} of {total} {label} entries from {}",
            total - map.len(),
            path.display()
        );
    }
    info!("Loaded {} {} entries from {}", map.len(), label, path.display());
    map
}
