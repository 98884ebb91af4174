pub mod store;
pub mod types;

pub use store::{ContentSources, ContentStore, LoadError};
pub use types::{AudioEntry, ChapterMeta, Translation, Word, WordId, verse_key};
