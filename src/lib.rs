//! Mushaf viewer library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod content;
pub mod core;
pub mod layout;
pub mod web;

#[cfg(test)]
pub mod test_support;

/// How page/line lookups are answered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutBackend {
    /// Load every ayah range at startup and binary search in memory.
    #[default]
    Memory,
    /// Run one range query per lookup against the open database.
    Sqlite,
}
