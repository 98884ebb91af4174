//! # Core Viewer Logic
//!
//! Joins the content collections and the layout index into per-verse
//! display records. It knows nothing about HTTP or HTML.
//!
//! ```text
//!   ContentStore ──┐
//!                  ├──► aggregate ──► view_model ──► web (HTML / JSON)
//!   LayoutIndex ───┘
//! ```
//!
//! ## Modules
//!
//! - [`config`]: layered settings, file → env → CLI
//! - [`library`]: the read-only dependencies built once at startup
//! - [`aggregate`]: words grouped into chapters and verses
//! - [`view_model`]: one display record per verse

pub mod aggregate;
pub mod config;
pub mod library;
pub mod view_model;

pub use library::{Library, StartupError};
pub use view_model::{TRANSLATION_PLACEHOLDER, ViewModel};
