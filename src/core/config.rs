//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.mushaf/config.toml` unless `--config` points
//! elsewhere. If the default file is missing on first run, a commented-out
//! default is generated so users can discover all options.
//!
//! Every data path is resolved against `data.dir`; absolute paths are used
//! as-is.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::LayoutBackend;
use crate::content::ContentSources;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MushafConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub addr: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DataConfig {
    pub dir: Option<PathBuf>,
    pub words: Option<PathBuf>,
    pub translations: Option<PathBuf>,
    pub metadata: Option<PathBuf>,
    pub audio: Option<PathBuf>,
    pub pages_dir: Option<PathBuf>,
    pub page_image_ext: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LayoutConfig {
    pub database: Option<PathBuf>,
    pub backend: Option<LayoutBackend>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_WORDS_FILE: &str = "data/indopak.json";
pub const DEFAULT_TRANSLATIONS_FILE: &str = "data/translations.json";
pub const DEFAULT_METADATA_FILE: &str = "data/metadata.json";
pub const DEFAULT_AUDIO_FILE: &str = "audio/ayah-recitation-abdur-rahman-as-sudais-recitation.json";
pub const DEFAULT_LAYOUT_DB: &str = "data/qudratullah-indopak-15-lines.db";
pub const DEFAULT_PAGES_DIR: &str = "pages";
pub const DEFAULT_PAGE_IMAGE_EXT: &str = "png";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub addr: String,
    pub sources: ContentSources,
    pub layout_db: PathBuf,
    pub layout_backend: LayoutBackend,
    pub pages_dir: PathBuf,
    pub page_image_ext: String,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
    /// Problems found while resolving, to be logged once logging starts.
    pub notices: Vec<ConfigNotice>,
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub addr: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub layout_backend: Option<LayoutBackend>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "config I/O error ({}): {e}", path.display()),
            ConfigError::Parse(path, e) => {
                write!(f, "config parse error ({}): {e}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Notices
// ============================================================================

/// Something worth logging that happened while loading or resolving config.
///
/// Config is read before the logger exists (the logger's level and file
/// come from config), so these are collected and emitted by the caller once
/// logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigNotice {
    NoHomeDir,
    GeneratedDefault(PathBuf),
    DefaultWriteFailed(PathBuf, String),
    Loaded(PathBuf),
    UnknownLogLevel(String),
}

impl ConfigNotice {
    pub fn log(&self) {
        match self {
            ConfigNotice::NoHomeDir => {
                warn!("Could not determine home directory, using default config")
            }
            ConfigNotice::GeneratedDefault(path) => {
                info!("No config file found, generated default at {}", path.display())
            }
            ConfigNotice::DefaultWriteFailed(path, e) => {
                warn!("Failed to write default config to {}: {e}", path.display())
            }
            ConfigNotice::Loaded(path) => info!("Loaded config from {}", path.display()),
            ConfigNotice::UnknownLogLevel(name) => {
                warn!("Unknown log level {name:?}, using {DEFAULT_LOG_LEVEL}")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: MushafConfig,
    pub notices: Vec<ConfigNotice>,
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.mushaf/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".mushaf").join("config.toml"))
}

/// Load config from an explicit path, or from `~/.mushaf/config.toml`.
///
/// An explicit path must exist. The default path is created with a
/// commented-out template when missing, and `MushafConfig::default()` is
/// returned.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    match explicit {
        Some(path) => load_existing(path),
        None => match config_path() {
            Some(path) => load_or_generate(&path),
            None => Ok(LoadedConfig {
                config: MushafConfig::default(),
                notices: vec![ConfigNotice::NoHomeDir],
            }),
        },
    }
}

fn load_or_generate(path: &Path) -> Result<LoadedConfig, ConfigError> {
    if path.exists() {
        return load_existing(path);
    }
    let notice = match generate_default_config(path) {
        Ok(()) => ConfigNotice::GeneratedDefault(path.to_path_buf()),
        Err(e) => ConfigNotice::DefaultWriteFailed(path.to_path_buf(), e.to_string()),
    };
    Ok(LoadedConfig {
        config: MushafConfig::default(),
        notices: vec![notice],
    })
}

fn load_existing(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    let config = parse_config(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    Ok(LoadedConfig {
        config,
        notices: vec![ConfigNotice::Loaded(path.to_path_buf())],
    })
}

pub fn parse_config(contents: &str) -> Result<MushafConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    let default_content = r#"# Mushaf Viewer Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# addr = "127.0.0.1:8080"            # Or set MUSHAF_ADDR

# [data]
# dir = "."                          # Or set MUSHAF_DATA_DIR; other paths are relative to it
# words = "data/indopak.json"
# translations = "data/translations.json"
# metadata = "data/metadata.json"
# audio = "audio/ayah-recitation-abdur-rahman-as-sudais-recitation.json"
# pages_dir = "pages"
# page_image_ext = "png"

# [layout]
# database = "data/qudratullah-indopak-15-lines.db"   # Or set MUSHAF_LAYOUT_DB
# backend = "memory"                 # "memory" or "sqlite"

# [logging]
# level = "info"                     # Or set MUSHAF_LOG_LEVEL
# file = "mushaf.log"
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Environment lookup backed by the real process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `env` looks up `MUSHAF_*` variables; pass [`process_env`] outside tests.
pub fn resolve(
    config: &MushafConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let mut notices = Vec::new();

    // Address: CLI → env → config → default
    let addr = cli
        .addr
        .clone()
        .or_else(|| env("MUSHAF_ADDR"))
        .or_else(|| config.server.addr.clone())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    // Data directory: CLI → env → config → default
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| env("MUSHAF_DATA_DIR").map(PathBuf::from))
        .or_else(|| config.data.dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let data_path = |configured: &Option<PathBuf>, default: &str| {
        data_dir.join(configured.as_deref().unwrap_or(Path::new(default)))
    };

    // Layout DB: env → config → default
    let layout_db = env("MUSHAF_LAYOUT_DB")
        .map(|p| data_dir.join(p))
        .unwrap_or_else(|| data_path(&config.layout.database, DEFAULT_LAYOUT_DB));

    let layout_backend = cli
        .layout_backend
        .or(config.layout.backend)
        .unwrap_or_default();

    let level_name = env("MUSHAF_LOG_LEVEL").or_else(|| config.logging.level.clone());
    let log_level = match level_name {
        Some(name) => name.parse().unwrap_or_else(|_| {
            notices.push(ConfigNotice::UnknownLogLevel(name));
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    };

    ResolvedConfig {
        addr,
        sources: ContentSources {
            words: data_path(&config.data.words, DEFAULT_WORDS_FILE),
            translations: data_path(&config.data.translations, DEFAULT_TRANSLATIONS_FILE),
            metadata: data_path(&config.data.metadata, DEFAULT_METADATA_FILE),
            audio: data_path(&config.data.audio, DEFAULT_AUDIO_FILE),
        },
        layout_db,
        layout_backend,
        pages_dir: data_path(&config.data.pages_dir, DEFAULT_PAGES_DIR),
        page_image_ext: config
            .data
            .page_image_ext
            .clone()
            .unwrap_or_else(|| DEFAULT_PAGE_IMAGE_EXT.to_string()),
        log_level,
        log_file: config.logging.file.clone(),
        notices,
    }
}
