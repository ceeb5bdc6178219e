//! User-facing configuration.
//!
//! Settings are stored as TOML with kebab-case keys. Every field has a
//! default, so a partial file (or no file at all) is valid:
//!
//! ```toml
//! [navigation]
//! capacity = 8
//! title-capacity = 32
//!
//! [breadcrumb]
//! max-chars = 300
//! buffer-capacity = 512
//!
//! [logging]
//! enabled = true
//! level = "info"
//! max-files = 3
//! directory = "logs"
//! ```

use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_PATH: &str = "Settings.toml";

pub const DEFAULT_STACK_CAPACITY: usize = 8;
pub const DEFAULT_TITLE_CAPACITY: usize = 32;
pub const DEFAULT_BREADCRUMB_MAX_CHARS: usize = 300;
pub const DEFAULT_BREADCRUMB_BUFFER_CAPACITY: usize = 512;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub navigation: NavigationSettings,
    pub breadcrumb: BreadcrumbSettings,
    pub logging: LoggingSettings,
}

/// Sizing of the navigation stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct NavigationSettings {
    /// Maximum number of screens above the root.
    pub capacity: usize,
    /// Bytes reserved per title slot when the stack is built.
    pub title_capacity: usize,
}

/// Breadcrumb rendering limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct BreadcrumbSettings {
    /// Rendering stops after the first segment that pushes the breadcrumb
    /// past this many chars.
    pub max_chars: usize,
    /// Bytes reserved for the breadcrumb buffer when the renderer is built.
    pub buffer_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingSettings {
    pub enabled: bool,
    pub level: String,
    /// Number of run logs to keep; `0` keeps all of them.
    pub max_files: usize,
    pub directory: PathBuf,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        NavigationSettings {
            capacity: DEFAULT_STACK_CAPACITY,
            title_capacity: DEFAULT_TITLE_CAPACITY,
        }
    }
}

impl Default for BreadcrumbSettings {
    fn default() -> Self {
        BreadcrumbSettings {
            max_chars: DEFAULT_BREADCRUMB_MAX_CHARS,
            buffer_capacity: DEFAULT_BREADCRUMB_BUFFER_CAPACITY,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            enabled: true,
            level: "info".to_string(),
            max_files: 3,
            directory: PathBuf::from("logs"),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults.
    ///
    /// Never fails. A missing file is the normal first-run case; a file that
    /// can't be parsed is reported on stderr and ignored.
    ///
    /// Diagnostics go to stderr through `eprintln!` because tracing is only
    /// initialized once the logging settings have been read from here.
    pub fn load<P: AsRef<Path>>(path: P) -> Settings {
        let path = path.as_ref();

        if !path.exists() {
            eprintln!("No settings found at {}, using defaults", path.display());
            return Settings::default();
        }

        match crate::helpers::load_toml::<Settings, _>(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!(
                    "failed to load settings file {}: {:#}; using defaults",
                    path.display(),
                    e
                );
                Settings::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        crate::helpers::save_toml(self, path).context("failed to save settings file")?;

        tracing::info!(file_path = %path.display(), "Saved settings");

        Ok(())
    }
}
