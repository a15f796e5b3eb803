//! Runtime configuration for `retheme`.
//!
//! [`Config`] is resolved once per invocation, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. the TOML file named by `--config` or `RETHEME_CONFIG`
//! 3. `RETHEME_STORE` and `RETHEME_FORMAT`
//! 4. explicit flags
//!
//! Clap already folds the environment into the parsed flags, so the merge
//! here only has to layer the parsed values over the file.

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::{Cli, ColorMode, Command, ReportFormat};

/// Default location of the persisted style-key list.
pub const DEFAULT_STORE: &str = ".retheme-keys.json";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Key store path.
    pub store: PathBuf,
    /// Report format.
    pub format: ReportFormat,
    /// Color output mode.
    pub color: ColorMode,
    /// Log verbosity level (0=warn, 1=info, 2=debug, 3+=trace).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: PathBuf::from(DEFAULT_STORE),
            format: ReportFormat::Text,
            color: ColorMode::Auto,
            verbosity: 0,
        }
    }
}

/// Contents of a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub store: Option<PathBuf>,
    pub format: Option<ReportFormat>,
    pub color: Option<ColorMode>,
    pub verbosity: Option<u8>,
}

impl FileConfig {
    /// Reads a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Config {
    /// Resolves the configuration for this invocation, reading the config
    /// file if one was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::from_cli(cli, file))
    }

    /// Layers parsed arguments over a config file and the defaults.
    pub fn from_cli(cli: &Cli, file: FileConfig) -> Self {
        let defaults = Self::default();
        let (store, format) = match &cli.command {
            Command::Apply(args) => (args.store.clone(), args.format),
            Command::Sync(args) => (args.store.clone(), None),
            Command::Check(_) => (None, None),
        };

        Self {
            store: store.or(file.store).unwrap_or(defaults.store),
            format: format.or(file.format).unwrap_or(defaults.format),
            color: cli.color.or(file.color).unwrap_or(defaults.color),
            verbosity: if cli.verbose > 0 {
                cli.verbose
            } else {
                file.verbosity.unwrap_or(defaults.verbosity)
            },
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the store path names a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.is_dir() {
            return Err(ConfigError::StoreIsDirectory(self.store.clone()));
        }
        Ok(())
    }

    /// Check if the report should be colored.
    pub fn use_color(&self) -> bool {
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid.
    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The store path is a directory.
    #[error("Key store path is a directory: {}", .0.display())]
    StoreIsDirectory(PathBuf),
}
