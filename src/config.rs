//! Application configuration management.
//!
//! Settings are layered with figment, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory, or the file given with `--config`
//! 3. Environment variables prefixed with `DUPSCAN_` (e.g. `DUPSCAN_IO_THREADS=8`)
//! 4. Command-line flags (see [`Config::apply_scan_args`])
//!
//! # Example
//!
//! ```toml
//! io_threads = 8
//! algorithm = "blake3"
//! skip_hidden = true
//! ignore_patterns = ["*.tmp", "node_modules/"]
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{OutputFormat, ScanArgs};
use crate::duplicates::FinderConfig;
use crate::scanner::{HashAlgorithm, WalkerConfig};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DUPSCAN_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// A provider held a value of the wrong shape.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of hashing threads.
    pub io_threads: usize,
    /// Content digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Report format.
    pub output: OutputFormat,
    /// Descend into symbolically linked directories.
    pub follow_symlinks: bool,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Visit directory entries in name order.
    pub sort: bool,
    /// Honour the root's `.gitignore`.
    pub gitignore: bool,
    /// Gitignore-style patterns to skip.
    pub ignore_patterns: Vec<String>,
    /// Minimum file size in bytes.
    pub min_size: Option<u64>,
    /// Maximum file size in bytes.
    pub max_size: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io_threads: 4,
            algorithm: HashAlgorithm::default(),
            output: OutputFormat::default(),
            follow_symlinks: false,
            skip_hidden: false,
            sort: false,
            gitignore: false,
            ignore_patterns: Vec::new(),
            min_size: None,
            max_size: None,
        }
    }
}

impl Config {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// `path` overrides the platform default config file and must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit file is missing or any
    /// provider holds invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
        }

        let config: Self = Self::figment(path).extract()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Build the layered figment without extracting it.
    ///
    /// A missing default config file is simply skipped.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(file) => {
                log::debug!("Reading configuration from {}", file.display());
                figment = figment.merge(Toml::file(file));
            }
            None => log::debug!("No configuration directory available"),
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupscan", "dupscan")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line overrides on top of the loaded configuration.
    ///
    /// Flags only ever switch options on; unset options keep their
    /// configured value.
    pub fn apply_scan_args(&mut self, args: &ScanArgs) {
        if let Some(threads) = args.io_threads {
            self.io_threads = threads;
        }
        if let Some(algorithm) = args.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        if args.min_size.is_some() {
            self.min_size = args.min_size;
        }
        if args.max_size.is_some() {
            self.max_size = args.max_size;
        }
        self.follow_symlinks |= args.follow_symlinks;
        self.skip_hidden |= args.skip_hidden;
        self.sort |= args.sort;
        self.gitignore |= args.gitignore;
        self.ignore_patterns
            .extend(args.ignore_patterns.iter().cloned());
    }

    /// Walker options derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::default()
            .with_follow_symlinks(self.follow_symlinks)
            .with_skip_hidden(self.skip_hidden)
            .with_sort(self.sort)
            .with_gitignore(self.gitignore)
            .with_size_range(self.min_size, self.max_size)
            .with_ignore_patterns(self.ignore_patterns.clone())
    }

    /// Finder options derived from this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_io_threads(self.io_threads)
            .with_algorithm(self.algorithm)
            .with_walker_config(self.walker_config())
    }
}
