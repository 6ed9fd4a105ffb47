//! Configuration management for `mdserve.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── render     # [render]
//! │   ├── serve      # [serve]
//! │   └── watch      # [watch]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # MdserveConfig (this file)
//! ```
//!
//! The file is optional. It is taken from `--config`, or found by walking
//! upward from the document's directory. Without one, defaults apply.
//! CLI flags always override file values.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{RenderConfig, ServeConfig, WatchConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, compiler::markdown::MarkdownOptions, log, utils::path::normalize_path};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "mdserve.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing mdserve.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MdserveConfig {
    /// Path of the loaded config file, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Markdown rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// File watcher settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl MdserveConfig {
    /// Load configuration for serving `document`.
    ///
    /// `document` must already be validated; its directory is where the
    /// upward search for `mdserve.toml` starts.
    pub fn load(cli: &Cli, document: &Path) -> Result<Self> {
        let mut config = match Self::resolve_config_path(cli, document)? {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => Self::default(),
        };

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config file: explicit `--config` must exist,
    /// the searched default may be absent.
    fn resolve_config_path(cli: &Cli, document: &Path) -> Result<Option<PathBuf>> {
        if let Some(path) = &cli.config {
            if !path.is_file() {
                return Err(ConfigError::Validation(format!(
                    "config file `{}` not found",
                    path.display()
                ))
                .into());
            }
            return Ok(Some(normalize_path(path)));
        }

        let start = document.parent().unwrap_or(Path::new("."));
        Ok(find_config_file(start, Path::new(CONFIG_FILE)))
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {field}");
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI overrides on top of file values.
    fn apply_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.serve.interface, cli.interface.as_ref());
        Self::update_option(&mut self.serve.port, cli.port.as_ref());
        Self::update_option(&mut self.serve.watch, cli.watch.as_ref());
        if cli.no_open {
            self.serve.open = false;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, reporting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.serve.validate(&mut diag);
        self.render.validate(&mut diag);
        self.watch.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Renderer options derived from `[render]`.
    pub fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions::from_config(&self.render)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config content.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> MdserveConfig {
    let (parsed, ignored) = MdserveConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
