//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every run can live in a
//! config file. Command-line flags take precedence:
//!
//! ```toml
//! # xrftab.toml
//! [tables]
//! relative = true
//! oxides = false
//! major_precision = 0.001
//! trace_precision = 1
//! missing_data = "ND"
//! settings = "lab_settings.json"
//!
//! [ternary]
//! grid_style = "gray_on_white"
//! marker_size = 8
//! show_labels = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use xrftab::tables::TableOptions;
use xrftab::ternary::{GridStyle, PlotOptions};

/// Root configuration structure for xrftab.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Table generation settings.
    #[serde(default)]
    pub tables: TablesConfig,

    /// Ternary diagram settings.
    #[serde(default)]
    pub ternary: TernaryConfig,
}

/// Configuration for the tables command.
#[derive(Debug, Default, Deserialize)]
pub struct TablesConfig {
    pub absolute: Option<bool>,
    pub relative: Option<bool>,
    pub major: Option<bool>,
    pub trace: Option<bool>,
    pub oxides: Option<bool>,
    pub ignore_tube_elements: Option<bool>,

    /// Rounding step of major tables (0.1, 0.01, ...).
    pub major_precision: Option<f64>,

    /// Rounding step of trace tables (10 or 1).
    pub trace_precision: Option<f64>,

    /// Placeholder for missing cells.
    pub missing_data: Option<String>,

    /// Instrument settings JSON file.
    pub settings: Option<PathBuf>,
}

/// Configuration for the ternary command.
#[derive(Debug, Default, Deserialize)]
pub struct TernaryConfig {
    pub grid_style: Option<GridStyle>,
    pub marker_size: Option<u32>,
    pub show_labels: Option<bool>,
    pub caption: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file when one was given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

impl TablesConfig {
    /// Apply the configured values on top of `options`.
    pub fn apply(&self, options: &mut TableOptions) {
        let flags = [
            (self.absolute, &mut options.absolute),
            (self.relative, &mut options.relative),
            (self.major, &mut options.major),
            (self.trace, &mut options.trace),
            (self.oxides, &mut options.oxides),
            (self.ignore_tube_elements, &mut options.ignore_tube_elements),
        ];
        for (value, slot) in flags {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(step) = self.major_precision {
            options.major_precision = step;
        }
        if let Some(step) = self.trace_precision {
            options.trace_precision = step;
        }
        if let Some(missing) = &self.missing_data {
            options.missing_data = missing.clone();
        }
    }
}

impl TernaryConfig {
    /// Apply the configured values on top of `options`.
    pub fn apply(&self, options: &mut PlotOptions) {
        if let Some(style) = self.grid_style {
            options.grid_style = style;
        }
        if let Some(size) = self.marker_size {
            options.marker_size = size;
        }
        if let Some(show) = self.show_labels {
            options.show_labels = show;
        }
        if self.caption.is_some() {
            options.caption = self.caption.clone();
        }
    }
}
