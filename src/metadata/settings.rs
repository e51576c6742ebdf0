//! Laboratory settings file (JSON).
//!
//! ```json
//! {
//!   "operators": ["A. Analyst"],
//!   "instruments": {
//!     "Epsilon 4": { "tube_elements": ["Ag"] }
//!   },
//!   "sample_types": ["standard pellet", "loose powder"],
//!   "missing_data_options": ["---", "na", "ND", "BDL"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::MetadataError;

/// Default choices for the missing-data placeholder
pub const DEFAULT_MISSING_DATA_OPTIONS: [&str; 4] = ["---", "na", "ND", "BDL"];

/// Per-instrument settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentProfile {
    /// Elements emitted by the X-ray tube anode
    pub tube_elements: Vec<String>,
}

/// Operators, instruments and sample types known to the laboratory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Instrument operators
    pub operators: Vec<String>,
    /// Instruments by name
    pub instruments: BTreeMap<String, InstrumentProfile>,
    /// Sample preparation types
    pub sample_types: Vec<String>,
    /// Allowed placeholders for missing table cells
    pub missing_data_options: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            operators: Vec::new(),
            instruments: BTreeMap::new(),
            sample_types: vec![super::STANDARD_PELLET.to_string()],
            missing_data_options: DEFAULT_MISSING_DATA_OPTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MetadataError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Tube elements of an instrument (empty for unknown instruments)
    pub fn tube_elements(&self, instrument: &str) -> &[String] {
        self.instruments
            .get(instrument)
            .map(|profile| profile.tube_elements.as_slice())
            .unwrap_or(&[])
    }

    /// Whether an instrument is listed
    pub fn knows_instrument(&self, instrument: &str) -> bool {
        self.instruments.contains_key(instrument)
    }
}
