use std::fmt;
use std::path::PathBuf;

use crate::chemistry::PPM_TO_PERCENT;

/// Unit column of a concentration line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Weight percent (`%`)
    Percent,
    /// Parts per million (`ppm`)
    Ppm,
    /// Raw count rate (`kcps`), not a concentration
    Kcps,
    /// Any other unit token reported by the instrument
    Other(String),
}

impl Unit {
    /// Parse a unit token
    pub fn parse(token: &str) -> Self {
        match token {
            "%" => Unit::Percent,
            "ppm" => Unit::Ppm,
            "kcps" => Unit::Kcps,
            other => Unit::Other(other.to_string()),
        }
    }

    /// Unit token as written in the file
    pub fn as_str(&self) -> &str {
        match self {
            Unit::Percent => "%",
            Unit::Ppm => "ppm",
            Unit::Kcps => "kcps",
            Unit::Other(s) => s,
        }
    }

    /// Whether values in this unit are mass concentrations
    pub fn is_concentration(&self) -> bool {
        matches!(self, Unit::Percent | Unit::Ppm)
    }

    /// Convert a value in this unit to weight percent
    pub fn to_percent(&self, value: f64) -> Option<f64> {
        match self {
            Unit::Percent => Some(value),
            Unit::Ppm => Some(value * PPM_TO_PERCENT),
            _ => None,
        }
    }

    /// Convert a weight percent back into this unit
    pub fn from_percent(&self, percent: f64) -> Option<f64> {
        match self {
            Unit::Percent => Some(percent),
            Unit::Ppm => Some(percent / PPM_TO_PERCENT),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single element measurement from a `C` line
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Element symbol (e.g. "Na")
    pub element: String,
    /// Omnian scan name (e.g. "Na5")
    pub omnian_scan: String,
    /// Reported concentration in `unit`
    pub concentration: f64,
    /// Reporting unit
    pub unit: Unit,
    /// Measured signal, when the line carries one
    pub signal: Option<f64>,
}

impl Measurement {
    /// Concentration in weight percent, `None` for non-concentration units
    pub fn weight_percent(&self) -> Option<f64> {
        self.unit.to_percent(self.concentration)
    }
}

/// A line that could not be interpreted and was left out
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number in the file
    pub line_number: usize,
    /// The trimmed line content
    pub content: String,
    /// Why the line was skipped
    pub reason: String,
    /// The rejected value when the concentration was negative
    pub negative_concentration: Option<f64>,
}

/// Parsed contents of one QAN file
#[derive(Debug, Clone, Default)]
pub struct QanFile {
    /// Source path, if the file was read from disk
    pub path: Option<PathBuf>,
    /// Sample identifier from the `S` line (or the file stem)
    pub sample_id: String,
    /// Concentration measurements in file order
    pub measurements: Vec<Measurement>,
    /// Malformed concentration lines
    pub skipped: Vec<SkippedLine>,
}

impl QanFile {
    /// Measurements reported as mass concentrations (`%` or `ppm`)
    pub fn concentrations(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements.iter().filter(|m| m.unit.is_concentration())
    }

    /// Whether the file carried any usable concentration data
    pub fn has_concentrations(&self) -> bool {
        self.concentrations().next().is_some()
    }
}
