use log::warn;
use serde::{Deserialize, Serialize};

use super::TableError;
use crate::metadata::STANDARD_PELLET;

/// Default rounding step of major tables (two decimals)
pub const DEFAULT_MAJOR_PRECISION: f64 = 0.01;

/// Default rounding step of trace tables (nearest 10 ppm)
pub const DEFAULT_TRACE_PRECISION: f64 = 10.0;

/// Default placeholder for missing cells
pub const DEFAULT_MISSING_DATA: &str = "---";

/// Rounding applied to every cell of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round to a number of decimal places
    Decimals(u32),
    /// Round to the nearest 10
    Tens,
    /// Round to the nearest integer
    Ones,
}

impl Rounding {
    /// Round a value
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Rounding::Decimals(d) => {
                let scale = 10f64.powi(*d as i32);
                (value * scale).round() / scale
            }
            Rounding::Tens => (value / 10.0).round() * 10.0,
            Rounding::Ones => value.round(),
        }
    }

    /// Decimal places shown when formatting rounded values
    pub fn decimals(&self) -> usize {
        match self {
            Rounding::Decimals(d) => *d as usize,
            Rounding::Tens | Rounding::Ones => 0,
        }
    }

    /// Rounding for a major-table step such as 0.1, 0.01 or 0.001
    pub fn from_major_step(step: f64) -> Result<Self, TableError> {
        if !step.is_finite() || step <= 0.0 || step > 1.0 {
            return Err(TableError::InvalidPrecision(step));
        }
        let decimals = (-step.log10()).round();
        if (10f64.powf(-decimals) - step).abs() > step * 1e-6 {
            return Err(TableError::InvalidPrecision(step));
        }
        Ok(Rounding::Decimals(decimals as u32))
    }

    /// Rounding for a trace-table step: 10 or 1
    pub fn from_trace_step(step: f64) -> Result<Self, TableError> {
        if step == 10.0 {
            Ok(Rounding::Tens)
        } else if step == 1.0 {
            Ok(Rounding::Ones)
        } else {
            Err(TableError::InvalidPrecision(step))
        }
    }
}

/// Which tables to generate and how to present them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Generate absolute (as measured) tables
    pub absolute: bool,
    /// Generate relative (normalized to 100 %) tables
    pub relative: bool,
    /// Generate major element tables
    pub major: bool,
    /// Generate trace element tables
    pub trace: bool,
    /// Also generate tables reported as oxides
    pub oxides: bool,
    /// Leave out the X-ray tube elements of the instrument
    pub ignore_tube_elements: bool,
    /// Rounding step of major tables (0.1, 0.01, 0.001, ...)
    pub major_precision: f64,
    /// Rounding step of trace tables (10 or 1)
    pub trace_precision: f64,
    /// Placeholder written for missing cells
    pub missing_data: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            absolute: true,
            relative: true,
            major: true,
            trace: true,
            oxides: true,
            ignore_tube_elements: true,
            major_precision: DEFAULT_MAJOR_PRECISION,
            trace_precision: DEFAULT_TRACE_PRECISION,
            missing_data: DEFAULT_MISSING_DATA.to_string(),
        }
    }
}

impl TableOptions {
    /// Check that at least one table can be produced and the precisions are usable
    pub fn validate(&self) -> Result<(), TableError> {
        if !self.absolute && !self.relative {
            return Err(TableError::NoBasisSelected);
        }
        if !self.major && !self.trace {
            return Err(TableError::NoClassSelected);
        }
        self.major_rounding()?;
        self.trace_rounding()?;
        Ok(())
    }

    /// Options adjusted to a sample type.
    ///
    /// Absolute concentrations are only meaningful for standard pellets; for
    /// any other type they are switched off.
    pub fn for_sample_type(&self, sample_type: &str) -> Self {
        let mut options = self.clone();
        if options.absolute && !sample_type.trim().eq_ignore_ascii_case(STANDARD_PELLET) {
            warn!(
                "Absolute tables are only available for '{}' samples, not '{}'; disabling them",
                STANDARD_PELLET, sample_type
            );
            options.absolute = false;
        }
        options
    }

    /// Rounding of major tables
    pub fn major_rounding(&self) -> Result<Rounding, TableError> {
        Rounding::from_major_step(self.major_precision)
    }

    /// Rounding of trace tables
    pub fn trace_rounding(&self) -> Result<Rounding, TableError> {
        Rounding::from_trace_step(self.trace_precision)
    }
}
