//! # XRF Folder Validation
//!
//! Checks an XRF data folder before tables are generated and collects the
//! results in a [`ValidationReport`].
//!
//! ## Validation Checklist
//!
//! 1. **Structure**: the folder exists and holds `.qan` files
//! 2. **QAN data**: files parse, lines are well-formed, concentrations are
//!    present and valid, sample IDs are unique
//! 3. **Project metadata**: `metadata.json` is complete and names a known
//!    instrument
//! 4. **Lookup table**: sample IDs and report abbreviations are unique and
//!    match the measured samples
//!
//! ## Usage
//!
//! ```rust,no_run
//! use xrftab::metadata::Settings;
//! use xrftab::validator::validate_folder;
//! use std::path::Path;
//!
//! match validate_folder(Path::new("Data/XRF"), &Settings::default()) {
//!     Ok(report) => println!("{}", report),
//!     Err(e) => eprintln!("Validation failed: {}", e),
//! }
//! ```

use std::path::Path;

use anyhow::Result;
use log::info;

use crate::metadata::Settings;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod data;
mod metadata;
mod report;
mod structure;

#[cfg(test)]
mod tests;

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The folder is missing or not a directory
    #[error("Structure error: {0}")]
    StructureError(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Main validation entry point.
///
/// Returns an error only when the folder itself is unusable; every other
/// problem is recorded in the report.
pub fn validate_folder(folder: &Path, settings: &Settings) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(folder.display().to_string());

    // 1. Structure
    let files = structure::check_structure(folder, &mut report)?;

    // 2. QAN data
    let samples = data::check_qan_data(&files, &mut report);

    // 3. Project metadata
    metadata::check_project_metadata(folder, settings, &mut report);

    // 4. Lookup table
    metadata::check_lookup(folder, &samples, &mut report);

    info!(
        "Validated {}: {} passed, {} warnings, {} failed",
        folder.display(),
        report.success_count(),
        report.warning_count(),
        report.failure_count()
    );
    Ok(report)
}
