//! # Ternary Diagrams
//!
//! Extracts three-component compositions from generated tables (or from a
//! concatenated long-form CSV) and renders them on a ternary diagram.
//!
//! ## Example
//!
//! ```no_run
//! use xrftab::export::load_long_csv;
//! use xrftab::ternary::{extract_from_records, find_system, render, PlotOptions};
//!
//! let system = find_system("CaO-Al2O3-SiO2").unwrap();
//! let records = load_long_csv("XRF_concatenated.csv")?;
//! let dataset = extract_from_records(system, &records);
//! render(&dataset, "cas.svg", &PlotOptions::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod extract;
mod plot;
mod systems;

#[cfg(test)]
mod tests;

pub use error::TernaryError;
pub use extract::{
    extract, extract_from_records, extract_from_tables, normalize, DataSource, SkipReason,
    SkippedSample, TernaryDataset, TernaryPoint,
};
pub use plot::{
    image_format, render, suggested_filename, title, GridStyle, ImageFormat, PlotOptions,
};
pub use systems::{available_systems, find_system, Component, TernarySystem, TERNARY_SYSTEMS};

/// Look a system up by name, failing with [`TernaryError::UnknownSystem`]
pub fn system(name: &str) -> Result<&'static TernarySystem, TernaryError> {
    find_system(name).ok_or_else(|| TernaryError::UnknownSystem(name.to_string()))
}
