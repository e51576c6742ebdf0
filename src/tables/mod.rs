//! # Concentration Tables
//!
//! Derives report tables from parsed QAN samples. Each table is one
//! combination of:
//!
//! - **basis**: absolute (as measured) or relative (scaled to a 100 % total)
//! - **class**: major (> 0.1 % / 1000 ppm) or trace
//! - **species**: elements or their reporting oxides
//!
//! Rows are analytes sorted by atomic number followed by summary rows
//! (`Trace`, `Balance`, `Total`); columns are samples, labelled by report
//! abbreviation.
//!
//! ```rust,no_run
//! use xrftab::metadata::{LookupTable, ProjectMetadata, Settings};
//! use xrftab::tables::{process_folder, TableOptions};
//!
//! let folder = "Acme/Projects/42_Survey/Data/XRF";
//! let metadata = ProjectMetadata::load(folder);
//! let lookup = LookupTable::load(folder)?;
//! let processed = process_folder(folder, &metadata, &lookup, &Settings::default(), &TableOptions::default())?;
//! for table in processed.tables.iter() {
//!     println!("{}: {} analytes", table.kind.title(), table.analytes().len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod concentration;
mod element;
mod error;
mod options;
mod processor;
mod sample;


pub use concentration::{
    Basis, ConcentrationTable, RowKind, SampleColumn, Species, TableKind, TableRow,
};
pub use element::{
    classify, classify_value, convert_to_oxide, is_included, normalization_factor,
    total_weight_percent, ElementClass,
};
pub use error::TableError;
pub use options::{
    Rounding, TableOptions, DEFAULT_MAJOR_PRECISION, DEFAULT_MISSING_DATA,
    DEFAULT_TRACE_PRECISION,
};
pub use processor::{
    derive_table, generate_tables, load_samples, process_folder, GeneratedTables, ProcessedFolder,
    SampleFlag,
};
pub use sample::SampleData;
