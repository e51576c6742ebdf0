//! # xrftab - XRF Concentration Tables
//!
//! `xrftab` turns the per-sample QAN reports of an X-ray fluorescence
//! spectrometer into the concentration tables of a laboratory report, and
//! draws ternary composition diagrams from them.
//!
//! ## Key Features
//!
//! - **QAN parsing**: tolerant reader for instrument `S`/`C` records; malformed
//!   concentration lines are skipped and reported, never fatal.
//!
//! - **Eight table kinds**: absolute or relative (normalized to 100 %), major or
//!   trace, reported as elements or as oxides, each with Trace/Balance/Total
//!   summary rows.
//!
//! - **Report exports**: an Excel workbook with metadata and lookup sheets, one
//!   CSV per table and a concatenated long-form CSV.
//!
//! - **Ternary diagrams**: five built-in systems, normalized to 100 and drawn
//!   as PNG, SVG or PDF.
//!
//! - **Folder validation**: a pass/warn/fail report before anything is
//!   generated.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xrftab::prelude::*;
//!
//! let folder = "Acme/Projects/42_Ridge/Data/XRF";
//! let metadata = ProjectMetadata::load(folder);
//! let lookup = LookupTable::load(folder)?;
//! let settings = Settings::default();
//!
//! let processed = process_folder(folder, &metadata, &lookup, &settings, &TableOptions::default())?;
//! write_workbook("XRF_Tables.xlsx", &processed.tables, &metadata, &lookup, "---")?;
//! save_long_csv(&melt_tables(&processed.tables, &lookup), "XRF_concatenated.csv")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Folder Layout
//!
//! ```text
//! <Client>/Projects/<number>_<name>/Data/XRF/
//! ├── *.qan                 # One report per measured sample
//! ├── metadata.json         # Project metadata (optional)
//! └── sample_lookup.csv     # Sample ID → notebook/client ID, report label (optional)
//! ```
//!
//! ## Architecture
//!
//! - [`chemistry`]: atomic numbers and oxide conversion factors
//! - [`qan`]: QAN file parsing
//! - [`metadata`]: project metadata, sample lookup table, instrument settings
//! - [`tables`]: table derivation, normalization and rounding
//! - [`export`]: Excel, per-table CSV and long-form CSV output
//! - [`ternary`]: ternary extraction and diagram rendering
//! - [`validator`]: folder validation report

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

pub mod chemistry;
pub mod export;
pub mod metadata;
pub mod qan;
pub mod tables;
pub mod ternary;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::export::{
        load_long_csv, melt_samples, melt_tables, save_long_csv, save_table_csvs, write_workbook,
        ExportError, LongRecord,
    };
    pub use crate::metadata::{LookupEntry, LookupTable, MetadataError, ProjectMetadata, Settings};
    pub use crate::qan::{find_qan_files, read_qan_file, Measurement, QanError, QanFile, Unit};
    pub use crate::tables::{
        generate_tables, process_folder, ConcentrationTable, GeneratedTables, SampleData,
        TableError, TableKind, TableOptions,
    };
    pub use crate::ternary::{
        extract, extract_from_records, find_system, render, PlotOptions, TernaryDataset,
        TernaryError, TernarySystem,
    };
    pub use crate::validator::{validate_folder, ValidationReport};
}
