//! # Table Export
//!
//! Output formats for generated tables:
//!
//! 1. **Excel workbook** (`.xlsx`): metadata sheet, lookup sheet and one
//!    formatted sheet per table ([`write_workbook`])
//!
//! 2. **Concatenated CSV**: the long-form interchange format with one row per
//!    sample and analyte ([`LongRecord`], [`melt_tables`], [`melt_samples`])
//!
//! 3. **Wide CSV**: a single table in report layout ([`write_table_csv`])

mod error;
mod excel;
mod long;
mod naming;
mod table_csv;

#[cfg(test)]
mod tests;

pub use error::ExportError;
pub use excel::{build_workbook, write_workbook};
pub use long::{
    load_long_csv, melt_samples, melt_tables, read_long_csv, save_long_csv, write_long_csv,
    LongRecord, LONG_COLUMNS,
};
pub use naming::{
    caption, default_csv_name, default_workbook_name, sheet_name, table_csv_name,
    DEFAULT_CSV_NAME, DEFAULT_WORKBOOK_NAME,
};
pub use table_csv::{format_value, read_table_csv, save_table_csvs, write_table_csv};
