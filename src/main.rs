//! # xrftab
//!
//! Command-line front end for XRF concentration tables.
//!
//! ## Usage
//!
//! ```bash
//! # Check a data folder
//! xrftab validate Acme/Projects/42_Ridge/Data/XRF
//!
//! # Fill in project metadata and report labels
//! xrftab metadata Data/XRF --set operator=JD --set instrument=Zetium
//! xrftab lookup Data/XRF --set BAS-01:report_abbreviation=B1
//!
//! # Workbook, per-table CSVs and the concatenated CSV
//! xrftab tables Data/XRF --format both
//!
//! # Ternary diagram from the concatenated CSV
//! xrftab ternary --from-csv Data/XRF/42_Ridge_XRF_concatenated.csv -s "CaO-Al2O3-SiO2" -o cas.svg
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
