//! # QAN File Parsing
//!
//! QAN files are the per-sample text reports written by the XRF instrument
//! software. Only two record types matter here:
//!
//! - `S <sample id> ...` names the sample
//! - `C <scan> <concentration> <unit> [<element> [<signal> ...]]` reports one
//!   element concentration
//!
//! Every other line is ignored. Malformed `C` lines are skipped and kept in
//! [`QanFile::skipped`] so callers can report them.
//!
//! ```rust,no_run
//! use xrftab::qan::{find_qan_files, read_qan_file};
//!
//! for path in find_qan_files("Data/XRF")? {
//!     let qan = read_qan_file(&path)?;
//!     println!("{}: {} measurements", qan.sample_id, qan.measurements.len());
//! }
//! # Ok::<(), xrftab::qan::QanError>(())
//! ```

mod error;
mod parser;
mod types;


pub use error::QanError;
pub use parser::{
    find_qan_files, parse_concentration_line, parse_qan_str, read_qan_file,
    sample_id_from_filename,
};
pub use types::{Measurement, QanFile, SkippedLine, Unit};
