//! # Project Metadata
//!
//! Everything stored next to the QAN files of a project, plus the laboratory
//! settings file.
//!
//! ## Files
//!
//! 1. **`metadata.json`**: project number and name, client, operator,
//!    instrument, sample type and date ([`ProjectMetadata`])
//!
//! 2. **`sample_lookup.csv`**: maps each instrument sample ID to a notebook ID,
//!    a client ID and the abbreviation used as its report column
//!    ([`LookupTable`])
//!
//! 3. **Settings JSON**: operators, instruments and their tube elements, sample
//!    types and missing-data placeholders ([`Settings`])
//!
//! When `metadata.json` is absent, client and project are recovered from the
//! folder layout `.../<Client>/Projects/<number>_<name>/Data/XRF`.

mod error;
mod lookup;
mod project;
mod settings;


pub use error::MetadataError;
pub use lookup::{LookupEntry, LookupTable, LOOKUP_COLUMNS, LOOKUP_FILE_NAME};
pub use project::{
    extract_project_info_from_path, PathProjectInfo, ProjectMetadata, METADATA_FILE_NAME,
    STANDARD_PELLET,
};
pub use settings::{InstrumentProfile, Settings, DEFAULT_MISSING_DATA_OPTIONS};
