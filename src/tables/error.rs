use crate::metadata::MetadataError;
use crate::qan::QanError;

/// Errors that can occur while deriving concentration tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Neither absolute nor relative tables were requested
    #[error("No concentration basis selected: enable absolute and/or relative tables")]
    NoBasisSelected,

    /// Neither major nor trace tables were requested
    #[error("No element class selected: enable major and/or trace tables")]
    NoClassSelected,

    /// The options produced no table at all
    #[error("No tables were generated. Check the table options and the QAN data")]
    NoTablesGenerated,

    /// The folder contains no readable QAN sample
    #[error("No readable QAN files in {0}")]
    NoSamples(String),

    /// A rounding step that cannot be applied
    #[error("Invalid precision {0}: expected a power of ten")]
    InvalidPrecision(f64),

    /// Error reading QAN data
    #[error("QAN error: {0}")]
    QanError(#[from] QanError),

    /// Error reading project metadata or the lookup table
    #[error("Metadata error: {0}")]
    MetadataError(#[from] MetadataError),
}
