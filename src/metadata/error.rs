/// Errors that can occur during metadata processing
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// I/O error reading or writing a metadata file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error in the lookup table
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Missing required column in the lookup table
    #[error("Missing required lookup column: {0}")]
    MissingColumn(String),

    /// The same sample ID appears more than once in the lookup table
    #[error("Duplicate sample ID in lookup table: {0}")]
    DuplicateSample(String),

    /// Sample ID not present in the lookup table
    #[error("Unknown sample ID: {0}")]
    UnknownSample(String),

    /// Lookup field name not recognised
    #[error("Unknown lookup field: {0}")]
    UnknownField(String),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}
