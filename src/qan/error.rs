use std::path::PathBuf;

/// Errors that can occur while reading QAN files
#[derive(Debug, thiserror::Error)]
pub enum QanError {
    /// I/O error reading a file or directory
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The QAN file does not exist
    #[error("QAN file not found: {0}")]
    FileNotFound(PathBuf),

    /// The directory to scan does not exist
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// A concentration line has fewer than the four required fields
    #[error("expected at least 4 fields, found {0}")]
    TooFewFields(usize),

    /// The concentration field is not a number
    #[error("invalid concentration value '{0}'")]
    InvalidConcentration(String),

    /// The concentration is negative
    #[error("negative concentration {0}")]
    NegativeConcentration(f64),
}
