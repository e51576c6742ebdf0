/// Errors that can occur while extracting or rendering ternary data
#[derive(Debug, thiserror::Error)]
pub enum TernaryError {
    /// The requested system is not one of the supported systems
    #[error("Unknown ternary system: {0}")]
    UnknownSystem(String),

    /// No sample has a complete, positive triple
    #[error("No ternary data available for {0}")]
    NoData(String),

    /// Error from the drawing backend
    #[error("Drawing error: {0}")]
    DrawingError(String),

    /// Error encoding a raster image
    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error writing CSV data
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
