/// Errors that can occur while exporting tables
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reading or writing CSV data
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from the workbook writer
    #[error("Excel error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    /// A required column is absent from CSV input
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A cell could not be interpreted
    #[error("Invalid value '{value}' in row {row}")]
    InvalidValue {
        /// 1-based data row
        row: usize,
        /// The offending cell content
        value: String,
    },

    /// There is nothing to export
    #[error("Nothing to export: {0}")]
    Empty(String),
}
