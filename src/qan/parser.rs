use log::{debug, warn};
use std::path::{Path, PathBuf};

use super::{Measurement, QanError, QanFile, SkippedLine, Unit};

/// Read and parse a QAN file from disk.
///
/// Bytes that are not valid UTF-8 are decoded lossily; instrument software
/// occasionally writes Latin-1 sample names.
pub fn read_qan_file<P: AsRef<Path>>(path: P) -> Result<QanFile, QanError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(QanError::FileNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let mut qan = parse_qan_str(&content, &sample_id_from_filename(path));
    qan.path = Some(path.to_path_buf());

    if !qan.skipped.is_empty() {
        warn!(
            "{}: skipped {} malformed concentration line(s)",
            path.display(),
            qan.skipped.len()
        );
    }
    debug!(
        "Parsed {} ({} measurements, sample '{}')",
        path.display(),
        qan.measurements.len(),
        qan.sample_id
    );

    Ok(qan)
}

/// Parse QAN text.
///
/// `fallback_sample_id` is used when the text has no `S` line.
pub fn parse_qan_str(content: &str, fallback_sample_id: &str) -> QanFile {
    let mut qan = QanFile::default();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();

        if line.starts_with("S ") {
            if let Some(id) = line.split_whitespace().nth(1) {
                qan.sample_id = id.to_string();
            }
        } else if line.starts_with("C ") {
            match parse_concentration_line(line) {
                Ok(measurement) => qan.measurements.push(measurement),
                Err(e) => qan.skipped.push(SkippedLine {
                    line_number: idx + 1,
                    content: line.to_string(),
                    reason: e.to_string(),
                    negative_concentration: match e {
                        QanError::NegativeConcentration(value) => Some(value),
                        _ => None,
                    },
                }),
            }
        }
    }

    if qan.sample_id.is_empty() {
        qan.sample_id = fallback_sample_id.to_string();
    }

    qan
}

/// Parse a concentration (`C`) line.
///
/// Layout: `C <scan> <concentration> <unit> [<element> [<signal> ...]]`, e.g.
/// `C Na5   0.11242 %    Na          27.4968                     9000`.
/// Without an element column the symbol is the scan name minus trailing digits.
pub fn parse_concentration_line(line: &str) -> Result<Measurement, QanError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(QanError::TooFewFields(parts.len()));
    }

    let omnian_scan = parts[1];
    let concentration: f64 = parts[2]
        .parse()
        .map_err(|_| QanError::InvalidConcentration(parts[2].to_string()))?;
    if !concentration.is_finite() {
        return Err(QanError::InvalidConcentration(parts[2].to_string()));
    }
    if concentration < 0.0 {
        return Err(QanError::NegativeConcentration(concentration));
    }

    let unit = Unit::parse(parts[3]);
    let element = match parts.get(4) {
        Some(element) => element.to_string(),
        None => omnian_scan
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .to_string(),
    };
    let signal = parts.get(5).and_then(|s| s.parse::<f64>().ok());

    Ok(Measurement {
        element,
        omnian_scan: omnian_scan.to_string(),
        concentration,
        unit,
        signal,
    })
}

/// Sample ID derived from a file name (the stem)
pub fn sample_id_from_filename<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// List `.qan` files (case-insensitive extension) in a directory, sorted by path
pub fn find_qan_files<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>, QanError> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(QanError::DirectoryNotFound(directory.to_path_buf()));
    }

    debug!("Searching for .qan files in: {}", directory.display());

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        let is_qan = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("qan"))
            .unwrap_or(false);
        if is_qan && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}
