use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::qan::find_qan_files;

use super::{ValidationCheck, ValidationError, ValidationReport};

/// Step 1: the folder exists and holds QAN files
pub(crate) fn check_structure(folder: &Path, report: &mut ValidationReport) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        report.add_check(ValidationCheck::failed(
            "Folder exists",
            format!("Folder does not exist: {}", folder.display()),
        ));
        anyhow::bail!(ValidationError::StructureError(format!(
            "Folder does not exist: {}",
            folder.display()
        )));
    }
    if !folder.is_dir() {
        report.add_check(ValidationCheck::failed(
            "Folder exists",
            format!("Not a directory: {}", folder.display()),
        ));
        anyhow::bail!(ValidationError::StructureError(format!(
            "Not a directory: {}",
            folder.display()
        )));
    }
    report.add_check(ValidationCheck::ok("Folder exists"));

    let files = find_qan_files(folder)?;
    if files.is_empty() {
        report.add_check(ValidationCheck::failed(
            "QAN files present",
            "No .qan files found",
        ));
    } else {
        report.add_check(ValidationCheck::ok(format!(
            "QAN files present ({})",
            files.len()
        )));
    }

    Ok(files)
}
