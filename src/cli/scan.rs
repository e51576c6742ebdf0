use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use xrftab::qan::{find_qan_files, read_qan_file};
use xrftab::tables::{classify, ElementClass};

/// List the QAN files of a folder
pub fn run(folder: PathBuf) -> Result<()> {
    let files = find_qan_files(&folder)
        .with_context(|| format!("Failed to scan folder: {}", folder.display()))?;

    if files.is_empty() {
        anyhow::bail!("No .qan files found in {}", folder.display());
    }
    info!("Found {} QAN file(s) in {}", files.len(), folder.display());

    println!("QAN Files");
    println!("=========");
    println!("Folder: {}", folder.display());
    println!();
    println!(
        "{:<32} {:<16} {:>6} {:>6} {:>6} {:>8}",
        "File", "Sample ID", "Major", "Trace", "Other", "Skipped"
    );

    let mut problems = 0;
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match read_qan_file(path) {
            Ok(qan) => {
                let major = qan
                    .measurements
                    .iter()
                    .filter(|m| classify(m) == Some(ElementClass::Major))
                    .count();
                let trace = qan
                    .measurements
                    .iter()
                    .filter(|m| classify(m) == Some(ElementClass::Trace))
                    .count();
                let other = qan.measurements.len() - major - trace;
                println!(
                    "{:<32} {:<16} {:>6} {:>6} {:>6} {:>8}",
                    name,
                    qan.sample_id,
                    major,
                    trace,
                    other,
                    qan.skipped.len()
                );
                for skipped in &qan.skipped {
                    println!("    line {}: {} ({})", skipped.line_number, skipped.content, skipped.reason);
                }
            }
            Err(e) => {
                problems += 1;
                println!("{:<32} error: {}", name, e);
            }
        }
    }

    println!();
    println!("{} file(s), {} unreadable", files.len(), problems);
    Ok(())
}
