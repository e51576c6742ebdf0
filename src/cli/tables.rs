use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

use xrftab::export::{
    default_csv_name, default_workbook_name, melt_samples, melt_tables, save_long_csv,
    save_table_csvs, write_workbook,
};
use xrftab::metadata::{LookupTable, ProjectMetadata, Settings};
use xrftab::tables::{process_folder, ProcessedFolder, TableOptions};

use super::config::Config;
use super::{load_settings, OutputFormat, TableFlags};

impl TableFlags {
    /// Apply the flags on top of `options`
    fn apply(&self, options: &mut TableOptions) {
        if self.no_absolute {
            options.absolute = false;
        }
        if self.no_relative {
            options.relative = false;
        }
        if self.no_major {
            options.major = false;
        }
        if self.no_trace {
            options.trace = false;
        }
        if self.no_oxides {
            options.oxides = false;
        }
        if self.keep_tube_elements {
            options.ignore_tube_elements = false;
        }
        if let Some(step) = self.major_precision {
            options.major_precision = step;
        }
        if let Some(step) = self.trace_precision {
            options.trace_precision = step;
        }
        if let Some(missing) = &self.missing_data {
            options.missing_data = missing.clone();
        }
    }
}

/// Folder contents turned into tables
pub(crate) struct Project {
    pub metadata: ProjectMetadata,
    pub lookup: LookupTable,
    pub processed: ProcessedFolder,
}

/// Load metadata and lookup data, then generate the tables of a folder
pub(crate) fn load_project(folder: &Path, settings: &Settings, options: &TableOptions) -> Result<Project> {
    if !folder.is_dir() {
        anyhow::bail!("Folder does not exist: {}", folder.display());
    }

    let metadata = ProjectMetadata::load(folder);
    let missing = metadata.missing_fields();
    if !missing.is_empty() {
        warn!("Project metadata is incomplete: {}", missing.join(", "));
    }
    let lookup = LookupTable::load(folder).context("Failed to read the sample lookup table")?;

    let processed = process_folder(folder, &metadata, &lookup, settings, options)
        .with_context(|| format!("Failed to process {}", folder.display()))?;

    for (path, error) in &processed.failed_files {
        warn!("Skipped {}: {}", path.display(), error);
    }
    for flag in &processed.tables.flags {
        warn!("Sample {}: {}", flag.sample_id, flag.reason);
    }

    Ok(Project {
        metadata,
        lookup,
        processed,
    })
}

/// Generate tables and write them to disk
pub fn run(
    folder: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    settings: Option<PathBuf>,
    config: Option<PathBuf>,
    raw: bool,
    flags: TableFlags,
) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let settings = load_settings(settings.as_deref().or(config.tables.settings.as_deref()))?;

    let mut options = TableOptions::default();
    config.tables.apply(&mut options);
    flags.apply(&mut options);
    options.validate().context("Invalid table options")?;

    let project = load_project(&folder, &settings, &options)?;
    let tables = &project.processed.tables;
    let missing_data = project.processed.options.missing_data.as_str();

    let output = output.unwrap_or_else(|| folder.clone());
    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let mut written = Vec::new();
    if matches!(format, OutputFormat::Xlsx | OutputFormat::Both) {
        let path = output.join(default_workbook_name(&project.metadata));
        write_workbook(&path, tables, &project.metadata, &project.lookup, missing_data)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    if matches!(format, OutputFormat::Csv | OutputFormat::Both) {
        let paths = save_table_csvs(tables, &output, missing_data)
            .context("Failed to write table CSV files")?;
        written.extend(paths);
    }

    let records = if raw {
        melt_samples(&project.processed.samples)
    } else {
        melt_tables(tables, &project.lookup)
    };
    let csv_path = output.join(default_csv_name(&project.metadata));
    save_long_csv(&records, &csv_path)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;
    written.push(csv_path);

    info!(
        "Generated {} table(s) for {} sample(s)",
        tables.len(),
        project.processed.samples.len()
    );
    println!("Tables:");
    for table in tables.iter() {
        println!(
            "  {:<28} {:>3} analytes x {:>3} samples",
            table.kind.title(),
            table.analytes().len(),
            table.columns.len()
        );
    }
    if !project.processed.ignored_elements.is_empty() {
        println!("Ignored tube elements: {}", project.processed.ignored_elements.join(", "));
    }
    println!("Written:");
    for path in &written {
        println!("  {}", path.display());
    }

    Ok(())
}
