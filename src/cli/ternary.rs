use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

use xrftab::export::{load_long_csv, melt_samples};
use xrftab::metadata::ProjectMetadata;
use xrftab::tables::TableOptions;
use xrftab::ternary::{
    extract, extract_from_records, render, suggested_filename, system, GridStyle, PlotOptions,
    TERNARY_SYSTEMS,
};

use super::config::Config;
use super::load_settings;
use super::tables::load_project;

/// Arguments of the ternary command
pub struct TernaryArgs {
    pub folder: Option<PathBuf>,
    pub system: String,
    pub from_csv: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub table_csv: Option<PathBuf>,
    pub grid_style: Option<GridStyle>,
    pub marker_size: Option<u32>,
    pub labels: bool,
    pub caption: Option<String>,
    pub settings: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Print the supported systems
pub fn list() -> Result<()> {
    println!("Ternary Systems");
    println!("===============");
    for system in &TERNARY_SYSTEMS {
        println!("  {:<32} {}", system.name, system.labels().join(" | "));
    }
    Ok(())
}

fn plot_options(args: &TernaryArgs, config: &Config) -> PlotOptions {
    let mut options = PlotOptions::default();
    config.ternary.apply(&mut options);
    if let Some(style) = args.grid_style {
        options.grid_style = style;
    }
    if let Some(size) = args.marker_size {
        options.marker_size = size;
    }
    if args.labels {
        options.show_labels = true;
    }
    if args.caption.is_some() {
        options.caption = args.caption.clone();
    }
    options
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Extract a ternary system and render its diagram
pub fn run(args: TernaryArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let system = system(&args.system)?;
    let plot = plot_options(&args, &config);

    let (dataset, metadata, base_dir) = match (&args.from_csv, &args.folder) {
        (Some(csv), _) => {
            let records = load_long_csv(csv)
                .with_context(|| format!("Failed to read {}", csv.display()))?;
            info!("Read {} record(s) from {}", records.len(), csv.display());
            let base_dir = parent_dir(csv);
            let metadata = ProjectMetadata::load(&base_dir);
            (extract_from_records(system, &records), metadata, base_dir)
        }
        (None, Some(folder)) => {
            let settings = load_settings(
                args.settings
                    .as_deref()
                    .or(config.tables.settings.as_deref()),
            )?;
            let mut options = TableOptions::default();
            config.tables.apply(&mut options);
            let project = load_project(folder, &settings, &options)?;
            let records = melt_samples(&project.processed.samples);
            let dataset = extract(system, &project.processed.tables, &records);
            (dataset, project.metadata, folder.clone())
        }
        (None, None) => anyhow::bail!("Give a data folder or --from-csv"),
    };

    for skipped in &dataset.skipped {
        warn!("{}: {} skipped ({})", system, skipped.label, skipped.reason);
    }
    if dataset.is_empty() {
        anyhow::bail!("No sample has data for {}", system);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| base_dir.join(suggested_filename(system, &metadata)));
    render(&dataset, &output, &plot)
        .with_context(|| format!("Failed to render {}", output.display()))?;

    println!("{}: {} point(s) from {}", system, dataset.len(), dataset.source);
    if !dataset.skipped.is_empty() {
        println!("Skipped: {}", dataset.skipped.len());
    }
    println!("Diagram: {}", output.display());

    if let Some(path) = &args.table_csv {
        dataset
            .save_csv(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Values: {}", path.display());
    }

    Ok(())
}
