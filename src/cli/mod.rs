use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use xrftab::metadata::Settings;
use xrftab::ternary::GridStyle;

mod config;
mod lookup;
mod metadata;
mod scan;
mod tables;
mod ternary;
mod validate;

/// xrftab - XRF QAN data to concentration tables and ternary diagrams
#[derive(Parser)]
#[command(name = "xrftab")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Which table files to write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Excel workbook plus the concatenated CSV
    #[default]
    Xlsx,
    /// One CSV per table plus the concatenated CSV
    Csv,
    /// Everything
    Both,
}

/// Ternary diagram color scheme.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GridStyleArg {
    /// Black lines on white
    BlackOnWhite,
    /// Gray lines on white
    GrayOnWhite,
    /// White lines on black
    WhiteOnBlack,
}

impl From<GridStyleArg> for GridStyle {
    fn from(arg: GridStyleArg) -> Self {
        match arg {
            GridStyleArg::BlackOnWhite => GridStyle::BlackOnWhite,
            GridStyleArg::GrayOnWhite => GridStyle::GrayOnWhite,
            GridStyleArg::WhiteOnBlack => GridStyle::WhiteOnBlack,
        }
    }
}

/// Table selection flags of the `tables` command.
#[derive(clap::Args, Debug, Default)]
pub struct TableFlags {
    /// Skip absolute (as measured) tables
    #[arg(long)]
    pub no_absolute: bool,

    /// Skip relative (normalized) tables
    #[arg(long)]
    pub no_relative: bool,

    /// Skip major element tables
    #[arg(long)]
    pub no_major: bool,

    /// Skip trace element tables
    #[arg(long)]
    pub no_trace: bool,

    /// Skip oxide tables
    #[arg(long)]
    pub no_oxides: bool,

    /// Keep the X-ray tube elements of the instrument in the tables
    #[arg(long)]
    pub keep_tube_elements: bool,

    /// Rounding step of major tables (0.1, 0.01, 0.001, ...)
    #[arg(long, value_name = "STEP")]
    pub major_precision: Option<f64>,

    /// Rounding step of trace tables (10 or 1)
    #[arg(long, value_name = "STEP")]
    pub trace_precision: Option<f64>,

    /// Placeholder for missing cells
    #[arg(long, value_name = "TEXT")]
    pub missing_data: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the QAN files of a folder and what they contain
    Scan {
        /// XRF data folder
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,
    },

    /// Show or edit the project metadata of a folder
    Metadata {
        /// XRF data folder
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Set a field (repeatable), e.g. --set operator=JD
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Write metadata.json even when nothing was set
        #[arg(long)]
        save: bool,
    },

    /// Show or edit the sample lookup table of a folder
    Lookup {
        /// XRF data folder
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Set a lookup field (repeatable), e.g. --set BAS-01:report_abbreviation=B1
        #[arg(long = "set", value_name = "SAMPLE:FIELD=VALUE")]
        set: Vec<String>,

        /// Add rows for measured samples and write sample_lookup.csv
        #[arg(long)]
        save: bool,
    },

    /// Generate concentration tables and write them to disk
    Tables {
        /// XRF data folder
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Output directory (defaults to the data folder)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output files to write
        #[arg(short, long, default_value = "xlsx", value_enum)]
        format: OutputFormat,

        /// Instrument settings JSON file
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write the concatenated CSV from the raw QAN measurements instead of the tables
        #[arg(long)]
        raw: bool,

        #[command(flatten)]
        flags: TableFlags,
    },

    /// Extract a ternary system and draw its diagram
    Ternary {
        /// XRF data folder (not needed with --from-csv)
        #[arg(value_name = "FOLDER", required_unless_present_any = ["from_csv", "list"])]
        folder: Option<PathBuf>,

        /// Ternary system name, e.g. "CaO-Al2O3-SiO2"
        #[arg(short, long, required_unless_present = "list")]
        system: Option<String>,

        /// List the available systems and exit
        #[arg(long)]
        list: bool,

        /// Read long-form records from a concatenated CSV
        #[arg(long, value_name = "FILE", conflicts_with = "folder")]
        from_csv: Option<PathBuf>,

        /// Diagram file (.png, .svg or .pdf); defaults to a name built from the project
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also write the normalized values as CSV
        #[arg(long, value_name = "FILE")]
        table_csv: Option<PathBuf>,

        /// Color scheme
        #[arg(long, value_enum)]
        grid_style: Option<GridStyleArg>,

        /// Marker radius in pixels
        #[arg(long, value_name = "PX")]
        marker_size: Option<u32>,

        /// Label each point with its sample
        #[arg(long)]
        labels: bool,

        /// Caption printed below the diagram
        #[arg(long, value_name = "TEXT")]
        caption: Option<String>,

        /// Instrument settings JSON file
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Validate an XRF data folder
    Validate {
        /// XRF data folder
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Instrument settings JSON file
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Load the instrument settings file, or the built-in defaults.
pub(crate) fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings: {}", path.display())),
        None => Ok(Settings::default()),
    }
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan { folder } => scan::run(folder),
        Commands::Metadata { folder, set, save } => metadata::run(folder, set, save),
        Commands::Lookup { folder, set, save } => lookup::run(folder, set, save),
        Commands::Tables {
            folder,
            output,
            format,
            settings,
            config,
            raw,
            flags,
        } => tables::run(folder, output, format, settings, config, raw, flags),
        Commands::Ternary {
            folder,
            system,
            list,
            from_csv,
            output,
            table_csv,
            grid_style,
            marker_size,
            labels,
            caption,
            settings,
            config,
        } => {
            if list {
                return ternary::list();
            }
            ternary::run(ternary::TernaryArgs {
                folder,
                system: system.unwrap_or_default(),
                from_csv,
                output,
                table_csv,
                grid_style: grid_style.map(GridStyle::from),
                marker_size,
                labels,
                caption,
                settings,
                config,
            })
        }
        Commands::Validate { folder, settings } => validate::run(folder, settings),
    }
}
