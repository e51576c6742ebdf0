use anyhow::Result;
use log::info;
use std::path::PathBuf;

use xrftab::validator::validate_folder;

/// Validate an XRF data folder
pub fn run(folder: PathBuf, settings: Option<PathBuf>) -> Result<()> {
    let settings = super::load_settings(settings.as_deref())?;

    info!("XRF Validator");
    info!("=============");
    info!("Folder: {}", folder.display());

    match validate_folder(&folder, &settings) {
        Ok(report) => {
            #[cfg(feature = "colorized_output")]
            {
                println!("{}", report.format_colored());
            }

            #[cfg(not(feature = "colorized_output"))]
            {
                println!("{}", report);
            }

            // Exit with error code if validation failed
            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
