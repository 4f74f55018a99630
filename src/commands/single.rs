use crate::MigrationContext;
use crate::output;
use crate::tree::Configuration;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Write a copy of the base configuration with the literal values of the
/// modifications file applied, as `output_folder/<base_name>_<index>`.
///
/// Returns the path written to.
///
/// # Errors
///
/// Returns an error if:
/// - The base configuration or the modifications file cannot be read
/// - A modification key is malformed or its item cannot be written
/// - The destination already exists or cannot be written
pub fn execute(
    ctx: &MigrationContext,
    base_path: &Path,
    modifications_path: &Path,
    output_folder: &Path,
    index: usize,
) -> Result<PathBuf> {
    let base = Configuration::load(base_path)
        .with_context(|| format!("Failed to load configuration: {}", base_path.display()))?;
    let modifications = super::read_modifications(modifications_path)?;

    let target = super::numbered_output(base_path, output_folder, index)?;
    output::action("Writing", &target.display().to_string());
    super::write_modified(&base, modifications, &target, &ctx.settings.save_options())?;

    output::success(&format!("Created {}", target.display()));
    Ok(target)
}
