use crate::MigrationContext;
use crate::output;
use crate::tree::Configuration;
use crate::version::Version;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Migrate the configuration at `config_path` and write it next to the input
/// under the configured suffix.
///
/// Returns the path written to.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration cannot be loaded or its documents disagree on version
/// - Its version or `target` is not in the catalog
/// - A change fails to apply
/// - The output directory exists and `overwrite` is not set, or cannot be written
pub fn execute(
    ctx: &MigrationContext,
    config_path: &Path,
    target: Option<Version>,
    overwrite: bool,
) -> Result<PathBuf> {
    let config_path = if config_path.file_name().is_some() {
        config_path.to_path_buf()
    } else {
        config_path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", config_path.display()))?
    };

    let mut config = Configuration::load(&config_path)
        .with_context(|| format!("Failed to load configuration: {}", config_path.display()))?;
    let from = config.version();

    let reached = ctx
        .migrator
        .migrate(&mut config, target)
        .with_context(|| format!("Failed to migrate configuration from version {from}"))?;

    let output_path = ctx.settings.output_path_for(&config_path);
    if overwrite && output_path.exists() {
        output::action("Replacing", &output_path.display().to_string());
        std::fs::remove_dir_all(&output_path).with_context(|| {
            format!("Failed to remove existing output: {}", output_path.display())
        })?;
    }

    config
        .save(&output_path, &ctx.settings.save_options())
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if reached == from {
        output::info(&format!("Configuration already at version {from}"));
    }
    output::success(&format!(
        "Migrated {} from {from} to {reached} into {}",
        config_path.display(),
        output_path.display()
    ));

    Ok(output_path)
}
