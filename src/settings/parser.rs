use super::Settings;
use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::filter::LevelFilter;

/// Reads and validates a settings file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or fails
/// validation.
pub fn parse_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    parse_settings_str(&content)
        .with_context(|| format!("Invalid settings file: {}", path.display()))
}

pub(crate) fn parse_settings_str(content: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(content).context("Failed to parse TOML settings")?;

    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<()> {
    let output = &settings.output;

    if !(1..=8).contains(&output.indent) {
        anyhow::bail!("output.indent must be between 1 and 8");
    }

    if output.suffix.is_empty() {
        anyhow::bail!("output.suffix cannot be empty");
    }

    let placeholder = &output.placeholder;
    if placeholder.is_empty() {
        anyhow::bail!("output.placeholder cannot be empty");
    }
    if placeholder.contains(['/', '\\']) {
        anyhow::bail!("output.placeholder must be a plain file name: {placeholder}");
    }
    // a .json placeholder would be read back as a document
    if Path::new(placeholder)
        .extension()
        .is_some_and(|ext| ext == "json")
    {
        anyhow::bail!("output.placeholder cannot be a .json file: {placeholder}");
    }

    settings
        .logging
        .level
        .parse::<LevelFilter>()
        .map_err(|_| anyhow::anyhow!("Unknown logging.level: {}", settings.logging.level))?;

    Ok(())
}
