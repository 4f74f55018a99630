use anyhow::Result;
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;

/// Flags settings keys confmig does not recognise.
pub struct SettingsValidator {
    known_fields: HashSet<&'static str>,
}

impl SettingsValidator {
    #[must_use]
    pub fn new() -> Self {
        let known_fields = [
            "output",
            "output.suffix",
            "output.indent",
            "output.placeholder",
            "logging",
            "logging.level",
        ]
        .into_iter()
        .collect();

        Self { known_fields }
    }

    /// Lists the dotted keys of `content` that are not known settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML.
    pub fn unknown_fields(&self, content: &str) -> Result<Vec<String>> {
        let parsed: toml::Value = toml::from_str(content)?;
        let mut unknown = Vec::new();
        self.check_table(&parsed, "", &mut unknown);
        Ok(unknown)
    }

    /// Prints a warning block for unknown keys in the settings file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn validate_settings_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path)?;
        let unknown = self.unknown_fields(&content)?;

        if !unknown.is_empty() {
            eprintln!("{}", "Settings warnings:".yellow().bold());
            for field in &unknown {
                eprintln!("  Unknown settings field: {}", field.yellow());
            }
            eprintln!();
        }

        Ok(())
    }

    /// Walks a TOML table, collecting unknown dotted keys. Unknown tables are
    /// reported once rather than per leaf.
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        let toml::Value::Table(map) = table else {
            return;
        };

        for (key, value) in map {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if !self.known_fields.contains(full_key.as_str()) {
                unknown.push(full_key);
            } else if value.is_table() {
                self.check_table(value, &full_key, unknown);
            }
        }
    }
}

impl Default for SettingsValidator {
    fn default() -> Self {
        Self::new()
    }
}
