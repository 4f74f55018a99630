use crate::MigrationContext;
use crate::output;
use crate::tree::Configuration;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Every combination of candidate values, one entry per key in file order.
/// The last key varies fastest.
///
/// # Errors
///
/// Returns an error if a value is not a non-empty JSON list.
pub fn cartesian_product(candidates: &Map<String, Value>) -> Result<Vec<Vec<(String, Value)>>> {
    let mut axes = Vec::with_capacity(candidates.len());
    for (key, values) in candidates {
        match values {
            Value::Array(list) if !list.is_empty() => axes.push((key, list)),
            _ => anyhow::bail!("Candidate values for '{key}' must be a non-empty JSON list"),
        }
    }

    let mut combinations: Vec<Vec<(String, Value)>> = vec![Vec::new()];
    for (key, list) in axes {
        combinations = combinations
            .into_iter()
            .flat_map(move |prefix| {
                list.iter().map(move |value| {
                    let mut next = prefix.clone();
                    next.push((key.clone(), value.clone()));
                    next
                })
            })
            .collect();
    }
    Ok(combinations)
}

/// Replace the contents of `output_folder` with one configuration per
/// combination, named `<base_name>_<n>` from 1.
///
/// Returns the paths written, in order.
///
/// # Errors
///
/// Returns an error if:
/// - The base configuration or the modifications file cannot be read
/// - A candidate list is empty or not a list
/// - The base configuration lives inside the output folder
/// - A modification cannot be applied or a configuration cannot be written
pub fn execute(
    ctx: &MigrationContext,
    base_path: &Path,
    modifications_path: &Path,
    output_folder: &Path,
) -> Result<Vec<PathBuf>> {
    let base = Configuration::load(base_path)
        .with_context(|| format!("Failed to load configuration: {}", base_path.display()))?;
    let candidates = super::read_modifications(modifications_path)?;
    let combinations = cartesian_product(&candidates)?;

    clear_folder(output_folder, base_path)?;

    let options = ctx.settings.save_options();
    let mut written = Vec::with_capacity(combinations.len());
    for (number, combination) in (1..).zip(combinations) {
        let target = super::numbered_output(base_path, output_folder, number)?;
        super::write_modified(&base, combination, &target, &options)?;
        output::verbose(&format!("Created {}", target.display()));
        written.push(target);
    }

    output::success(&format!(
        "Created {} configurations in {}",
        written.len(),
        output_folder.display()
    ));
    Ok(written)
}

/// Empties `folder`, creating it if needed. Refuses to touch a folder that
/// holds the base configuration.
fn clear_folder(folder: &Path, base_path: &Path) -> Result<()> {
    if folder.exists() {
        let folder_abs = folder
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", folder.display()))?;
        let base_abs = base_path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", base_path.display()))?;
        if base_abs.starts_with(&folder_abs) {
            anyhow::bail!(
                "Output folder {} contains the base configuration",
                folder.display()
            );
        }

        debug!("Clearing {}", folder.display());
        std::fs::remove_dir_all(folder)
            .with_context(|| format!("Failed to clear output folder: {}", folder.display()))?;
    }
    std::fs::create_dir_all(folder)
        .with_context(|| format!("Failed to create output folder: {}", folder.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_product_last_key_fastest() {
        let candidates = map(json!({"a.json:x": [1, 2], "a.json:y": ["p", "q", "r"]}));
        let combos = cartesian_product(&candidates).unwrap();
        assert_eq!(combos.len(), 6);
        assert_eq!(
            combos[0],
            vec![("a.json:x".to_string(), json!(1)), ("a.json:y".to_string(), json!("p"))]
        );
        assert_eq!(combos[1][1].1, json!("q"));
        assert_eq!(combos[3][0].1, json!(2));
    }

    #[test]
    fn test_empty_map_is_one_combination() {
        let combos = cartesian_product(&Map::new()).unwrap();
        assert_eq!(combos, vec![Vec::new()]);
    }

    #[test]
    fn test_rejects_non_lists() {
        assert!(cartesian_product(&map(json!({"a.json:x": 1}))).is_err());
        assert!(cartesian_product(&map(json!({"a.json:x": []}))).is_err());
    }
}
