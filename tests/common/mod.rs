#![allow(dead_code)]

use anyhow::Result;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding configuration trees written from JSON values.
pub struct Workspace {
    pub temp_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `content` pretty-printed to `relative`, creating parent folders.
    pub fn write_json(&self, relative: &str, content: &Value) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(content)?)?;
        Ok(path)
    }

    pub fn read_json(&self, relative: &str) -> Result<Value> {
        let raw = fs::read_to_string(self.path().join(relative))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the legacy fixture tree under `name` and returns its root.
    pub fn legacy_config(&self, name: &str) -> Result<PathBuf> {
        self.write_json(&format!("{name}/simulation_params.json"), &simulation_params())?;
        self.write_json(&format!("{name}/resource/algae.json"), &resource("algae"))?;
        self.write_json(&format!("{name}/resource/moss.json"), &resource("moss"))?;
        self.write_json(&format!("{name}/species/mite.json"), &species("mite"))?;
        fs::create_dir_all(self.path().join(name).join("patches"))?;
        Ok(self.path().join(name))
    }
}

pub const LEGACY_VERSION: &str = "23.11.05";

pub fn simulation_params() -> Value {
    json!({
        "version": LEGACY_VERSION,
        "simulation": {
            "timeSteps": 100,
            "saveGeneticsSummaries": true
        }
    })
}

pub fn resource(name: &str) -> Value {
    json!({
        "version": LEGACY_VERSION,
        "resource": {
            "name": name,
            "cellMass": 0.5,
            "conversionToWetMass": 2.0,
            "NORMALIZATION_B": 1.0,
            "ACTIVATION_ENERGY": 0.6,
            "minHR": 40,
            "maxHR": 90,
            "maxRScale": 1.5
        }
    })
}

pub fn species(name: &str) -> Value {
    json!({
        "version": LEGACY_VERSION,
        "animal": {
            "name": name,
            "minVorExtremeT": 5,
            "devTimeConstant": 12.0,
            "pupaPeriodLength": 3.0,
            "longevitySinceMaturation": 40.0,
            "genetics": {
                "numberOfTraits": 2
            },
            "traits": {
                "fixedTraits": {
                    "eggMass": 0.1,
                    "voracity": 0.7
                },
                "variableTraits": {
                    "order": ["growth", "speed"],
                    "minTraitsRanges": { "growth": 0.1, "speed": 1.0 },
                    "maxTraitsRanges": { "growth": 0.9, "speed": 4.0 },
                    "minTraitLimits": { "growth": 0.0, "speed": 0.5 },
                    "maxTraitLimits": { "growth": 1.0, "speed": 5.0 }
                }
            }
        }
    })
}
