//! The built-in migration catalog, oldest step first.

use super::Updater;
use crate::changes::{Change, DocumentTarget};
use crate::error::Result;
use crate::version::Version;
use serde_json::{Value, json};

/// Oldest version the catalog knows; trees at this version need no changes.
pub const BASELINE: Version = Version::new(23, 11, 5);

/// Every built-in step in ascending version order.
///
/// # Errors
///
/// Fails only if a built-in change is malformed.
pub fn updaters() -> Result<Vec<Updater>> {
    Ok(vec![
        Updater::new(BASELINE, Vec::new()),
        Updater::new(Version::new(23, 12, 4), changes_23_12_04()?),
    ])
}

const SIMULATION_FILE: &str = "simulation_params.json";
const NO_FOLDER: [&str; 0] = [];

fn trait_definition(definition_type: &str) -> Value {
    json!({
        "definitionType": definition_type,
        "speciesLevelParams": { "value": null },
        "individualLevelParams": {
            "limits": { "max": null, "min": null },
            "ranges": { "max": null, "min": null },
            "restrictValue": null
        }
    })
}

fn changes_23_12_04() -> Result<Vec<Change>> {
    let simulation = || DocumentTarget::file(NO_FOLDER, SIMULATION_FILE);
    let resource = || DocumentTarget::all_files(["resource"]);
    let species = || DocumentTarget::all_files(["species"]);

    let mut changes = vec![
        // simulation
        Change::move_item(
            simulation()?,
            ["simulation", "saveGeneticsSummaries"],
            ["simulation", "saveGenetics"],
        )?,
        Change::add_item(
            simulation()?,
            ["simulation", "checkpoints"],
            json!({ "enabled": false, "recordEach": null, "binaryEnabled": null }),
        ),
        // resource growth module
        Change::add_item(resource(), ["resource", "growthModule"], json!({})),
        Change::move_item(
            resource(),
            ["resource", "cellMass"],
            ["resource", "growthModule", "cellMass"],
        )?,
        Change::move_item(
            resource(),
            ["resource", "conversionToWetMass"],
            ["resource", "growthModule", "conversionToWetMass"],
        )?,
        Change::remove_item(resource(), ["resource", "NORMALIZATION_B"])?,
        Change::remove_item(resource(), ["resource", "ACTIVATION_ENERGY"])?,
        Change::move_item(resource(), ["resource", "minHR"], ["resource", "minRH"])?,
        Change::move_item(resource(), ["resource", "maxHR"], ["resource", "maxRH"])?,
        Change::move_item(resource(), ["resource", "maxRScale"], ["resource", "rMaxScale"])?,
        // species traits
        Change::remove_item(species(), ["animal", "minVorExtremeT"])?,
        Change::add_item(species(), ["animal", "genetics", "traits"], json!({})),
        Change::move_item(
            species(),
            ["animal", "traits", "variableTraits", "order"],
            ["animal", "genetics", "traits", "individualLevelTraitsOrder"],
        )?,
        Change::add_item(
            species(),
            ["animal", "genetics", "traits", "definition"],
            json!({}),
        ),
        Change::regex_add_item(
            species(),
            ["^animal$", "^traits$", "^fixedTraits$", ".*"],
            ["animal", "genetics", "traits", "definition", "<match_3_0>"],
            trait_definition("SpeciesLevel"),
        )?,
        Change::regex_add_item(
            species(),
            ["^animal$", "^traits$", "^variableTraits$", "^minTraitsRanges$", ".*"],
            ["animal", "genetics", "traits", "definition", "<match_4_0>"],
            trait_definition("IndividualLevel"),
        )?,
        Change::remove_item(species(), ["animal", "genetics", "numberOfTraits"])?,
        Change::regex_move_item(
            species(),
            ["^animal$", "^traits$", "^fixedTraits$", ".*"],
            ["animal", "traits", "fixedTraits", "<match_3_0>"],
            [
                "animal",
                "genetics",
                "traits",
                "definition",
                "<match_3_0>",
                "speciesLevelParams",
                "value",
            ],
        )?,
        Change::regex_copy_item(
            species(),
            ["^animal$", "^traits$", "^variableTraits$", "^(max|min)TraitsRanges$", ".*"],
            ["animal", "traits", "variableTraits", "<match_3_1>TraitsRanges", "<match_4_0>"],
            [
                "animal",
                "genetics",
                "traits",
                "definition",
                "<match_4_0>",
                "individualLevelParams",
                "ranges",
                "<match_3_1>",
            ],
        )?,
        Change::regex_copy_item(
            species(),
            ["^animal$", "^traits$", "^variableTraits$", "^(max|min)TraitLimits$", ".*"],
            ["animal", "traits", "variableTraits", "<match_3_1>TraitLimits", "<match_4_0>"],
            [
                "animal",
                "genetics",
                "traits",
                "definition",
                "<match_4_0>",
                "individualLevelParams",
                "limits",
                "<match_3_1>",
            ],
        )?,
    ];

    // development traits promoted from plain animal parameters
    for name in ["devTime", "lengthAtMaturation", "pupaPeriodTime", "longevitySinceMaturation"] {
        changes.push(Change::add_item(
            species(),
            ["animal", "genetics", "traits", "definition", name],
            trait_definition("SpeciesLevel"),
        ));
    }
    for (old, name) in [
        ("devTimeConstant", "devTime"),
        ("pupaPeriodLength", "pupaPeriodTime"),
        ("longevitySinceMaturation", "longevitySinceMaturation"),
    ] {
        changes.push(Change::move_item(
            species(),
            ["animal", old],
            ["animal", "genetics", "traits", "definition", name, "speciesLevelParams", "value"],
        )?);
    }

    Ok(changes)
}
