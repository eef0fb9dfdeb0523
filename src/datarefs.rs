//! Extraction of dataref-bound buttons from loaded presets.
//!
//! The embedding main loop subscribes to exactly these datarefs; everything
//! else on the deck is static.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::preset::{Preset, StateValue};

/// One button's dataref binding, flattened for the simulator-facing side.
#[derive(Debug, Clone, Serialize)]
pub struct DatarefBinding {
    /// Button name.
    pub name: String,
    /// Physical key position.
    pub index: usize,
    /// Icon base name, if any.
    pub icon: Option<String>,
    /// Subscribed dataref.
    pub dataref: String,
    /// Scale factor applied to incoming values.
    pub multiplier: f64,
    /// Enumerated state values.
    pub states: Vec<StateValue>,
    /// Smallest state value.
    pub min: f64,
    /// Largest state value.
    pub max: f64,
    /// Initial value before the first simulator update.
    pub current: Option<f64>,
    /// Icon files, one per state, relative to the presets directory.
    pub file_names: Vec<PathBuf>,
}

/// Collect the dataref-bound buttons of every keyset.
///
/// Keysets without any dataref buttons map to an empty list; keys are
/// preserved so callers can index by keyset name.
#[instrument(skip_all)]
pub fn collect_datarefs(
    presets: &BTreeMap<String, Preset>,
) -> BTreeMap<String, Vec<DatarefBinding>> {
    let mut all = BTreeMap::new();

    for (keyset, preset) in presets {
        let mut bindings = Vec::new();
        for button in preset.buttons() {
            let Some(dataref) = &button.dataref else {
                continue;
            };
            // Buttons with a dataref always carry a state set.
            let Some(states) = &button.states else {
                continue;
            };

            bindings.push(DatarefBinding {
                name: button.name.clone(),
                index: button.index,
                icon: button.icon.clone(),
                dataref: dataref.clone(),
                multiplier: button.dataref_multiplier,
                states: states.values.clone(),
                min: states.min,
                max: states.max,
                current: button.current,
                file_names: button.file_names.clone(),
            });
        }

        debug!(keyset = %keyset, bindings = bindings.len(), "Collected dataref bindings");
        all.insert(keyset.clone(), bindings);
    }

    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::load_all_presets;
    use std::fs;
    use tempfile::TempDir;

    fn load_fixture(root: &str, extra: &[(&str, &str)]) -> BTreeMap<String, Preset> {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("actions.yaml"), root).unwrap();
        for (file, content) in extra {
            fs::write(dir.path().join(file), content).unwrap();
        }
        load_all_presets(dir.path(), 15).unwrap()
    }

    #[test]
    fn test_collect_skips_plain_buttons() {
        let presets = load_fixture(
            r"
actions:
  - {index: 0, name: pause, icon: pause, command: sim/pause}
  - {index: 1, name: gear, icon: gear, dataref: sim/gear}
",
            &[],
        );

        let datarefs = collect_datarefs(&presets);
        let bindings = &datarefs["actions"];
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].dataref, "sim/gear");
        assert_eq!(bindings[0].index, 1);
    }

    #[test]
    fn test_binding_metadata() {
        let presets = load_fixture(
            r"
actions:
  - index: 0
    name: flaps
    icon: flaps
    dataref: sim/flaps
    dataref-multiplier: 2.0
    dataref-states: [0.0, 0.5, 1.0]
    dataref-default: 0.0
",
            &[],
        );

        let binding = &collect_datarefs(&presets)["actions"][0];
        assert_eq!(binding.multiplier, 2.0);
        assert_eq!(binding.min, 0.0);
        assert_eq!(binding.max, 1.0);
        assert_eq!(binding.current, Some(0.0));
        assert_eq!(binding.states.len(), 3);
        assert_eq!(binding.file_names.len(), 3);
    }

    #[test]
    fn test_empty_keyset_keeps_key() {
        let presets = load_fixture(
            "actions: [{index: 0, name: radios, type: dir, icon: r}]",
            &[("radios.yaml", "actions: [{index: 0, name: nav, icon: n, command: c}]")],
        );

        let datarefs = collect_datarefs(&presets);
        assert_eq!(datarefs.len(), 2);
        assert!(datarefs["actions"].is_empty());
        assert!(datarefs["radios"].is_empty());
    }

    #[test]
    fn test_bindings_serialize_to_json() {
        let presets = load_fixture(
            "actions: [{index: 3, name: gear, icon: gear, dataref: sim/gear}]",
            &[],
        );

        let json = serde_json::to_value(collect_datarefs(&presets)).unwrap();
        assert_eq!(json["actions"][0]["dataref"], "sim/gear");
        assert_eq!(json["actions"][0]["min"], 0.0);
    }
}
