//! YAML wire format for keyset files.
//!
//! Field names mirror the kebab-case keys used in the preset files. Unknown
//! keys are ignored for forward compatibility.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A keyset file: the `actions:` list mapping key indices to buttons.
#[derive(Debug, Clone, Deserialize)]
pub struct KeysetFile {
    /// Key entries, in file order.
    pub actions: Vec<KeyEntry>,
}

/// One key entry as written in YAML.
///
/// Only `index` and `name` are required; everything else depends on the
/// button flavor (plain command, dataref-driven multi-state, or `dir`
/// reference to a sub-keyset).
#[derive(Debug, Clone, Deserialize)]
pub struct KeyEntry {
    /// Physical key position (0-based, left-to-right, top-to-bottom).
    pub index: usize,
    /// Button name; for `type: dir` this is also the sub-keyset name.
    pub name: String,
    /// Button flavor. Only `dir` carries loader semantics.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Icon base name, resolved under the `icons/` directory.
    pub icon: Option<String>,
    /// Bound simulator dataref, if any.
    pub dataref: Option<String>,
    #[serde(rename = "dataref-multiplier")]
    pub dataref_multiplier: Option<f64>,
    /// Enumerated dataref values, each mapped to a distinct icon.
    #[serde(rename = "dataref-states")]
    pub dataref_states: Option<Vec<StateValue>>,
    /// Initial dataref value before the first simulator update.
    #[serde(rename = "dataref-default")]
    pub dataref_default: Option<f64>,
    /// Explicit icon file list, overriding the naming convention.
    #[serde(rename = "file-names")]
    pub file_names: Option<Vec<String>>,
    #[serde(rename = "auto-switch")]
    pub auto_switch: Option<bool>,
    pub command: Option<String>,
    pub commands: Option<Vec<String>>,
    #[serde(rename = "command-release")]
    pub command_release: Option<String>,
    #[serde(rename = "commands-release")]
    pub commands_release: Option<Vec<String>>,
    #[serde(rename = "command-on")]
    pub command_on: Option<String>,
    #[serde(rename = "command-off")]
    pub command_off: Option<String>,
    #[serde(rename = "commands-on")]
    pub commands_on: Option<Vec<String>>,
    #[serde(rename = "commands-off")]
    pub commands_off: Option<Vec<String>>,
}

/// A dataref state value as spelled in YAML.
///
/// The integer/float distinction is preserved because it is part of the
/// icon naming convention: `dataref-states: [0, 1]` resolves to
/// `icon.0.png` while `[0.0, 1.0]` resolves to `icon.0.0.png`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Written as an integer scalar.
    Int(i64),
    /// Written as a float scalar.
    Float(f64),
}

impl StateValue {
    /// Numeric value for threshold comparisons.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(i) => write!(f, "{i}"),
            // Whole floats keep their decimal point ("1.0", not "1") so the
            // suffix matches the on-disk icon file names.
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}
