//! The flat button record resolved from a YAML key entry.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{DeckError, Result};

use super::schema::{KeyEntry, StateValue};

/// Directory holding icon assets, relative to the presets directory.
pub const ASSETS_DIR: &str = "icons";

/// Marker value of the `type:` key for sub-keyset references.
const DIR_KIND: &str = "dir";

/// Path of a static (single-image) icon: `icons/<name>.png`.
#[must_use]
pub fn static_icon_path(icon_name: &str) -> PathBuf {
    Path::new(ASSETS_DIR).join(format!("{icon_name}.png"))
}

/// Path of a per-state icon: `icons/<name>.<state>.png`.
#[must_use]
pub fn state_icon_path(icon_name: &str, state: StateValue) -> PathBuf {
    Path::new(ASSETS_DIR).join(format!("{icon_name}.{state}.png"))
}

/// Enumerated dataref states with their derived value range.
#[derive(Debug, Clone, Serialize)]
pub struct StateSet {
    /// State values in file order.
    pub values: Vec<StateValue>,
    /// Smallest state value.
    pub min: f64,
    /// Largest state value.
    pub max: f64,
}

impl StateSet {
    fn new(values: Vec<StateValue>) -> Self {
        let min = values.iter().map(|v| v.as_f64()).fold(f64::INFINITY, f64::min);
        let max = values
            .iter()
            .map(|v| v.as_f64())
            .fold(f64::NEG_INFINITY, f64::max);
        Self { values, min, max }
    }
}

/// X-Plane command bindings for one button.
///
/// `*_seq` variants carry an ordered list of commands fired back-to-back.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommandSet {
    pub press: Option<String>,
    pub press_seq: Option<Vec<String>>,
    pub release: Option<String>,
    pub release_seq: Option<Vec<String>>,
    pub on: Option<String>,
    pub off: Option<String>,
    pub on_seq: Option<Vec<String>>,
    pub off_seq: Option<Vec<String>>,
}

impl CommandSet {
    fn from_entry(entry: &mut KeyEntry) -> Self {
        Self {
            press: entry.command.take(),
            press_seq: entry.commands.take(),
            release: entry.command_release.take(),
            release_seq: entry.commands_release.take(),
            on: entry.command_on.take(),
            off: entry.command_off.take(),
            on_seq: entry.commands_on.take(),
            off_seq: entry.commands_off.take(),
        }
    }
}

/// Static configuration of one physical key.
///
/// Invariant: a button with a dataref always has a state set (defaulting to
/// `[0.0, 1.0]`), and `file_names` holds exactly one resolved icon path per
/// state (or a single path for stateless buttons).
#[derive(Debug, Clone, Serialize)]
pub struct Button {
    /// Physical key position (0-based).
    pub index: usize,
    /// Button name; doubles as the sub-keyset name for `dir` buttons.
    pub name: String,
    /// Icon base name, if any.
    pub icon: Option<String>,
    /// Raw `type:` string from the YAML entry.
    pub kind: Option<String>,
    /// Bound simulator dataref.
    pub dataref: Option<String>,
    /// Scale factor applied to incoming dataref values.
    pub dataref_multiplier: f64,
    /// Enumerated dataref states; `Some` whenever `dataref` is set.
    pub states: Option<StateSet>,
    /// Whether the displayed state follows the dataref automatically.
    pub auto_switch: bool,
    /// Command bindings.
    pub commands: CommandSet,
    /// Initial dataref value before the first simulator update.
    pub current: Option<f64>,
    /// Icon files for this button, relative to the presets directory.
    pub file_names: Vec<PathBuf>,
}

impl Button {
    /// Resolve a YAML key entry into a button record.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry names no icon source (neither `icon`
    /// nor `file-names`) or declares an empty `dataref-states` list.
    pub fn from_entry(mut entry: KeyEntry) -> Result<Self> {
        let states = match entry.dataref_states.take() {
            Some(values) if values.is_empty() => {
                return Err(DeckError::Other(format!(
                    "button '{}' (index {}): 'dataref-states' must not be empty",
                    entry.name, entry.index
                )));
            }
            Some(values) => Some(StateSet::new(values)),
            // A dataref without explicit states is a two-state toggle.
            None if entry.dataref.is_some() => {
                Some(StateSet::new(vec![StateValue::Float(0.0), StateValue::Float(1.0)]))
            }
            None => None,
        };

        let file_names = resolve_file_names(&entry, states.as_ref())?;
        let commands = CommandSet::from_entry(&mut entry);

        Ok(Self {
            index: entry.index,
            name: entry.name,
            icon: entry.icon,
            kind: entry.kind,
            dataref: entry.dataref,
            dataref_multiplier: entry.dataref_multiplier.unwrap_or(1.0),
            states,
            auto_switch: entry.auto_switch.unwrap_or(true),
            commands,
            current: entry.dataref_default,
            file_names,
        })
    }

    /// True if this button references a sub-keyset.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind.as_deref() == Some(DIR_KIND)
    }
}

/// Resolve the icon file list for an entry.
///
/// Precedence: explicit `file-names`, then one icon per dataref state, then
/// a single static icon.
fn resolve_file_names(entry: &KeyEntry, states: Option<&StateSet>) -> Result<Vec<PathBuf>> {
    if let Some(names) = &entry.file_names {
        return Ok(names.iter().map(|n| static_icon_path(n)).collect());
    }

    let Some(icon) = &entry.icon else {
        return Err(DeckError::Other(format!(
            "button '{}' (index {}): needs 'icon' or 'file-names'",
            entry.name, entry.index
        )));
    };

    match states {
        Some(set) => Ok(set
            .values
            .iter()
            .map(|state| state_icon_path(icon, *state))
            .collect()),
        None => Ok(vec![static_icon_path(icon)]),
    }
}
