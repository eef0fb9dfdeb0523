//! Loading of single keysets and the recursive preset tree.

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

use tracing::{debug, info, instrument, trace, warn};

use crate::error::{DeckError, Result};

use super::button::Button;
use super::schema::KeysetFile;

/// File name of the root keyset in the presets directory.
pub const ROOT_KEYSET_FILE: &str = "actions.yaml";

/// Name the root keyset is stored under in the loaded tree.
pub const ROOT_KEYSET_NAME: &str = "actions";

/// File name of a named sub-keyset.
#[must_use]
pub fn keyset_file_name(keyset: &str) -> String {
    format!("{keyset}.yaml")
}

/// One loaded keyset: buttons indexed by physical key position.
///
/// Positions without a configured button hold `None`.
#[derive(Debug, Clone)]
pub struct Preset {
    keys: Vec<Option<Button>>,
}

impl Preset {
    fn with_key_count(key_count: usize) -> Self {
        let mut keys = Vec::with_capacity(key_count);
        keys.resize_with(key_count, || None);
        Self { keys }
    }

    /// Number of key positions (configured or not).
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Button at a key position, if configured.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Button> {
        self.keys.get(index).and_then(Option::as_ref)
    }

    /// Configured buttons in key order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.keys.iter().flatten()
    }

    fn place(&mut self, button: Button) {
        if self.keys[button.index].is_some() {
            warn!(index = button.index, name = %button.name, "Duplicate key index, last entry wins");
        }
        let index = button.index;
        self.keys[index] = Some(button);
    }
}

/// Load one keyset file.
///
/// Returns the preset and the names of sub-keysets referenced by its
/// `type: dir` buttons (deduplicated, in file order).
///
/// # Errors
///
/// Returns an error if the file is missing, is not valid keyset YAML, or
/// contains a key index outside the deck layout.
#[instrument(skip(presets_dir), fields(dir = %presets_dir.display()))]
pub fn load_preset(
    presets_dir: &Path,
    file_name: &str,
    key_count: usize,
) -> Result<(Preset, Vec<String>)> {
    let path = presets_dir.join(file_name);
    trace!(path = %path.display(), "Reading keyset file");

    let content = std::fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DeckError::KeysetNotFound {
                path: path.display().to_string(),
            }
        } else {
            DeckError::Io(e)
        }
    })?;

    let file: KeysetFile = serde_yaml::from_str(&content).map_err(|e| DeckError::KeysetParse {
        file: file_name.to_string(),
        message: e.to_string(),
    })?;

    let mut preset = Preset::with_key_count(key_count);
    let mut sub_keysets: Vec<String> = Vec::new();

    for entry in file.actions {
        if entry.index >= key_count {
            return Err(DeckError::KeyIndexOutOfRange {
                file: file_name.to_string(),
                index: entry.index,
                key_count,
                max_idx: key_count.saturating_sub(1),
            });
        }

        let button = Button::from_entry(entry).map_err(|e| DeckError::KeysetParse {
            file: file_name.to_string(),
            message: e.to_string(),
        })?;

        if button.is_dir() && !sub_keysets.contains(&button.name) {
            trace!(keyset = %button.name, "Found sub-keyset reference");
            sub_keysets.push(button.name.clone());
        }

        preset.place(button);
    }

    debug!(
        buttons = preset.buttons().count(),
        sub_keysets = sub_keysets.len(),
        "Loaded keyset"
    );
    Ok((preset, sub_keysets))
}

/// Load the whole preset tree starting from the root `actions.yaml`.
///
/// Newly discovered sub-keysets are loaded until no unresolved references
/// remain. Each keyset is loaded at most once, so cycles and repeated
/// references terminate.
///
/// # Errors
///
/// Fails on the first keyset that is missing or malformed.
#[instrument(skip_all, fields(dir = %presets_dir.display()))]
pub fn load_all_presets(presets_dir: &Path, key_count: usize) -> Result<BTreeMap<String, Preset>> {
    let mut presets = BTreeMap::new();

    let (root, sub_keysets) = load_preset(presets_dir, ROOT_KEYSET_FILE, key_count)?;
    presets.insert(ROOT_KEYSET_NAME.to_string(), root);

    let mut pending: VecDeque<String> = sub_keysets.into();
    while let Some(keyset) = pending.pop_front() {
        if presets.contains_key(&keyset) {
            continue;
        }

        let (preset, more) = load_preset(presets_dir, &keyset_file_name(&keyset), key_count)?;
        for name in more {
            if !presets.contains_key(&name) {
                pending.push_back(name);
            }
        }
        presets.insert(keyset, preset);
    }

    info!(keysets = presets.len(), "Loaded preset tree");
    Ok(presets)
}

/// Number of keyset files (`*.yaml`) in the presets directory.
pub fn count_presets(presets_dir: &Path) -> Result<usize> {
    let mut count = 0;
    for dir_entry in std::fs::read_dir(presets_dir)? {
        let path = dir_entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "yaml") {
            count += 1;
        }
    }
    Ok(count)
}
