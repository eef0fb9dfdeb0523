//! Keyset presets: YAML schema, button records, and the tree loader.
//!
//! A "keyset" is one YAML file mapping physical key indices to button
//! configurations. Keysets form a tree: a button with `type: dir` names
//! another keyset that the loader pulls in transitively.

mod button;
mod loader;
mod schema;

pub use button::{ASSETS_DIR, Button, CommandSet, StateSet, static_icon_path, state_icon_path};
pub use loader::{
    Preset, ROOT_KEYSET_FILE, ROOT_KEYSET_NAME, count_presets, keyset_file_name, load_all_presets,
    load_preset,
};
pub use schema::{KeyEntry, KeysetFile, StateValue};
