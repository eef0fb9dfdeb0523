//! Test fixture helpers for building temporary preset trees.
#![allow(dead_code)] // Not every test binary uses every helper

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use tempfile::TempDir;

/// A temporary presets directory with keyset files and icon assets,
/// cleaned up on drop.
pub struct PresetTree {
    dir: TempDir,
}

impl PresetTree {
    /// Create an empty presets directory with an `icons/` folder.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dir.path().join("icons")).expect("Failed to create icons dir");
        Self { dir }
    }

    /// A small ready-made tree: root keyset with one dataref button, one
    /// plain command button, and a `dir` reference to a radios keyset.
    /// All referenced icons exist, including the `none.png` fallback.
    #[must_use]
    pub fn basic() -> Self {
        let tree = Self::new();
        tree.keyset(
            "actions.yaml",
            r"
actions:
  - index: 0
    name: gear
    icon: gear
    dataref: sim/cockpit2/annunciators/gear
  - index: 1
    name: pause
    icon: pause
    command: sim/operation/pause_toggle
  - index: 14
    name: radios
    type: dir
    icon: radios
",
        );
        tree.keyset(
            "radios.yaml",
            r"
actions:
  - index: 0
    name: com1
    icon: com1
    dataref: sim/cockpit2/radios/com1_power
    dataref-states: [0, 1]
",
        );
        for icon in ["gear.0.0", "gear.1.0", "pause", "radios", "com1.0", "com1.1", "none"] {
            tree.icon(icon);
        }
        tree
    }

    /// Write a keyset file into the presets directory.
    pub fn keyset(&self, file: &str, content: &str) {
        fs::write(self.dir.path().join(file), content).expect("Failed to write keyset");
    }

    /// Write a solid-color PNG under `icons/<name>.png`.
    pub fn icon(&self, name: &str) {
        let img = RgbImage::from_pixel(64, 64, Rgb([90, 140, 200]));
        let path = self.dir.path().join("icons").join(format!("{name}.png"));
        img.save(&path)
            .unwrap_or_else(|_| panic!("Failed to save icon at {path:?}"));
    }

    /// Path of the presets directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path as a string (useful for CLI arguments).
    ///
    /// # Panics
    ///
    /// Panics if the path is not valid UTF-8.
    #[must_use]
    pub fn path_str(&self) -> &str {
        self.dir.path().to_str().expect("Path is not valid UTF-8")
    }
}

impl Default for PresetTree {
    fn default() -> Self {
        Self::new()
    }
}
