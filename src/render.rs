//! Key-image rendering and per-preset image sets.
//!
//! Icons are scaled to best-fit the key dimensions on a black canvas, an
//! optional label is drawn near the bottom edge, and the result is
//! converted to the device-native byte format.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::RgbImage;
use image::imageops::FilterType;
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, instrument, trace};

use crate::deck::DeckSpec;
use crate::error::{DeckError, Result};
use crate::paths::resolve_path;
use crate::preset::{Preset, static_icon_path};

/// Label font size in pixels.
const LABEL_SCALE: f32 = 14.0;

/// Distance from the bottom edge to the label baseline.
const LABEL_BOTTOM_MARGIN: u32 = 5;

/// Icon base name of the fallback image every full image set carries.
const FALLBACK_ICON: &str = "none";

/// Rendered key images keyed by icon file path (relative to the presets
/// directory). Each distinct icon is rendered once.
pub type ImageSet = HashMap<PathBuf, Vec<u8>>;

/// Renders icon files into device-native key images.
pub struct Renderer {
    deck: DeckSpec,
    presets_dir: PathBuf,
    font: Option<FontVec>,
}

impl Renderer {
    /// Create a renderer for a deck, resolving icon paths against
    /// `presets_dir`.
    pub fn new(deck: DeckSpec, presets_dir: impl Into<PathBuf>) -> Self {
        Self {
            deck,
            presets_dir: presets_dir.into(),
            font: None,
        }
    }

    /// Load a TrueType font for label overlays.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid font.
    pub fn with_font(mut self, font_path: &Path) -> Result<Self> {
        let data = std::fs::read(font_path).map_err(|e| DeckError::FontLoad {
            path: font_path.display().to_string(),
            reason: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(data).map_err(|e| DeckError::FontLoad {
            path: font_path.display().to_string(),
            reason: e.to_string(),
        })?;
        self.font = Some(font);
        Ok(self)
    }

    /// The deck geometry this renderer targets.
    #[must_use]
    pub const fn deck(&self) -> &DeckSpec {
        &self.deck
    }

    /// Render one icon file into a device-native key image.
    ///
    /// A non-empty `label` is drawn in white, centered a few pixels above
    /// the bottom edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the icon file is missing or unreadable, or if a
    /// label is requested without a configured font.
    #[instrument(skip(self), fields(icon = %icon.display()))]
    pub fn render_key(&self, icon: &Path, label: &str) -> Result<Vec<u8>> {
        let path = resolve_path(icon, &self.presets_dir)?;
        if !path.exists() {
            return Err(DeckError::IconNotFound {
                path: path.display().to_string(),
            });
        }

        let img = image::open(&path).map_err(|e| DeckError::ImageProcessing(e.to_string()))?;
        let mut canvas = scale_to_key(&img, self.deck.key_width, self.deck.key_height);

        if !label.is_empty() {
            self.draw_label(&mut canvas, label)?;
        }

        self.deck.to_native(&canvas)
    }

    fn draw_label(&self, canvas: &mut RgbImage, label: &str) -> Result<()> {
        let font = self.font.as_ref().ok_or_else(|| DeckError::FontMissing {
            label: label.to_string(),
        })?;

        let scale = PxScale::from(LABEL_SCALE);
        let (text_w, text_h) = text_size(scale, font, label);

        let (w, h) = canvas.dimensions();
        let x = (i64::from(w) - i64::from(text_w)) / 2;
        let y = i64::from(h) - i64::from(LABEL_BOTTOM_MARGIN) - i64::from(text_h);

        trace!(label = %label, x, y, "Drawing key label");
        #[allow(clippy::cast_possible_truncation)]
        draw_text_mut(
            canvas,
            image::Rgb([255, 255, 255]),
            x as i32,
            y as i32,
            scale,
            font,
            label,
        );
        Ok(())
    }

    /// Render one image per distinct icon file referenced by a preset.
    ///
    /// Labels are not drawn here; per-state icons already carry their
    /// legends.
    ///
    /// # Errors
    ///
    /// Fails on the first missing or unreadable icon file.
    #[instrument(skip_all)]
    pub fn build_image_set(&self, preset: &Preset) -> Result<ImageSet> {
        let mut set = ImageSet::new();
        self.extend_image_set(&mut set, preset)?;
        debug!(images = set.len(), "Built preset image set");
        Ok(set)
    }

    /// Render the union of all presets' icons, seeded with the fallback
    /// `icons/none.png` image shown on unbound keys.
    ///
    /// # Errors
    ///
    /// Fails if the fallback icon or any referenced icon is missing.
    #[instrument(skip_all)]
    pub fn build_image_set_all<'a, I>(&self, presets: I) -> Result<ImageSet>
    where
        I: IntoIterator<Item = &'a Preset>,
    {
        let mut set = ImageSet::new();

        let fallback = static_icon_path(FALLBACK_ICON);
        let image = self.render_key(&fallback, "")?;
        set.insert(fallback, image);

        for preset in presets {
            self.extend_image_set(&mut set, preset)?;
        }

        debug!(images = set.len(), "Built full image set");
        Ok(set)
    }

    fn extend_image_set(&self, set: &mut ImageSet, preset: &Preset) -> Result<()> {
        for button in preset.buttons() {
            for file_name in &button.file_names {
                if set.contains_key(file_name) {
                    continue;
                }
                let image = self.render_key(file_name, "")?;
                set.insert(file_name.clone(), image);
            }
        }
        Ok(())
    }
}

/// Scale an image to best-fit the key dimensions, centered on a black
/// canvas with the aspect ratio preserved.
fn scale_to_key(img: &image::DynamicImage, width: u32, height: u32) -> RgbImage {
    let resized = img.resize(width, height, FilterType::Lanczos3).to_rgb8();
    let mut canvas = RgbImage::new(width, height);

    let (rw, rh) = resized.dimensions();
    let x = (width - rw) / 2;
    let y = (height - rh) / 2;

    image::imageops::overlay(&mut canvas, &resized, x.into(), y.into());
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckModel;
    use crate::preset::load_preset;
    use image::Rgb;
    use std::fs;
    use tempfile::TempDir;

    fn presets_dir_with_icons(icons: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let icons_dir = dir.path().join("icons");
        fs::create_dir(&icons_dir).unwrap();
        for (i, name) in icons.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let img = RgbImage::from_pixel(64, 48, Rgb([i as u8 * 40, 128, 200]));
            img.save(icons_dir.join(format!("{name}.png"))).unwrap();
        }
        dir
    }

    fn test_renderer(dir: &TempDir) -> Renderer {
        let mut spec = DeckSpec::from_model(DeckModel::Mk2);
        // Raw bytes are easier to assert on than JPEG.
        spec.format = crate::deck::PixelFormat::Bgr;
        Renderer::new(spec, dir.path())
    }

    #[test]
    fn test_render_key_dimensions() {
        let dir = presets_dir_with_icons(&["gear.0.0"]);
        let renderer = test_renderer(&dir);

        let bytes = renderer.render_key(Path::new("icons/gear.0.0.png"), "").unwrap();
        assert_eq!(bytes.len(), 72 * 72 * 3);
    }

    #[test]
    fn test_render_missing_icon() {
        let dir = presets_dir_with_icons(&[]);
        let renderer = test_renderer(&dir);

        let result = renderer.render_key(Path::new("icons/ghost.png"), "");
        assert!(matches!(result, Err(DeckError::IconNotFound { .. })));
    }

    #[test]
    fn test_label_without_font_is_error() {
        let dir = presets_dir_with_icons(&["gear"]);
        let renderer = test_renderer(&dir);

        let result = renderer.render_key(Path::new("icons/gear.png"), "GEAR");
        assert!(matches!(result, Err(DeckError::FontMissing { .. })));
    }

    #[test]
    fn test_with_font_missing_file() {
        let dir = presets_dir_with_icons(&[]);
        let result = test_renderer(&dir).with_font(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(DeckError::FontLoad { .. })));
    }

    #[test]
    fn test_with_font_invalid_data() {
        let dir = presets_dir_with_icons(&[]);
        let bogus = dir.path().join("bogus.ttf");
        fs::write(&bogus, b"definitely not a font").unwrap();

        let result = test_renderer(&dir).with_font(&bogus);
        assert!(matches!(result, Err(DeckError::FontLoad { .. })));
    }

    #[test]
    fn test_build_image_set_dedupes() {
        let dir = presets_dir_with_icons(&["gear.0.0", "gear.1.0", "pause"]);
        fs::write(
            dir.path().join("actions.yaml"),
            r"
actions:
  - {index: 0, name: gear, icon: gear, dataref: sim/gear}
  - {index: 1, name: gear2, icon: gear, dataref: sim/gear2}
  - {index: 2, name: pause, icon: pause, command: sim/pause}
",
        )
        .unwrap();

        let (preset, _) = load_preset(dir.path(), "actions.yaml", 15).unwrap();
        let renderer = test_renderer(&dir);
        let set = renderer.build_image_set(&preset).unwrap();

        // gear.0.0, gear.1.0 (shared by both gear buttons) and pause.
        assert_eq!(set.len(), 3);
        assert!(set.contains_key(Path::new("icons/gear.0.0.png")));
        assert!(set.contains_key(Path::new("icons/pause.png")));
    }

    #[test]
    fn test_build_image_set_all_seeds_fallback() {
        let dir = presets_dir_with_icons(&["none", "pause"]);
        fs::write(
            dir.path().join("actions.yaml"),
            "actions: [{index: 0, name: pause, icon: pause, command: c}]",
        )
        .unwrap();

        let (preset, _) = load_preset(dir.path(), "actions.yaml", 15).unwrap();
        let renderer = test_renderer(&dir);
        let set = renderer.build_image_set_all([&preset]).unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.contains_key(Path::new("icons/none.png")));
    }

    #[test]
    fn test_build_image_set_all_missing_fallback() {
        let dir = presets_dir_with_icons(&["pause"]);
        fs::write(
            dir.path().join("actions.yaml"),
            "actions: [{index: 0, name: pause, icon: pause, command: c}]",
        )
        .unwrap();

        let (preset, _) = load_preset(dir.path(), "actions.yaml", 15).unwrap();
        let renderer = test_renderer(&dir);
        let result = renderer.build_image_set_all([&preset]);
        assert!(matches!(result, Err(DeckError::IconNotFound { .. })));
    }

    #[test]
    fn test_scale_preserves_aspect_with_black_bars() {
        // 64x48 source on a 72x72 key leaves bars above and below.
        let dir = presets_dir_with_icons(&["wide"]);
        let renderer = test_renderer(&dir);
        let bytes = renderer.render_key(Path::new("icons/wide.png"), "").unwrap();

        // Top-left corner lands in a bar and stays black (flipped or not).
        assert_eq!(&bytes[0..3], &[0, 0, 0]);
    }
}
