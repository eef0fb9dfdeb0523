//! Target deck geometry and native key-image formats.
//!
//! The renderer only needs the key layout and the byte format the device
//! SDK expects; actual HID communication happens elsewhere.

use std::io::Cursor;

use clap::ValueEnum;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops;
use serde::Serialize;

use crate::error::{DeckError, Result};

/// Supported Stream Deck device models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum DeckModel {
    /// Stream Deck Mini (6 keys, 3x2)
    Mini,
    /// Stream Deck Original (15 keys, 5x3)
    Original,
    /// Stream Deck Original V2 (15 keys, 5x3)
    OriginalV2,
    /// Stream Deck MK.2 (15 keys, 5x3)
    Mk2,
    /// Stream Deck XL (32 keys, 8x4)
    Xl,
}

impl DeckModel {
    /// Number of keys for this model.
    #[must_use]
    pub const fn key_count(self) -> usize {
        match self {
            Self::Mini => 6,
            Self::Original | Self::OriginalV2 | Self::Mk2 => 15,
            Self::Xl => 32,
        }
    }

    /// Key image dimensions (width, height) in pixels.
    #[must_use]
    pub const fn key_dimensions(self) -> (u32, u32) {
        match self {
            Self::Mini | Self::Original | Self::OriginalV2 | Self::Mk2 => (72, 72),
            Self::Xl => (96, 96),
        }
    }

    /// Key layout (columns, rows).
    #[must_use]
    pub const fn layout(self) -> (u8, u8) {
        match self {
            Self::Mini => (3, 2),
            Self::Original | Self::OriginalV2 | Self::Mk2 => (5, 3),
            Self::Xl => (8, 4),
        }
    }

    /// Byte format the device expects for key images.
    #[must_use]
    pub const fn pixel_format(self) -> PixelFormat {
        match self {
            Self::Mini | Self::Original => PixelFormat::Bgr,
            Self::OriginalV2 | Self::Mk2 | Self::Xl => PixelFormat::Jpeg,
        }
    }

    /// Human-readable name for this model.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Mini => "Stream Deck Mini",
            Self::Original => "Stream Deck (Original)",
            Self::OriginalV2 => "Stream Deck (Original V2)",
            Self::Mk2 => "Stream Deck MK.2",
            Self::Xl => "Stream Deck XL",
        }
    }
}

/// Pixel encoding of a native key image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Baseline JPEG.
    Jpeg,
    /// Raw BGR888 rows, top-to-bottom.
    Bgr,
}

impl PixelFormat {
    /// Conventional file extension for pre-rendered images.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Bgr => "bin",
        }
    }
}

/// Resolved geometry the renderer targets.
///
/// Built from a [`DeckModel`]; the key count can be overridden for presets
/// authored against a different layout.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeckSpec {
    /// Number of key positions.
    pub key_count: usize,
    /// Key image width in pixels.
    pub key_width: u32,
    /// Key image height in pixels.
    pub key_height: u32,
    /// Native byte format.
    pub format: PixelFormat,
    /// Mirror horizontally before encoding.
    pub flip_h: bool,
    /// Mirror vertically before encoding.
    pub flip_v: bool,
}

impl DeckSpec {
    /// Geometry for a known device model.
    #[must_use]
    pub fn from_model(model: DeckModel) -> Self {
        let (key_width, key_height) = model.key_dimensions();
        Self {
            key_count: model.key_count(),
            key_width,
            key_height,
            format: model.pixel_format(),
            // Key displays are wired mirrored on every supported model.
            flip_h: true,
            flip_v: true,
        }
    }

    /// Override the key count (e.g. presets authored for a bigger deck).
    #[must_use]
    pub const fn with_key_count(mut self, key_count: usize) -> Self {
        self.key_count = key_count;
        self
    }

    /// Convert a rendered key image into the device-native byte format.
    ///
    /// Applies the model's mirroring and encodes per [`PixelFormat`].
    ///
    /// # Errors
    ///
    /// Returns an error if JPEG encoding fails.
    pub fn to_native(&self, img: &RgbImage) -> Result<Vec<u8>> {
        let mut img = img.clone();
        if self.flip_h {
            img = imageops::flip_horizontal(&img);
        }
        if self.flip_v {
            img = imageops::flip_vertical(&img);
        }

        match self.format {
            PixelFormat::Jpeg => {
                let mut buf = Vec::new();
                let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), 95);
                img.write_with_encoder(encoder)
                    .map_err(|e| DeckError::ImageProcessing(format!("JPEG encode: {e}")))?;
                Ok(buf)
            }
            PixelFormat::Bgr => {
                let mut buf = Vec::with_capacity(img.as_raw().len());
                for pixel in img.pixels() {
                    buf.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
                }
                Ok(buf)
            }
        }
    }
}
