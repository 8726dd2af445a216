//! Core types for source bitmaps and normalized frames.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::EncodeError;

/// Color model of a source bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorModel {
    /// 8-bit RGB, 3 bytes per pixel.
    Rgb8,
    /// 8-bit RGB with straight (non-premultiplied) alpha, 4 bytes per pixel.
    Rgba8,
    /// 8-bit grayscale, 1 byte per pixel.
    Luma8,
    /// 8-bit grayscale with alpha, 2 bytes per pixel.
    LumaA8,
    /// 8-bit palette indices, 1 byte per pixel.
    /// Palette entries are RGBA so transparent entries can be represented.
    Indexed {
        /// Color table addressed by the pixel indices.
        palette: Vec<[u8; 4]>,
    },
}

impl ColorModel {
    /// Bytes used by one pixel in the source buffer.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            ColorModel::Rgb8 => 3,
            ColorModel::Rgba8 => 4,
            ColorModel::Luma8 => 1,
            ColorModel::LumaA8 => 2,
            ColorModel::Indexed { .. } => 1,
        }
    }

    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ColorModel::Rgb8 => "rgb8",
            ColorModel::Rgba8 => "rgba8",
            ColorModel::Luma8 => "luma8",
            ColorModel::LumaA8 => "lumaa8",
            ColorModel::Indexed { .. } => "indexed",
        }
    }
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// A decoded bitmap supplied by the caller.
///
/// The encoder only reads it. Use [`SourceImage::validate`] (called by the
/// normalizer) to check that the buffer matches the declared geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Layout of `pixels`.
    pub color_model: ColorModel,
    /// Pixel data in row-major order, `bytes_per_pixel` bytes per pixel.
    pub pixels: Vec<u8>,
}

impl SourceImage {
    /// Create a source image without validating it.
    pub fn new(width: u32, height: u32, color_model: ColorModel, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            color_model,
            pixels,
        }
    }

    /// Convenience constructor for tightly packed RGB data.
    pub fn rgb(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::new(width, height, ColorModel::Rgb8, pixels)
    }

    /// Convenience constructor for tightly packed RGBA data (e.g. canvas `ImageData`).
    pub fn rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::new(width, height, ColorModel::Rgba8, pixels)
    }

    /// Build a source image from an `image::DynamicImage`.
    ///
    /// 8-bit RGB, RGBA, grayscale and grayscale+alpha images keep their color
    /// model. Wider sample formats (16-bit, float) are converted to 8-bit RGBA
    /// when they carry alpha and to 8-bit RGB otherwise.
    pub fn from_dynamic_image(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (color_model, pixels) = match img {
            DynamicImage::ImageRgb8(buf) => (ColorModel::Rgb8, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (ColorModel::Rgba8, buf.into_raw()),
            DynamicImage::ImageLuma8(buf) => (ColorModel::Luma8, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (ColorModel::LumaA8, buf.into_raw()),
            other if other.color().has_alpha() => (ColorModel::Rgba8, other.to_rgba8().into_raw()),
            other => (ColorModel::Rgb8, other.to_rgb8().into_raw()),
        };
        Self {
            width,
            height,
            color_model,
            pixels,
        }
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Check that dimensions, buffer length and palette indices are consistent.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::InvalidImage` describing the first problem found.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.width == 0 || self.height == 0 {
            return Err(EncodeError::InvalidImage(format!(
                "dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        let expected = usize::try_from(self.pixel_count())
            .ok()
            .and_then(|count| count.checked_mul(self.color_model.bytes_per_pixel()))
            .ok_or_else(|| {
                EncodeError::InvalidImage(format!(
                    "{}x{} image is too large to address",
                    self.width, self.height
                ))
            })?;
        if self.pixels.len() != expected {
            return Err(EncodeError::InvalidImage(format!(
                "expected {} bytes for {}x{} {}, got {}",
                expected,
                self.width,
                self.height,
                self.color_model.name(),
                self.pixels.len()
            )));
        }

        if let ColorModel::Indexed { palette } = &self.color_model {
            if palette.is_empty() {
                return Err(EncodeError::InvalidImage("palette is empty".to_string()));
            }
            if let Some(&index) = self.pixels.iter().find(|&&i| usize::from(i) >= palette.len()) {
                return Err(EncodeError::InvalidImage(format!(
                    "palette index {} out of range for {} entries",
                    index,
                    palette.len()
                )));
            }
        }

        Ok(())
    }
}

/// An opaque 3-channel frame, the only shape the encode step accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl RgbFrame {
    /// Create a new RgbFrame with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an RgbFrame from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }
}
