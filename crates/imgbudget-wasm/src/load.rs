//! Image file loading for the browser front end.
//!
//! The core encoder starts from decoded pixels; this module is the loader that
//! gets there from user-supplied PNG/JPEG bytes. EXIF orientation is applied
//! so that phone photos reach the model upright.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};
use imgbudget_core::{
    encode_within_budget, EncodeError, EncodedImage, EncoderConfig, SourceImage,
};

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Decode image file bytes into a `SourceImage`, applying EXIF orientation.
///
/// # Errors
///
/// Returns `EncodeError::InvalidImage` if the bytes are empty, the format is
/// not recognized, or the file is corrupted.
pub fn load_source_image(bytes: &[u8]) -> Result<SourceImage, EncodeError> {
    if bytes.is_empty() {
        return Err(EncodeError::InvalidImage("image file is empty".to_string()));
    }

    let orientation = read_orientation(bytes);

    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| EncodeError::InvalidImage(format!("cannot read image: {}", e)))?
        .decode()
        .map_err(|e| EncodeError::InvalidImage(format!("cannot decode image: {}", e)))?;

    Ok(SourceImage::from_dynamic_image(apply_orientation(img, orientation)))
}

/// Load file bytes and run the budgeted encode on them.
pub(crate) fn encode_file(
    bytes: &[u8],
    config: &EncoderConfig,
) -> Result<EncodedImage, EncodeError> {
    let source = load_source_image(bytes)?;
    encode_within_budget(&source, config)
}

/// Read the EXIF orientation tag. Files without EXIF are `Normal`.
fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgbudget_core::{Candidate, ColorModel};

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    /// 2x1 frame: red on the left, green on the right.
    fn red_green_pair() -> DynamicImage {
        let pixels = vec![255, 0, 0, 0, 255, 0];
        DynamicImage::ImageRgb8(image::RgbImage::from_raw(2, 1, pixels).unwrap())
    }

    fn jpeg_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_load_png_keeps_alpha_model() {
        let img = image::RgbaImage::from_pixel(8, 6, image::Rgba([10, 20, 30, 0]));
        let source = load_source_image(&png_bytes(DynamicImage::ImageRgba8(img))).unwrap();

        assert_eq!((source.width, source.height), (8, 6));
        assert_eq!(source.color_model, ColorModel::Rgba8);
        assert_eq!(&source.pixels[0..4], &[10, 20, 30, 0]);
    }

    #[test]
    fn test_load_jpeg_is_rgb() {
        let img = image::RgbImage::from_pixel(16, 16, image::Rgb([200, 100, 50]));
        let source = load_source_image(&jpeg_bytes(DynamicImage::ImageRgb8(img))).unwrap();

        assert_eq!((source.width, source.height), (16, 16));
        assert_eq!(source.color_model, ColorModel::Rgb8);
    }

    #[test]
    fn test_load_grayscale_png() {
        let img = image::GrayImage::from_pixel(4, 4, image::Luma([99]));
        let source = load_source_image(&png_bytes(DynamicImage::ImageLuma8(img))).unwrap();
        assert_eq!(source.color_model, ColorModel::Luma8);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let err = load_source_image(&[0x00, 0x01, 0x02, 0x03]).unwrap_err();
        assert_eq!(err.kind(), "InvalidImage");
    }

    #[test]
    fn test_load_rejects_empty() {
        assert!(matches!(
            load_source_image(&[]),
            Err(EncodeError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_load_rejects_truncated_png() {
        let img = image::RgbImage::from_pixel(32, 32, image::Rgb([1, 2, 3]));
        let bytes = png_bytes(DynamicImage::ImageRgb8(img));
        assert!(load_source_image(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn test_orientation_without_exif_is_normal() {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]));
        assert_eq!(
            read_orientation(&png_bytes(DynamicImage::ImageRgb8(img))),
            Orientation::Normal
        );
        assert_eq!(read_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let img = red_green_pair();
        let rotated = apply_orientation(img, Orientation::Rotate90CW).into_rgb8();

        assert_eq!(rotated.dimensions(), (1, 2));
        // Left pixel ends up on top after a clockwise turn
        assert_eq!(rotated.get_pixel(0, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let img = red_green_pair();
        let flipped = apply_orientation(img, Orientation::FlipHorizontal).into_rgb8();
        assert_eq!(flipped.get_pixel(0, 0).0, [0, 255, 0]);
    }

    #[test]
    fn test_encode_file_end_to_end() {
        let img = image::RgbaImage::from_pixel(40, 30, image::Rgba([0, 128, 255, 128]));
        let bytes = png_bytes(DynamicImage::ImageRgba8(img));
        let result = encode_file(&bytes, &EncoderConfig::default()).unwrap();

        assert_eq!(result.candidate, Candidate::new(1.0, 85));
        assert_eq!((result.width, result.height), (40, 30));
        assert!(result.data.starts_with("/9j/"), "base64 JPEG starts with the SOI marker");
    }
}
