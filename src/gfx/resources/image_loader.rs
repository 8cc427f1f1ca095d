//! Image decoding for textures
//!
//! Decodes image files into 8-bit RGB or RGBA pixel data, flipped so the
//! first row is the bottom of the image (textures are authored assuming a
//! bottom-left origin).

use std::path::Path;

use super::texture_registry::TextureError;

/// Decoded pixel data ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// 3 for RGB, 4 for RGBA
    pub channels: u8,
    /// Tightly packed rows, bottom row first
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Returns the pixels as RGBA8, expanding RGB with an opaque alpha
    pub fn to_rgba8(&self) -> Vec<u8> {
        match self.channels {
            4 => self.pixels.clone(),
            _ => self
                .pixels
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
                .collect(),
        }
    }
}

/// Decodes the image at `path`
///
/// # Errors
/// `TextureError::Decode` when the file is missing or not a readable image,
/// `TextureError::UnsupportedChannels` when it is neither RGB nor RGBA.
pub fn decode_image(path: &Path) -> Result<DecodedImage, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let channels = image.color().channel_count();
    let (width, height) = (image.width(), image.height());
    let flipped = image.flipv();

    let pixels = match channels {
        3 => flipped.into_rgb8().into_raw(),
        4 => flipped.into_rgba8().into_raw(),
        _ => {
            return Err(TextureError::UnsupportedChannels {
                path: path.to_path_buf(),
                channels,
            })
        }
    };

    Ok(DecodedImage {
        width,
        height,
        channels,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_decode_flips_vertically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stripes.png");
        // Top row red, bottom row blue
        RgbImage::from_fn(2, 2, |_, y| {
            if y == 0 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        })
        .save(&path)
        .unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!((decoded.width, decoded.height, decoded.channels), (2, 2, 3));
        assert_eq!(&decoded.pixels[0..3], &[0, 0, 255]);
        assert_eq!(&decoded.pixels[6..9], &[255, 0, 0]);
    }

    #[test]
    fn test_decode_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glass.png");
        RgbaImage::from_pixel(3, 1, Rgba([10, 20, 30, 40])).save(&path).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!(decoded.channels, 4);
        assert_eq!(decoded.pixels.len(), 12);
        assert_eq!(decoded.to_rgba8(), decoded.pixels);
    }

    #[test]
    fn test_rgb_expands_to_rgba() {
        let decoded = DecodedImage {
            width: 2,
            height: 1,
            channels: 3,
            pixels: vec![1, 2, 3, 4, 5, 6],
        };
        assert_eq!(decoded.to_rgba8(), vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_grayscale_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(4, 4, Luma([128])).save(&path).unwrap();

        assert!(matches!(
            decode_image(&path),
            Err(TextureError::UnsupportedChannels { channels: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = decode_image(&dir.path().join("missing.jpg"));
        assert!(matches!(result, Err(TextureError::Decode { .. })));
    }
}
