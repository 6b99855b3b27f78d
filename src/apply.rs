/**
 * Halftone Dithering Module
 *
 * Applies ordered dithering to images using a generated threshold tile.
 * The tile wraps in both directions, so any screen produced by the
 * pipeline halftones an image of any size.
 */

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use std::path::Path;
use thiserror::Error;

use crate::encode::decode_thresh_string;
use crate::threshold::ThresholdArray;

/// RGB color representation
#[derive(Debug, Clone, Copy)]
pub struct Color {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl Color {
    /// Create a new color from RGB values
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string (e.g., "#FF0000" or "FF0000")
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim_start_matches('#');

        if hex.len() != 6 {
            return Err(DitherError::InvalidHexColor(hex.to_string()));
        }

        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|_| DitherError::InvalidHexColor(hex.to_string()))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|_| DitherError::InvalidHexColor(hex.to_string()))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|_| DitherError::InvalidHexColor(hex.to_string()))?;

        Ok(Self { r, g, b })
    }
}

/// Options for dithering
#[derive(Debug, Clone)]
pub struct DitherOptions {
    /// Foreground color (for dark pixels)
    pub foreground: Color,
    /// Background color (for bright pixels)
    pub background: Color,
    /// Optional output width in pixels
    pub width: Option<u32>,
    /// Optional output height in pixels
    pub height: Option<u32>,
    /// Optional contrast adjustment (1.0 = normal)
    pub contrast: Option<f32>,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            foreground: Color::new(0, 0, 0),
            background: Color::new(255, 255, 255),
            width: None,
            height: None,
            contrast: None,
        }
    }
}

/// Error types for dithering
#[derive(Error, Debug)]
pub enum DitherError {
    /// Failed to load or save an image
    #[error("Failed to load image: {0}")]
    ImageLoadError(#[from] image::ImageError),

    /// Invalid hex color string format
    #[error("Invalid hex color: {0}")]
    InvalidHexColor(String),

    /// Could not determine image dimensions
    #[error("Could not determine image dimensions")]
    InvalidDimensions,

    /// Malformed threshold blob
    #[error("Malformed threshold data: {0}")]
    InvalidThresholdData(#[from] crate::error::ScreenError),
}

/// Result type for dithering operations
pub type Result<T> = std::result::Result<T, DitherError>;

/// A threshold tile ready for wrapped lookups
pub struct ScreenTile {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl ScreenTile {
    /// Wrap a threshold array produced by the generation pipeline
    pub fn from_thresholds(thresh: &ThresholdArray) -> Self {
        Self {
            width: thresh.width() as usize,
            height: thresh.height() as usize,
            data: thresh.as_slice().to_vec(),
        }
    }

    /// Parse a raw ThreshString blob (4-byte big-endian header plus
    /// row-major thresholds)
    pub fn from_thresh_string(blob: &[u8]) -> Result<Self> {
        let (width, height, data) = decode_thresh_string(blob)?;
        Ok(Self {
            data,
            width: width as usize,
            height: height as usize,
        })
    }

    /// Load a threshold tile from a grayscale image file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path)?;
        let gray = img.to_luma8();
        let (width, height) = gray.dimensions();

        if width == 0 || height == 0 {
            return Err(DitherError::InvalidDimensions);
        }

        Ok(Self {
            data: gray.into_raw(),
            width: width as usize,
            height: height as usize,
        })
    }

    /// Get the threshold at the given coordinates (with tiling)
    #[inline]
    fn get(&self, x: u32, y: u32) -> u8 {
        let wrap_x = (x as usize) % self.width;
        let wrap_y = (y as usize) % self.height;
        self.data[wrap_y * self.width + wrap_x]
    }
}

/// Save a threshold tile to a grayscale PNG for visual inspection
pub fn save_thresholds_to_png<P: AsRef<Path>>(thresh: &ThresholdArray, filename: P) -> Result<()> {
    let img: GrayImage =
        ImageBuffer::from_fn(thresh.width(), thresh.height(), |x, y| Luma([thresh.get(x, y)]));

    img.save(&filename)?;

    Ok(())
}

/// Apply contrast adjustment to an image
fn apply_contrast(img: DynamicImage, contrast: f32) -> DynamicImage {
    let mut rgb = img.to_rgb8();
    let factor = contrast;
    let offset = 128.0 * (1.0 - factor);

    for pixel in rgb.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let value = *channel as f32;
            let adjusted = (value * factor + offset).clamp(0.0, 255.0);
            *channel = adjusted as u8;
        }
    }

    DynamicImage::ImageRgb8(rgb)
}

/// Halftone a grayscale buffer against a screen tile. A pixel renders as
/// foreground (ink) when its gray value is below the tile's threshold at
/// that position, so pure white never inks and pure black always does.
pub fn ordered_dither(
    gray: &image::GrayImage,
    tile: &ScreenTile,
    options: &DitherOptions,
) -> RgbImage {
    let (width, height) = gray.dimensions();
    let mut output: RgbImage = ImageBuffer::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let pixel_luma = gray.get_pixel(x, y).0[0];
            let threshold = tile.get(x, y);

            let color = if pixel_luma >= threshold {
                options.background
            } else {
                options.foreground
            };

            output.put_pixel(x, y, Rgb([color.r, color.g, color.b]));
        }
    }

    output
}

/// Apply halftone dithering to an image file
pub fn apply_dithering<P: AsRef<Path>>(
    input_path: P,
    output_path: P,
    tile: &ScreenTile,
    options: DitherOptions,
) -> Result<()> {
    let mut img = image::open(input_path)?;

    // Resize if requested
    if let (Some(width), Some(height)) = (options.width, options.height) {
        img = img.resize(width, height, image::imageops::FilterType::Lanczos3);
    } else if let Some(width) = options.width {
        img = img.resize(width, u32::MAX, image::imageops::FilterType::Lanczos3);
    } else if let Some(height) = options.height {
        img = img.resize(u32::MAX, height, image::imageops::FilterType::Lanczos3);
    }

    if let Some(contrast) = options.contrast {
        img = apply_contrast(img, contrast);
    }

    let gray = img.to_luma8();
    let output = ordered_dither(&gray, tile, &options);

    output.save(output_path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ScreenParams;
    use crate::screen::generate_thresholds;

    #[test]
    fn test_color_from_hex() {
        let black = Color::from_hex("#000000").unwrap();
        assert_eq!(black.r, 0);
        assert_eq!(black.g, 0);
        assert_eq!(black.b, 0);

        let white = Color::from_hex("#ffffff").unwrap();
        assert_eq!(white.r, 255);
        assert_eq!(white.g, 255);
        assert_eq!(white.b, 255);

        // Test without # prefix
        let blue = Color::from_hex("0000ff").unwrap();
        assert_eq!(blue.r, 0);
        assert_eq!(blue.g, 0);
        assert_eq!(blue.b, 255);

        // Test case insensitivity
        let green = Color::from_hex("#00FF00").unwrap();
        assert_eq!(green.r, 0);
        assert_eq!(green.g, 255);
        assert_eq!(green.b, 0);
    }

    #[test]
    fn test_color_from_hex_invalid() {
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#fffffff").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_dither_options_default() {
        let options = DitherOptions::default();
        assert_eq!(options.foreground.r, 0);
        assert_eq!(options.background.r, 255);
        assert!(options.width.is_none());
        assert!(options.height.is_none());
        assert!(options.contrast.is_none());
    }

    #[test]
    fn test_tile_wraps() {
        let tile = ScreenTile {
            data: vec![10, 20, 30, 40],
            width: 2,
            height: 2,
        };
        assert_eq!(tile.get(0, 0), 10);
        assert_eq!(tile.get(2, 0), 10);
        assert_eq!(tile.get(3, 3), 40);
        assert_eq!(tile.get(5, 2), 20);
    }

    #[test]
    fn test_tile_from_thresh_string() {
        let blob = [0, 2, 0, 1, 7, 9];
        let tile = ScreenTile::from_thresh_string(&blob).unwrap();
        assert_eq!((tile.width, tile.height), (2, 1));
        assert_eq!(tile.get(0, 0), 7);
        assert_eq!(tile.get(1, 0), 9);

        assert!(ScreenTile::from_thresh_string(&[0, 2]).is_err());
    }

    #[test]
    fn test_ordered_dither_extremes() {
        let params = ScreenParams {
            frequency: 100.0,
            ..Default::default()
        };
        let thresh = generate_thresholds(&params).unwrap();
        let tile = ScreenTile::from_thresholds(&thresh);
        let options = DitherOptions::default();

        let white = image::GrayImage::from_pixel(8, 8, image::Luma([255]));
        let out = ordered_dither(&white, &tile, &options);
        assert!(out.pixels().all(|p| p.0 == [255, 255, 255]));

        let black = image::GrayImage::from_pixel(8, 8, image::Luma([0]));
        let out = ordered_dither(&black, &tile, &options);
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_ordered_dither_midtone_mixes() {
        let params = ScreenParams {
            frequency: 75.0,
            angle: 45.0,
            ..Default::default()
        };
        let thresh = generate_thresholds(&params).unwrap();
        let tile = ScreenTile::from_thresholds(&thresh);
        let options = DitherOptions::default();

        let mid = image::GrayImage::from_pixel(32, 32, image::Luma([128]));
        let out = ordered_dither(&mid, &tile, &options);
        let dark = out.pixels().filter(|p| p.0 == [0, 0, 0]).count();
        let light = out.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        assert!(dark > 0 && light > 0);
        assert_eq!(dark + light, 32 * 32);
    }
}
