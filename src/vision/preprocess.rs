use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::adaptive_threshold;
use std::path::Path;

use super::region::PixelRect;
use crate::error::ExtractError;

/// Decodes an image file.
pub fn load_image(path: &Path) -> Result<DynamicImage, ExtractError> {
    image::open(path).map_err(|source| ExtractError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Converts to greyscale and applies local mean binarization.
///
/// Each pixel is compared against the mean of its `(2r+1)x(2r+1)` neighbourhood,
/// which removes the brightness and contrast differences between screenshot
/// sources. `block_radius == 0` returns the greyscale image unchanged.
pub fn preprocess(img: &DynamicImage, block_radius: u32) -> GrayImage {
    binarize_adaptive(&img.to_luma8(), block_radius)
}

/// Adaptive binarization of an already greyscale buffer.
pub fn binarize_adaptive(gray: &GrayImage, block_radius: u32) -> GrayImage {
    if block_radius == 0 {
        return gray.clone();
    }
    adaptive_threshold(gray, block_radius)
}

/// Inverted fixed-level threshold for quantity text.
///
/// Pixels brighter than `threshold` (the white digits in the game UI) become
/// black, everything else becomes white, which is what Tesseract reads best.
pub fn threshold_bright_text(gray: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in gray.enumerate_pixels() {
        let value = if pixel[0] > threshold { 0u8 } else { 255u8 };
        output.put_pixel(x, y, Luma([value]));
    }

    output
}

/// Crops a clipped pixel rectangle out of a greyscale image.
pub fn crop_rect(gray: &GrayImage, rect: &PixelRect) -> GrayImage {
    image::imageops::crop_imm(gray, rect.x, rect.y, rect.width, rect.height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_crop_rect() {
        let img = GrayImage::from_fn(100, 200, |x, y| Luma([(x + y) as u8]));
        let rect = PixelRect { x: 10, y: 50, width: 50, height: 20 };
        let cropped = crop_rect(&img, &rect);

        assert_eq!(cropped.dimensions(), (50, 20));
        assert_eq!(cropped.get_pixel(0, 0)[0], 60);
    }

    #[test]
    fn test_threshold_bright_text() {
        let mut img = GrayImage::new(3, 1);
        img.put_pixel(0, 0, Luma([100]));
        img.put_pixel(1, 0, Luma([250]));
        img.put_pixel(2, 0, Luma([180]));

        let result = threshold_bright_text(&img, 180);

        assert_eq!(result.get_pixel(0, 0)[0], 255, "Dark pixel should become white");
        assert_eq!(result.get_pixel(1, 0)[0], 0, "Bright pixel should become black");
        assert_eq!(result.get_pixel(2, 0)[0], 255, "Pixel at threshold stays background");
    }

    #[test]
    fn test_preprocess_is_binary_and_same_size() {
        let rgb = RgbImage::from_fn(64, 48, |x, y| {
            let v = ((x * 7 + y * 13) % 256) as u8;
            Rgb([v, v / 2, 255 - v])
        });
        let out = preprocess(&DynamicImage::ImageRgb8(rgb), 3);

        assert_eq!(out.dimensions(), (64, 48));
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_zero_radius_keeps_greyscale() {
        let gray = GrayImage::from_fn(8, 8, |x, _| Luma([x as u8 * 10]));
        let out = preprocess(&DynamicImage::ImageLuma8(gray.clone()), 0);
        assert_eq!(out, gray);
    }

    #[test]
    fn test_load_image_reports_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        match load_image(&path) {
            Err(ExtractError::ImageDecode { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected decode error, got {:?}", other.map(|_| ())),
        }
    }
}
