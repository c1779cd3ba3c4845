// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding of converted frames for recognizer uploads

use crate::errors::PipelineError;
use image::RgbImage;

/// Encode an RGB image as JPEG at the given quality (1-100)
pub fn encode_rgb_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, PipelineError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);

    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.clamp(1, 100));
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| PipelineError::Encode(format!("JPEG encoding failed: {}", e)))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_jpeg_stream() {
        let image = RgbImage::from_pixel(16, 16, image::Rgb([200, 100, 50]));
        let jpeg = encode_rgb_jpeg(&image, 90).unwrap();
        // SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn lower_quality_does_not_exceed_higher_quality_size() {
        let mut image = RgbImage::new(64, 64);
        for (x, y, px) in image.enumerate_pixels_mut() {
            *px = image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8]);
        }
        let low = encode_rgb_jpeg(&image, 10).unwrap();
        let high = encode_rgb_jpeg(&image, 95).unwrap();
        assert!(low.len() <= high.len());
    }
}
