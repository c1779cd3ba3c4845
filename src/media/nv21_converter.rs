// SPDX-License-Identifier: GPL-3.0-only

//! NV21 to RGB conversion with reusable conversion state
//!
//! The converter keeps its staging buffers and the destination image across
//! calls: once frame dimensions stabilize, a conversion performs no
//! allocation. Buffers are resized and the image recreated only when the
//! frame length or dimensions change.
//!
//! The transform is fixed-point BT.601 limited-range, with each 2x2 pixel
//! block sharing one chroma sample (nearest-neighbour upsampling). This is
//! the default YUV mapping of typical camera stacks; the exact matrix and
//! upsampling choice are platform-defined and treated as an accepted
//! approximation, not part of the contract.

use crate::backends::camera::RawFrame;
use crate::errors::ConvertError;
use image::RgbImage;
use tracing::debug;

/// NV21 to RGB converter with cached conversion resources
///
/// Holds the input staging buffer, the packed RGB output buffer, and the
/// destination image. All three are lazily allocated on first use and only
/// recreated on a dimension change. The converter is exclusively owned by
/// the background worker; it is not shared across contexts.
#[derive(Default)]
pub struct Nv21Converter {
    /// Staging copy of the raw frame, sized to the frame byte length
    input: Vec<u8>,
    /// Packed RGB output, sized to width * height * 3
    output: Vec<u8>,
    /// Destination image, recreated only on a dimension change
    image: Option<RgbImage>,
}

impl Nv21Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a raw NV21 frame into the reused destination image
    ///
    /// Returns the same image instance across calls while dimensions are
    /// unchanged. Fails with [`ConvertError::InvalidLength`] when the frame
    /// byte length does not match its declared dimensions, rather than
    /// running the transform out of bounds.
    pub fn convert(&mut self, raw: &RawFrame) -> Result<&RgbImage, ConvertError> {
        let expected = raw.expected_len();
        if raw.data.len() != expected {
            return Err(ConvertError::InvalidLength {
                expected,
                actual: raw.data.len(),
            });
        }

        let width = raw.width as usize;
        let height = raw.height as usize;

        if self.input.len() != expected {
            debug!(len = expected, "Resizing input staging buffer");
            self.input.clear();
            self.input.resize(expected, 0);
        }
        if self.output.len() != width * height * 3 {
            debug!(width, height, "Resizing RGB output buffer");
            self.output.clear();
            self.output.resize(width * height * 3, 0);
        }

        self.input.copy_from_slice(&raw.data);
        nv21_to_rgb(&self.input, &mut self.output, width, height);

        if self
            .image
            .as_ref()
            .is_none_or(|image| image.dimensions() != (raw.width, raw.height))
        {
            debug!(
                width = raw.width,
                height = raw.height,
                "Creating destination image"
            );
            self.image = Some(RgbImage::new(raw.width, raw.height));
        }
        let image = self
            .image
            .get_or_insert_with(|| RgbImage::new(raw.width, raw.height));
        image.copy_from_slice(&self.output);
        Ok(image)
    }
}

/// Fixed-point BT.601 limited-range NV21 to packed RGB
fn nv21_to_rgb(data: &[u8], rgb: &mut [u8], width: usize, height: usize) {
    let (y_plane, uv_plane) = data.split_at(width * height);
    let uv_stride = 2 * width.div_ceil(2);

    // Two luma rows share one chroma row
    for row in (0..height).step_by(2) {
        let uv_row = row / 2;
        convert_row(y_plane, uv_plane, rgb, row, uv_row, width, uv_stride);
        if row + 1 < height {
            convert_row(y_plane, uv_plane, rgb, row + 1, uv_row, width, uv_stride);
        }
    }
}

#[inline]
fn convert_row(
    y_plane: &[u8],
    uv_plane: &[u8],
    rgb: &mut [u8],
    y_idx: usize,
    uv_row: usize,
    width: usize,
    uv_stride: usize,
) {
    let y_row_start = y_idx * width;
    let uv_row_start = uv_row * uv_stride;
    let rgb_row_start = y_idx * width * 3;

    // Process pixels in pairs sharing one chroma sample
    for x_idx in (0..width).step_by(2) {
        let y_offset = y_row_start + x_idx;
        let uv_offset = uv_row_start + (x_idx / 2) * 2;

        // NV21 interleaves chroma as V,U
        let v = uv_plane[uv_offset] as i32 - 128;
        let u = uv_plane[uv_offset + 1] as i32 - 128;

        let r_v = (179 * v) >> 7;
        let g_u = (44 * u) >> 7;
        let g_v = (91 * v) >> 7;
        let b_u = (227 * u) >> 7;

        let y1 = ((y_plane[y_offset] as i32 - 16) * 149) >> 7;
        let rgb_offset = rgb_row_start + x_idx * 3;
        rgb[rgb_offset] = (y1 + r_v).clamp(0, 255) as u8;
        rgb[rgb_offset + 1] = (y1 - g_u - g_v).clamp(0, 255) as u8;
        rgb[rgb_offset + 2] = (y1 + b_u).clamp(0, 255) as u8;

        if x_idx + 1 < width {
            let y2 = ((y_plane[y_offset + 1] as i32 - 16) * 149) >> 7;
            let rgb_offset2 = rgb_row_start + (x_idx + 1) * 3;
            rgb[rgb_offset2] = (y2 + r_v).clamp(0, 255) as u8;
            rgb[rgb_offset2 + 1] = (y2 - g_u - g_v).clamp(0, 255) as u8;
            rgb[rgb_offset2 + 2] = (y2 + b_u).clamp(0, 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::PixelFormat;

    /// Build a solid-color NV21 frame
    fn solid_frame(width: u32, height: u32, y: u8, v: u8, u: u8) -> RawFrame {
        let format = PixelFormat::Nv21;
        let luma_len = (width * height) as usize;
        let mut data = vec![y; format.frame_len(width, height)];
        for pair in data[luma_len..].chunks_exact_mut(2) {
            pair[0] = v;
            pair[1] = u;
        }
        RawFrame {
            data,
            width,
            height,
            format,
        }
    }

    #[test]
    fn output_dimensions_match_input() {
        let mut converter = Nv21Converter::new();
        let frame = solid_frame(16, 8, 128, 128, 128);
        let image = converter.convert(&frame).unwrap();
        assert_eq!(image.dimensions(), (16, 8));
    }

    #[test]
    fn bt601_spot_values() {
        let mut converter = Nv21Converter::new();

        // Black: Y at the bottom of the limited range
        let image = converter.convert(&solid_frame(4, 4, 16, 128, 128)).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);

        // Neutral mid-gray: (128 - 16) * 149 >> 7 = 130
        let image = converter
            .convert(&solid_frame(4, 4, 128, 128, 128))
            .unwrap();
        assert_eq!(image.get_pixel(2, 2).0, [130, 130, 130]);

        // White: (235 - 16) * 149 >> 7 = 254
        let image = converter
            .convert(&solid_frame(4, 4, 235, 128, 128))
            .unwrap();
        assert_eq!(image.get_pixel(3, 3).0, [254, 254, 254]);

        // BT.601 red (Y=81, V=240, U=90)
        let image = converter.convert(&solid_frame(4, 4, 81, 240, 90)).unwrap();
        assert_eq!(image.get_pixel(1, 1).0, [231, 10, 7]);
    }

    #[test]
    fn destination_image_is_reused_for_same_dimensions() {
        let mut converter = Nv21Converter::new();
        let frame = solid_frame(8, 8, 100, 128, 128);

        let first = converter.convert(&frame).unwrap().as_raw().as_ptr();
        let second = converter.convert(&frame).unwrap().as_raw().as_ptr();
        assert_eq!(first, second, "same dimensions must reuse the image");
    }

    #[test]
    fn staging_buffers_are_reused_for_same_dimensions() {
        let mut converter = Nv21Converter::new();
        let frame = solid_frame(8, 8, 100, 128, 128);

        converter.convert(&frame).unwrap();
        let input_ptr = converter.input.as_ptr();
        let output_ptr = converter.output.as_ptr();

        converter.convert(&frame).unwrap();
        assert_eq!(
            converter.input.as_ptr(),
            input_ptr,
            "same dimensions must reuse the input staging buffer"
        );
        assert_eq!(
            converter.output.as_ptr(),
            output_ptr,
            "same dimensions must reuse the RGB output buffer"
        );

        // a dimension change resizes both buffers to the new frame
        let larger = solid_frame(16, 16, 100, 128, 128);
        converter.convert(&larger).unwrap();
        assert_eq!(converter.input.len(), larger.expected_len());
        assert_eq!(converter.output.len(), 16 * 16 * 3);
    }

    #[test]
    fn dimension_change_recreates_the_image() {
        let mut converter = Nv21Converter::new();

        let image = converter
            .convert(&solid_frame(8, 8, 100, 128, 128))
            .unwrap();
        assert_eq!(image.dimensions(), (8, 8));

        let image = converter
            .convert(&solid_frame(16, 8, 100, 128, 128))
            .unwrap();
        assert_eq!(image.dimensions(), (16, 8));
    }

    #[test]
    fn length_mismatch_fails_fast() {
        let mut converter = Nv21Converter::new();
        let mut frame = solid_frame(8, 8, 100, 128, 128);
        frame.data.pop();

        let err = converter.convert(&frame).unwrap_err();
        assert_eq!(
            err,
            ConvertError::InvalidLength {
                expected: 96,
                actual: 95,
            }
        );
    }

    #[test]
    fn odd_width_converts_all_pixels() {
        let mut converter = Nv21Converter::new();
        let frame = solid_frame(3, 3, 128, 128, 128);
        let image = converter.convert(&frame).unwrap();
        assert_eq!(image.dimensions(), (3, 3));
        assert_eq!(image.get_pixel(2, 2).0, [130, 130, 130]);
    }
}
