// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic capture source for the demo CLI and tests
//!
//! Fills queued buffers with a moving luma gradient over neutral chroma and
//! delivers them synchronously, standing in for a real camera device.

use super::types::{FrameSender, PixelFormat, RawFrame};
use super::CaptureSource;
use crate::errors::CaptureError;
use tracing::{debug, info};

/// In-process capture source producing generated NV21 frames
pub struct SyntheticSource {
    width: u32,
    height: u32,
    format: PixelFormat,
    frames: Option<FrameSender>,
    frame_index: u64,
}

impl SyntheticSource {
    /// Create a source producing frames at the given resolution
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Nv21,
            frames: None,
            frame_index: 0,
        }
    }

    /// Change the preview resolution. Takes effect for the next queued
    /// buffer; a buffer sized for the old resolution is rejected.
    pub fn set_preview_size(&mut self, width: u32, height: u32) {
        debug!(width, height, "Synthetic source resolution changed");
        self.width = width;
        self.height = height;
    }
}

impl CaptureSource for SyntheticSource {
    fn open(&mut self, frames: FrameSender) -> Result<(), CaptureError> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptureError::OpenFailed(format!(
                "invalid resolution {}x{}",
                self.width, self.height
            )));
        }
        info!(
            width = self.width,
            height = self.height,
            format = %self.format,
            "Opening synthetic capture source"
        );
        self.frames = Some(frames);
        Ok(())
    }

    fn close(&mut self) {
        if self.frames.take().is_some() {
            info!(frames = self.frame_index, "Closed synthetic capture source");
        }
    }

    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn preview_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn queue_buffer(&mut self, mut buffer: Vec<u8>) -> Result<(), CaptureError> {
        let Some(frames) = &self.frames else {
            return Err(CaptureError::SourceClosed);
        };
        let expected = self.format.frame_len(self.width, self.height);
        if buffer.len() != expected {
            return Err(CaptureError::InvalidFormat(format!(
                "buffer length {} does not match frame length {}",
                buffer.len(),
                expected
            )));
        }

        fill_gradient(&mut buffer, self.width, self.height, self.frame_index);
        self.frame_index += 1;

        let frame = RawFrame {
            data: buffer,
            width: self.width,
            height: self.height,
            format: self.format,
        };
        frames.send(frame).map_err(|_| CaptureError::SourceClosed)
    }
}

/// Write a diagonal luma gradient that shifts with the frame index; chroma
/// stays neutral so the frame decodes to gray shades.
fn fill_gradient(buffer: &mut [u8], width: u32, height: u32, frame_index: u64) {
    let luma_len = width as usize * height as usize;
    let (luma, chroma) = buffer.split_at_mut(luma_len);

    for (row, line) in luma.chunks_mut(width as usize).enumerate() {
        for (col, px) in line.iter_mut().enumerate() {
            *px = ((row + col + frame_index as usize * 7) % 220 + 16) as u8;
        }
    }
    chroma.fill(128);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_before_open_fails() {
        let mut source = SyntheticSource::new(4, 4);
        let buffer = vec![0u8; PixelFormat::Nv21.frame_len(4, 4)];
        assert!(matches!(
            source.queue_buffer(buffer),
            Err(CaptureError::SourceClosed)
        ));
    }

    #[test]
    fn zero_resolution_fails_to_open() {
        let mut source = SyntheticSource::new(0, 480);
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        assert!(matches!(
            source.open(tx),
            Err(CaptureError::OpenFailed(_))
        ));
    }

    #[test]
    fn queued_buffer_comes_back_filled() {
        let mut source = SyntheticSource::new(4, 4);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        source.open(tx).unwrap();

        let len = PixelFormat::Nv21.frame_len(4, 4);
        source.queue_buffer(vec![0u8; len]).unwrap();

        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.data.len(), len);
        assert_eq!((frame.width, frame.height), (4, 4));
        // luma written, chroma neutral
        assert!(frame.data[..16].iter().all(|&b| b >= 16));
        assert!(frame.data[16..].iter().all(|&b| b == 128));
    }

    #[test]
    fn mis_sized_buffer_is_rejected() {
        let mut source = SyntheticSource::new(4, 4);
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        source.open(tx).unwrap();
        assert!(matches!(
            source.queue_buffer(vec![0u8; 7]),
            Err(CaptureError::InvalidFormat(_))
        ));
    }
}
