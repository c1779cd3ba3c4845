// SPDX-License-Identifier: GPL-3.0-only
// Shared types for capture sources

//! Shared types for capture sources

use serde::{Deserialize, Serialize};

/// Raw sensor pixel format of captured frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PixelFormat {
    /// 8-bit YUV 4:2:0 semi-planar: a full-resolution luma plane followed by
    /// an interleaved half-resolution chroma plane in V,U order
    #[default]
    Nv21,
}

impl PixelFormat {
    /// Average bits per pixel of the format
    pub fn bits_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::Nv21 => 12,
        }
    }

    /// Exact byte length of one frame at the given dimensions
    ///
    /// Odd dimensions round the chroma plane up, matching how camera stacks
    /// lay out 4:2:0 data.
    pub fn frame_len(&self, width: u32, height: u32) -> usize {
        match self {
            PixelFormat::Nv21 => {
                let luma = width as usize * height as usize;
                let chroma = 2 * (width as usize).div_ceil(2) * (height as usize).div_ceil(2);
                luma + chroma
            }
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelFormat::Nv21 => write!(f, "NV21"),
        }
    }
}

/// One captured frame in raw sensor-native format
///
/// The buffer is owned: the capture source holds it between submission and
/// delivery, the background worker holds it during conversion, and it
/// returns to the frame buffer manager afterwards for reuse.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Frame bytes in `format` layout
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format of `data`
    pub format: PixelFormat,
}

impl RawFrame {
    /// Byte length required by the declared dimensions and format
    pub fn expected_len(&self) -> usize {
        self.format.frame_len(self.width, self.height)
    }

    /// Consume the frame, recovering the buffer for reuse
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Frame sender type for delivering filled frames to the coordinating context
pub type FrameSender = tokio::sync::mpsc::UnboundedSender<RawFrame>;

/// Frame receiver type for the coordinating context
pub type FrameReceiver = tokio::sync::mpsc::UnboundedReceiver<RawFrame>;
