// SPDX-License-Identifier: GPL-3.0-only

//! Capture source abstraction
//!
//! A capture source is the external collaborator that owns the actual
//! device. The core only needs four things from it: lifecycle control,
//! format and resolution queries, and a way to submit the reusable frame
//! buffer for the next fill. Filled frames come back over the frame channel
//! handed to [`CaptureSource::open`].

pub mod synthetic;
pub mod types;

pub use synthetic::SyntheticSource;
pub use types::{FrameReceiver, FrameSender, PixelFormat, RawFrame};

use crate::errors::CaptureError;

/// A device that fills caller-supplied buffers with preview frames
pub trait CaptureSource: Send {
    /// Open the underlying device and register the frame delivery channel.
    ///
    /// Open failure is terminal for the core: it never retries, it simply
    /// stops receiving frames.
    fn open(&mut self, frames: FrameSender) -> Result<(), CaptureError>;

    /// Release the underlying device. Buffers still held by the source are
    /// dropped.
    fn close(&mut self);

    /// Pixel format of the frames this source produces
    fn pixel_format(&self) -> PixelFormat;

    /// Current preview resolution as (width, height)
    fn preview_size(&self) -> (u32, u32);

    /// Submit a buffer for the next fill
    ///
    /// The source owns the buffer until it delivers the filled frame on the
    /// frame channel. The buffer length must match
    /// `pixel_format().frame_len(width, height)`.
    fn queue_buffer(&mut self, buffer: Vec<u8>) -> Result<(), CaptureError>;
}
