// SPDX-License-Identifier: GPL-3.0-only

//! Reusable raw-frame buffer management
//!
//! Exactly one capture buffer exists at a time. [`FrameBufferManager`]
//! reuses the held buffer whenever the required length is unchanged and
//! replaces it otherwise, so steady-state capture performs no per-frame
//! allocation. `take`/`put_back` track the hand-off to the capture source
//! and back from the background worker.

use crate::backends::camera::PixelFormat;
use tracing::debug;

/// Owner of the single reusable raw-frame buffer
#[derive(Debug, Default)]
pub struct FrameBufferManager {
    buffer: Option<Vec<u8>>,
    in_flight: bool,
}

impl FrameBufferManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the held buffer, reallocating only if its length no longer
    /// equals `format.frame_len(width, height)`. A replacement buffer is
    /// zero-filled; the stale one is dropped.
    pub fn ensure_buffer(&mut self, width: u32, height: u32, format: PixelFormat) -> &mut Vec<u8> {
        let len = format.frame_len(width, height);
        if self.buffer.as_ref().is_none_or(|buffer| buffer.len() != len) {
            debug!(len, width, height, %format, "Allocating frame buffer");
            self.buffer = Some(vec![0u8; len]);
        }
        self.buffer.get_or_insert_with(|| vec![0u8; len])
    }

    /// Hand the sized buffer to the capture source. The manager holds
    /// nothing until [`put_back`](Self::put_back) returns it.
    pub fn take(&mut self, width: u32, height: u32, format: PixelFormat) -> Vec<u8> {
        let len = format.frame_len(width, height);
        self.in_flight = true;
        match self.buffer.take() {
            Some(buffer) if buffer.len() == len => buffer,
            _ => {
                debug!(len, width, height, %format, "Allocating frame buffer");
                vec![0u8; len]
            }
        }
    }

    /// Return a spent buffer for reuse. Only one buffer lives at a time: if
    /// a buffer is already held (after a [`reset`](Self::reset)), the
    /// returned one is dropped.
    pub fn put_back(&mut self, buffer: Vec<u8>) {
        self.in_flight = false;
        if self.buffer.is_none() {
            self.buffer = Some(buffer);
        }
    }

    /// Whether the buffer is currently with the source or the worker
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether a buffer is on hand
    pub fn is_available(&self) -> bool {
        self.buffer.is_some()
    }

    /// Forget the outstanding buffer, e.g. after a failed submission
    pub fn reset(&mut self) {
        self.buffer = None;
        self.in_flight = false;
    }
}
