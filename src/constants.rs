// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Default capture tick rate in frames per second
pub const DEFAULT_FPS: u32 = 3;

/// Default JPEG quality for recognizer uploads (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

/// Default preview width in pixels
pub const DEFAULT_PREVIEW_WIDTH: u32 = 640;

/// Default preview height in pixels
pub const DEFAULT_PREVIEW_HEIGHT: u32 = 480;

/// Grace period for draining in-flight background work after stop
pub const SHUTDOWN_GRACE_MS: u64 = 250;
