// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview capture and recognition pipeline
//!
//! This library captures raw NV21 preview frames from a pluggable capture
//! source at a fixed tick rate, converts them to RGB on a background
//! worker, JPEG-encodes the result, and feeds it to a recognition sink
//! that accumulates recognized text.
//!
//! # Architecture
//!
//! - [`backends`]: capture source abstraction and the synthetic source
//! - [`media`]: NV21 to RGB conversion and JPEG encoding
//! - [`pipeline`]: frame buffer management, the capture ticker, the
//!   background recognizer, and the coordinating event loop
//! - [`config`]: pipeline configuration
//!
//! The single reusable frame buffer circulates manager → source → worker →
//! manager, so steady-state capture performs no per-frame allocation.

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod media;
pub mod pipeline;

// Re-export commonly used types
pub use backends::camera::{CaptureSource, PixelFormat, RawFrame, SyntheticSource};
pub use config::Config;
pub use errors::{CaptureError, ConvertError, PipelineError, PipelineResult};
pub use media::Nv21Converter;
pub use pipeline::{
    CapturePipeline, CaptureTicker, FrameBufferManager, PipelineEvent, PipelineObserver,
    RecognitionSink, StubSink,
};
