// SPDX-License-Identifier: GPL-3.0-only

//! Media processing: color conversion and encoding
//!
//! Camera frames arrive in NV21 format (YUV 4:2:0 semi-planar) and must be
//! converted to RGB before they can be encoded for the recognizer. Both
//! steps run on the background worker, never on the coordinating context.
//!
//! # Modules
//!
//! - [`nv21_converter`]: NV21 to RGB conversion with reusable resources
//! - [`jpeg_encoder`]: JPEG encoding of converted frames

pub mod jpeg_encoder;
pub mod nv21_converter;

pub use jpeg_encoder::encode_rgb_jpeg;
pub use nv21_converter::Nv21Converter;
