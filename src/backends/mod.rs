// SPDX-License-Identifier: GPL-3.0-only

//! Capture source backends

pub mod camera;
