//! Testing utilities for EcoLumina capture
//!
//! Synthetic frames with known sharpness characteristics, for exercising
//! the blur check without a camera.

pub mod synthetic_data;

pub use synthetic_data::{
    checkerboard_frame, gradient_frame, noise_frame, uniform_frame, uniform_rgba_frame,
};
