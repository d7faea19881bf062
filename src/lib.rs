//! EcoLumina capture: blur-gated photo capture for waste scanning
//!
//! Decides whether a snapshot of the camera feed is sharp enough to send
//! for classification, using the variance of the Laplacian over a
//! downscaled grayscale copy of the frame.
//!
//! # Features
//! - Fail-open blur detection with tunable threshold and downscale factor
//! - Per-flow capture modes (strict scanning, lenient verification)
//! - JPEG encoding of accepted captures
//! - TOML configuration
//!
//! # Usage
//! ```rust,ignore
//! use ecolumina_capture::{CaptureGate, CaptureMode, Frame};
//!
//! let gate = CaptureGate::default();
//! let frame = Frame::from_rgba(pixels, 1280, 720, "rear".to_string());
//! match gate.capture(&frame, CaptureMode::Strict) {
//!     Ok(photo) => upload(photo.jpeg),
//!     Err(e) if e.is_blurry() => show_retry(e.to_string()),
//!     Err(e) => log::error!("capture failed: {}", e),
//! }
//! ```
pub mod capture;
pub mod config;
pub mod errors;
pub mod quality;
pub mod types;

// Testing utilities - synthetic frames for offline testing
pub mod testing;

// Re-exports for convenience
pub use capture::{BlurVerdict, CaptureGate, CaptureMode, CapturedPhoto};
pub use config::EcoLuminaConfig;
pub use errors::{CaptureError, ConfigError, DetectionError};
pub use quality::{BlurConfig, BlurDetector, BlurMetrics};
pub use types::{Frame, PixelFormat};

/// Initialize logging
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "ecolumina_capture=info");
    }
    let _ = env_logger::try_init();
}

/// Crate version, printed by `ecolumina-cli --version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
