//! Blur-gated photo capture
//!
//! Takes a snapshot of the video feed, optionally rejects it as blurry, and
//! encodes accepted frames as JPEG ready for upload.

use crate::config::{CaptureConfig, EcoLuminaConfig};
use crate::errors::{CaptureError, DetectionError};
use crate::quality::{BlurDetector, BlurMetrics};
use crate::types::{Frame, PixelFormat};
use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

/// Whether a capture flow runs the blur check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Reject blurry frames (item scanning)
    #[default]
    Strict,
    /// Accept any frame (project verification on flaky networks)
    LenientSkipCheck,
}

impl CaptureMode {
    pub fn checks_blur(self) -> bool {
        matches!(self, CaptureMode::Strict)
    }
}

/// Outcome of the blur check for one frame under a capture mode
#[derive(Debug, Clone, PartialEq)]
pub enum BlurVerdict {
    /// The mode does not run the check
    Skipped,
    Sharp(BlurMetrics),
    Blurry(BlurMetrics),
    /// The check could not measure the frame and fails open
    Unmeasured(DetectionError),
}

impl BlurVerdict {
    /// Only a measured blurry frame blocks a capture
    pub fn blocks_capture(&self) -> bool {
        matches!(self, BlurVerdict::Blurry(_))
    }

    pub fn metrics(&self) -> Option<&BlurMetrics> {
        match self {
            BlurVerdict::Sharp(m) | BlurVerdict::Blurry(m) => Some(m),
            BlurVerdict::Skipped | BlurVerdict::Unmeasured(_) => None,
        }
    }
}

/// An accepted capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedPhoto {
    pub frame_id: String,
    pub width: u32,
    pub height: u32,
    /// Encoded JPEG bytes
    pub jpeg: Vec<u8>,
    pub mode: CaptureMode,
    /// Blur measurement, absent when the check was skipped or failed open
    pub blur: Option<BlurMetrics>,
    pub captured_at: DateTime<Utc>,
}

/// Applies the blur check to captured frames and encodes the ones that pass
#[derive(Debug, Clone, Default)]
pub struct CaptureGate {
    detector: BlurDetector,
    config: CaptureConfig,
}

impl CaptureGate {
    pub fn new(detector: BlurDetector, config: CaptureConfig) -> Self {
        Self { detector, config }
    }

    pub fn from_config(config: &EcoLuminaConfig) -> Self {
        Self::new(
            BlurDetector::new(config.detector.clone()),
            config.capture.clone(),
        )
    }

    pub fn detector(&self) -> &BlurDetector {
        &self.detector
    }

    pub fn default_mode(&self) -> CaptureMode {
        self.config.default_mode
    }

    /// Run the blur check as `mode` dictates, without encoding
    pub fn assess(&self, frame: &Frame, mode: CaptureMode) -> BlurVerdict {
        if !mode.checks_blur() {
            return BlurVerdict::Skipped;
        }
        match self.detector.measure(frame) {
            Ok(metrics) if metrics.is_blurry => BlurVerdict::Blurry(metrics),
            Ok(metrics) => BlurVerdict::Sharp(metrics),
            Err(e) => {
                log::debug!("Blur check failed open for frame {}: {}", frame.id, e);
                BlurVerdict::Unmeasured(e)
            }
        }
    }

    /// Gate and encode a frame.
    ///
    /// Returns `CaptureError::Blurry` with the user-facing retry message when
    /// `mode` is `Strict` and the frame is blurry. A blur check that cannot
    /// produce a measurement never blocks the capture.
    pub fn capture(
        &self,
        frame: &Frame,
        mode: CaptureMode,
    ) -> Result<CapturedPhoto, CaptureError> {
        if frame.is_empty() {
            return Err(CaptureError::EmptyFrame {
                width: frame.width,
                height: frame.height,
            });
        }
        if !frame.is_valid() {
            return Err(CaptureError::InvalidFrame(format!(
                "expected {} bytes for {}x{} {}, got {}",
                frame.expected_len(),
                frame.width,
                frame.height,
                frame.format.as_str(),
                frame.data.len()
            )));
        }

        let blur = match self.assess(frame, mode) {
            BlurVerdict::Blurry(metrics) => {
                log::warn!(
                    "Rejecting blurry frame {} from {}: variance={:.2} < {:.2}",
                    frame.id,
                    frame.source,
                    metrics.variance,
                    metrics.threshold
                );
                return Err(CaptureError::Blurry {
                    message: self.config.blurry_message.clone(),
                    variance: metrics.variance,
                });
            }
            verdict => verdict.metrics().cloned(),
        };

        let jpeg = encode_jpeg(frame, self.config.jpeg_quality)?;
        log::info!(
            "Captured frame {} from {}: {}x{} ({} bytes JPEG, mode={:?})",
            frame.id,
            frame.source,
            frame.width,
            frame.height,
            jpeg.len(),
            mode
        );

        Ok(CapturedPhoto {
            frame_id: frame.id.clone(),
            width: frame.width,
            height: frame.height,
            jpeg,
            mode,
            blur,
            captured_at: frame.timestamp,
        })
    }

    /// Gate and encode with the configured default mode
    pub fn capture_default(&self, frame: &Frame) -> Result<CapturedPhoto, CaptureError> {
        self.capture(frame, self.config.default_mode)
    }

    /// Run `capture` on the blocking pool
    pub async fn capture_async(
        &self,
        frame: Frame,
        mode: CaptureMode,
    ) -> Result<CapturedPhoto, CaptureError> {
        let gate = self.clone();
        tokio::task::spawn_blocking(move || gate.capture(&frame, mode))
            .await
            .map_err(|e| {
                log::error!("Capture task join error: {}", e);
                CaptureError::Task(e.to_string())
            })?
    }
}

/// Encode a frame as JPEG. Alpha is dropped.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let invalid =
        || CaptureError::InvalidFrame("failed to create image from frame data".to_string());

    let rgb = match frame.format {
        PixelFormat::Rgb8 => RgbImage::from_vec(frame.width, frame.height, frame.data.clone())
            .ok_or_else(invalid)?,
        PixelFormat::Rgba8 => {
            let rgba = RgbaImage::from_vec(frame.width, frame.height, frame.data.clone())
                .ok_or_else(invalid)?;
            DynamicImage::ImageRgba8(rgba).to_rgb8()
        }
    };

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    DynamicImage::ImageRgb8(rgb).write_with_encoder(encoder)?;
    Ok(buffer)
}
