//! Blur detection using the variance of the Laplacian
//!
//! The frame is downscaled, converted to grayscale and filtered with the
//! 4-neighbour Laplacian stencil. Sharp frames produce a wide spread of
//! Laplacian responses; blurry frames produce a narrow one.

use crate::errors::DetectionError;
use crate::types::{Frame, PixelFormat};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Pixel, Rgb, Rgba};
use serde::{Deserialize, Serialize};

/// Variance below which a frame is treated as blurry. Lower is more lenient.
pub const DEFAULT_BLUR_THRESHOLD: f64 = 30.0;

/// Fraction of the source dimensions used for the scratch buffer.
pub const DEFAULT_DOWNSCALE_FACTOR: f64 = 0.2;

/// Filter used when producing the scratch buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Point sampling; keeps single-pixel detail like a canvas `drawImage` downscale
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
}

impl ResampleFilter {
    fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
        }
    }
}

/// Blur detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Laplacian variance below this marks the frame as blurry
    pub threshold: f64,
    /// Scratch buffer size relative to the source, in (0, 1]
    pub downscale_factor: f64,
    pub filter: ResampleFilter,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BLUR_THRESHOLD,
            downscale_factor: DEFAULT_DOWNSCALE_FACTOR,
            filter: ResampleFilter::default(),
        }
    }
}

/// Result of a single blur measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlurMetrics {
    /// Variance of the Laplacian response
    pub variance: f64,
    /// Mean Laplacian response
    pub mean: f64,
    /// Number of interior samples evaluated
    pub sample_count: u64,
    pub scratch_width: u32,
    pub scratch_height: u32,
    /// Threshold the decision was made against
    pub threshold: f64,
    pub is_blurry: bool,
}

/// Running sums over the Laplacian responses of a grayscale grid
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaplacianStats {
    pub sum: f64,
    pub sum_sq: f64,
    pub count: u64,
}

impl LaplacianStats {
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        self.sum_sq / self.count as f64 - mean * mean
    }
}

/// Laplacian-variance blur detector
///
/// Stateless apart from its configuration; every call allocates its own
/// scratch buffer, so one detector can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct BlurDetector {
    config: BlurConfig,
}

impl BlurDetector {
    pub fn new(config: BlurConfig) -> Self {
        Self { config }
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self::new(BlurConfig {
            threshold,
            ..BlurConfig::default()
        })
    }

    pub fn config(&self) -> &BlurConfig {
        &self.config
    }

    /// Whether the frame should be rejected as blurry.
    ///
    /// Fails open: any measurement error, including a scratch buffer too
    /// small to have interior samples, returns `false`.
    pub fn is_blurry(&self, frame: &Frame) -> bool {
        self.is_blurry_raw(&frame.data, frame.width, frame.height, frame.format)
    }

    pub fn is_blurry_raw(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> bool {
        match self.measure_raw(data, width, height, format) {
            Ok(metrics) => metrics.is_blurry,
            Err(e) => {
                log::debug!("Blur check skipped, accepting frame: {}", e);
                false
            }
        }
    }

    pub fn measure(&self, frame: &Frame) -> Result<BlurMetrics, DetectionError> {
        self.measure_raw(&frame.data, frame.width, frame.height, frame.format)
    }

    /// Compute the Laplacian variance of a packed RGB/RGBA buffer
    pub fn measure_raw(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<BlurMetrics, DetectionError> {
        if width == 0 || height == 0 {
            return Err(DetectionError::EmptyFrame { width, height });
        }

        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(DetectionError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let (scratch_width, scratch_height) =
            scratch_dimensions(width, height, self.config.downscale_factor)?;
        let filter = self.config.filter.filter_type();

        let gray = match format {
            PixelFormat::Rgb8 => {
                let view = ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(width, height, data)
                    .ok_or_else(|| {
                        DetectionError::ScratchAllocation("source view rejected".to_string())
                    })?;
                grayscale_scratch(&view, scratch_width, scratch_height, filter)
            }
            PixelFormat::Rgba8 => {
                let view = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(width, height, data)
                    .ok_or_else(|| {
                        DetectionError::ScratchAllocation("source view rejected".to_string())
                    })?;
                grayscale_scratch(&view, scratch_width, scratch_height, filter)
            }
        };

        let stats = laplacian_stats(&gray, scratch_width, scratch_height)?;
        if stats.count == 0 {
            return Err(DetectionError::NoInteriorSamples {
                width: scratch_width,
                height: scratch_height,
            });
        }

        let variance = stats.variance();
        let metrics = BlurMetrics {
            variance,
            mean: stats.mean(),
            sample_count: stats.count,
            scratch_width,
            scratch_height,
            threshold: self.config.threshold,
            is_blurry: variance < self.config.threshold,
        };

        log::debug!(
            "Blur metrics {}x{} -> {}x{}: variance={:.2} threshold={:.2} blurry={}",
            width,
            height,
            scratch_width,
            scratch_height,
            metrics.variance,
            metrics.threshold,
            metrics.is_blurry
        );

        Ok(metrics)
    }
}

/// Scratch buffer size for a source of `width` x `height`
///
/// Each side is `floor(side * scale)`, never less than 1.
pub fn scratch_dimensions(
    width: u32,
    height: u32,
    scale: f64,
) -> Result<(u32, u32), DetectionError> {
    if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
        return Err(DetectionError::InvalidScaleFactor(scale));
    }

    let w = ((width as f64 * scale).floor() as u32).max(1);
    let h = ((height as f64 * scale).floor() as u32).max(1);
    Ok((w, h))
}

/// ITU-R BT.601 luma
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Accumulate 4-neighbour Laplacian responses over the interior of a
/// row-major grayscale grid. Grids narrower or shorter than 3 yield zero samples.
pub fn laplacian_stats(
    gray: &[f64],
    width: u32,
    height: u32,
) -> Result<LaplacianStats, DetectionError> {
    let w = width as usize;
    let h = height as usize;

    if gray.len() != w * h {
        return Err(DetectionError::BufferSizeMismatch {
            expected: w * h,
            actual: gray.len(),
        });
    }

    let mut stats = LaplacianStats::default();
    if w < 3 || h < 3 {
        return Ok(stats);
    }

    // Border rows and columns are skipped so every neighbour is in bounds
    for y in 1..h - 1 {
        let row = y * w;
        for x in 1..w - 1 {
            let idx = row + x;
            let laplacian =
                4.0 * gray[idx] - gray[idx - w] - gray[idx + w] - gray[idx - 1] - gray[idx + 1];
            stats.sum += laplacian;
            stats.sum_sq += laplacian * laplacian;
            stats.count += 1;
        }
    }

    Ok(stats)
}

fn grayscale_scratch<P>(
    view: &ImageBuffer<P, &[u8]>,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Vec<f64>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let scratch = imageops::resize(view, width, height, filter);
    scratch
        .pixels()
        .map(|p| {
            let [r, g, b] = p.to_rgb().0;
            luminance(r, g, b)
        })
        .collect()
}
