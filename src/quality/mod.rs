/// Capture quality checks
///
/// Provides the blur check used to reject unusable photos before upload.
pub mod blur;

pub use blur::{
    laplacian_stats, luminance, scratch_dimensions, BlurConfig, BlurDetector, BlurMetrics,
    LaplacianStats, ResampleFilter, DEFAULT_BLUR_THRESHOLD, DEFAULT_DOWNSCALE_FACTOR,
};
