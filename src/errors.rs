use thiserror::Error;

/// Internal failures of the blur metric. Never surfaced by `BlurDetector::is_blurry`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error("Empty frame: {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },

    #[error("Frame buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Invalid downscale factor: {0}")]
    InvalidScaleFactor(f64),

    #[error("Failed to allocate scratch buffer: {0}")]
    ScratchAllocation(String),

    #[error("Scratch buffer {width}x{height} has no interior samples")]
    NoInteriorSamples { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Frame has no dimensions yet: {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Rejected by the blur check; `message` is meant for the user.
    #[error("{message}")]
    Blurry { message: String, variance: f64 },

    #[error("Encoding error: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("Capture task failed: {0}")]
    Task(String),
}

impl CaptureError {
    pub fn is_blurry(&self) -> bool {
        matches!(self, CaptureError::Blurry { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
