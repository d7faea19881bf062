use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel layout of a frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Packed 8-bit red, green, blue
    Rgb8,
    /// Packed 8-bit red, green, blue, alpha (canvas `getImageData` layout)
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PixelFormat::Rgb8 => "RGB8",
            PixelFormat::Rgba8 => "RGBA8",
        }
    }
}

/// A single snapshot of the video feed, as drawn onto the capture canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub id: String,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl Frame {
    /// Wrap an RGB8 buffer
    pub fn new(data: Vec<u8>, width: u32, height: u32, source: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            data,
            width,
            height,
            format: PixelFormat::Rgb8,
            source,
            timestamp: Utc::now(),
        }
    }

    /// Wrap an RGBA8 buffer
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32, source: String) -> Self {
        Self::new(data, width, height, source).with_format(PixelFormat::Rgba8)
    }

    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// Number of bytes a buffer of these dimensions and format must hold
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Non-empty and the buffer length matches the dimensions exactly
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.data.len() == self.expected_len()
    }
}
