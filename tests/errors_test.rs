#[cfg(test)]
mod error_tests {
    use ecolumina_capture::errors::{CaptureError, ConfigError, DetectionError};
    use std::error::Error;

    #[test]
    fn test_detection_error_display() {
        let error = DetectionError::BufferSizeMismatch {
            expected: 300,
            actual: 12,
        };
        assert_eq!(
            error.to_string(),
            "Frame buffer size mismatch: expected 300 bytes, got 12"
        );

        let error = DetectionError::NoInteriorSamples { width: 1, height: 1 };
        assert!(error.to_string().contains("1x1"));

        let error = DetectionError::InvalidScaleFactor(-0.5);
        assert!(error.to_string().contains("-0.5"));
    }

    #[test]
    fn test_blurry_error_shows_only_message() {
        let error = CaptureError::Blurry {
            message: "Hold steady".to_string(),
            variance: 4.2,
        };
        assert_eq!(format!("{}", error), "Hold steady");
        assert!(error.is_blurry());
    }

    #[test]
    fn test_capture_error_debug_format() {
        let error = CaptureError::InvalidFrame("Debug test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("InvalidFrame"));
        assert!(debug_str.contains("Debug test"));
        assert!(!error.is_blurry());
    }

    #[test]
    fn test_encoding_error_has_source() {
        let image_error = image::ImageError::Limits(image::error::LimitError::from_kind(
            image::error::LimitErrorKind::DimensionError,
        ));
        let error: CaptureError = image_error.into();
        assert!(error.to_string().starts_with("Encoding error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_config_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: ConfigError = io.into();
        assert!(error.to_string().contains("missing"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<DetectionError>();
        assert_send_sync::<CaptureError>();
        assert_send_sync::<ConfigError>();
    }
}
