//! Error types for the ripplefield core.

use thiserror::Error;

/// Errors produced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero when creating a raster buffer.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// Two rasters had incompatible dimensions for a combined operation.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// The GPU warp pass failed (shader compile/link, framebuffer, read-back).
    #[error("gpu error: {0}")]
    Gpu(String),

    /// An I/O failure (snapshot write).
    #[error("io error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let err = EngineError::InvalidDimensions;
        let msg = format!("{err}");
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn dimension_mismatch_includes_all_dimensions() {
        let err = EngineError::DimensionMismatch {
            lhs_w: 10,
            lhs_h: 20,
            rhs_w: 30,
            rhs_h: 40,
        };
        let msg = format!("{err}");
        for part in ["10", "20", "30", "40"] {
            assert!(msg.contains(part), "missing {part} in: {msg}");
        }
    }

    #[test]
    fn gpu_error_includes_message() {
        let err = EngineError::Gpu("link failed".into());
        assert!(format!("{err}").contains("link failed"));
    }

    #[test]
    fn io_error_includes_message() {
        let err = EngineError::Io("disk full".into());
        assert!(format!("{err}").contains("disk full"));
    }

    #[test]
    fn engine_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }

    #[test]
    fn engine_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<EngineError>();
    }
}
