// This is free and unencumbered software released into the public domain.

use thiserror::Error;

/// The one failure a frame call can report.
///
/// Every variant is detected before any buffer is written, so a caller that
/// sees an error can assume both the output and the luminance plane are
/// untouched.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl FrameError {
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    #[inline]
    pub(crate) fn null_plane(name: &'static str) -> Self {
        Self::InvalidArgument(format!("{name} plane is null"))
    }

    #[inline]
    pub(crate) fn non_positive(name: &'static str, value: i64) -> Self {
        Self::InvalidArgument(format!("{name} must be positive, got {value}"))
    }
}

/// Convert a host-side signed integer into a strictly positive `usize`.
pub(crate) fn positive(name: &'static str, value: i32) -> Result<usize, FrameError> {
    if value <= 0 {
        return Err(FrameError::non_positive(name, value.into()));
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert!(positive("width", 0).is_err());
        assert!(positive("width", -3).is_err());
        assert_eq!(positive("width", 7), Ok(7));
    }

    #[test]
    fn messages_name_the_argument() {
        let err = FrameError::null_plane("y");
        assert_eq!(err.to_string(), "invalid argument: y plane is null");

        let err = FrameError::non_positive("height", -1);
        assert_eq!(err.to_string(), "invalid argument: height must be positive, got -1");
    }
}
