// This is free and unencumbered software released into the public domain.

use crate::shared::FrameError;
use derive_more::Display;

/// Hysteresis threshold pair for the edge detector.
///
/// The pair is kept ordered: constructing it with `low > high` swaps the
/// two values.
#[derive(Clone, Copy, Debug, Display, PartialEq)]
#[display("{low}/{high}")]
pub struct Thresholds {
    low: f64,
    high: f64,
}

impl Thresholds {
    pub const DEFAULT_LOW: f64 = 50.0;
    pub const DEFAULT_HIGH: f64 = 150.0;

    pub fn new(low: f64, high: f64) -> Self {
        if low > high {
            Self {
                low: high,
                high: low,
            }
        } else {
            Self { low, high }
        }
    }

    /// Like [`new`](Self::new), but rejects NaN and infinite values, which
    /// would otherwise floor to meaningless integer thresholds.
    pub fn checked(low: f64, high: f64) -> Result<Self, FrameError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(FrameError::invalid_argument(format!(
                "thresholds must be finite, got {low}/{high}"
            )));
        }
        Ok(Self::new(low, high))
    }

    #[inline]
    pub fn low(&self) -> f64 {
        self.low
    }

    #[inline]
    pub fn high(&self) -> f64 {
        self.high
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOW, Self::DEFAULT_HIGH)
    }
}

/// What a frame call writes into the output buffer.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Edge map of the luminance plane, grey on opaque black. Chroma is
    /// validated but never read.
    #[default]
    #[display("edges")]
    Edges,

    /// Plain colour conversion of the frame, no edge detection.
    #[display("preview")]
    Preview,

    /// Colour conversion with edge pixels painted white.
    #[display("overlay")]
    Overlay,
}

impl ProcessingMode {
    #[inline]
    pub fn detects_edges(self) -> bool {
        !matches!(self, Self::Preview)
    }

    #[inline]
    pub fn reads_chroma(self) -> bool {
        !matches!(self, Self::Edges)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessorConfig {
    pub thresholds: Thresholds,
    pub l2_gradient: bool,
    pub mode: ProcessingMode,
    pub write_back_luma: bool,
    pub chroma_pixel_stride: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            l2_gradient: false,
            mode: ProcessingMode::Edges,
            write_back_luma: false,
            chroma_pixel_stride: 1,
        }
    }
}

impl ProcessorConfig {
    pub fn with_thresholds(mut self, low: f64, high: f64) -> Self {
        self.thresholds = Thresholds::new(low, high);
        self
    }

    pub fn with_l2_gradient(mut self, enabled: bool) -> Self {
        self.l2_gradient = enabled;
        self
    }

    pub fn with_mode(mut self, mode: ProcessingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_write_back_luma(mut self, enabled: bool) -> Self {
        self.write_back_luma = enabled;
        self
    }

    pub fn with_chroma_pixel_stride(mut self, n: usize) -> Self {
        self.chroma_pixel_stride = n.max(1);
        self
    }
}
