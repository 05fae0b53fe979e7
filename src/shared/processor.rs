// This is free and unencumbered software released into the public domain.

use crate::shared::{
    CannyDetector, EdgeDetector, FrameError, PlaneView, PlaneViewMut, ProcessingMode,
    ProcessorConfig, YuvFrame, convert,
};
use std::borrow::Cow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStats {
    pub width: usize,
    pub height: usize,
    pub mode: ProcessingMode,
    /// Edge pixels found, 0 in preview mode.
    pub edge_pixels: usize,
}

/// Turns one borrowed camera frame into one RGBA image.
///
/// The processor never keeps a reference to caller memory past a call; it
/// owns only the edge map scratch, which is reused across frames of the same
/// size.
pub struct FrameProcessor {
    config: ProcessorConfig,
    detector: Box<dyn EdgeDetector>,
    edges: Vec<u8>,
}

impl core::fmt::Debug for FrameProcessor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameProcessor")
            .field("config", &self.config)
            .field("detector", &self.detector.name())
            .finish_non_exhaustive()
    }
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl FrameProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        let detector = CannyDetector::new(config.thresholds).with_l2_gradient(config.l2_gradient);
        Self::with_detector(config, Box::new(detector))
    }

    /// Use another edge detector; `config.thresholds` and
    /// `config.l2_gradient` are then up to that detector.
    pub fn with_detector(config: ProcessorConfig, detector: Box<dyn EdgeDetector>) -> Self {
        Self {
            config,
            detector,
            edges: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn detector_name(&self) -> Cow<'_, str> {
        self.detector.name()
    }

    /// The edge map of the last frame processed, packed row-major.
    #[inline]
    pub fn edge_map(&self) -> &[u8] {
        &self.edges
    }

    /// Process `frame` into the first `width * height * 4` bytes of
    /// `output`. The frame is only read.
    ///
    /// Errors are reported before anything is written.
    pub fn process_frame(&mut self, frame: &YuvFrame<'_>, output: &mut [u8]) -> Result<FrameStats, FrameError> {
        let (width, height) = (frame.width(), frame.height());
        let mut rgba = convert::rgba_view(output, width, height)?;
        let mode = self.config.mode;

        let mut edge_pixels = 0;
        if mode.detects_edges() {
            self.edges.clear();
            self.edges.resize(width * height, 0);
            edge_pixels = self.detector.detect(frame.y, &mut self.edges)?;
        }

        match mode {
            ProcessingMode::Edges => convert::gray_to_rgba(&self.edges, &mut rgba),
            ProcessingMode::Preview => convert::yuv420_to_rgba(frame, &mut rgba),
            ProcessingMode::Overlay => {
                convert::yuv420_to_rgba(frame, &mut rgba);
                convert::paint_mask(&self.edges, &mut rgba);
            },
        }

        #[cfg(feature = "tracing")]
        asimov_module::tracing::trace!(
            target: "edge_viewer",
            width,
            height,
            %mode,
            edge_pixels,
            "processed frame"
        );

        Ok(FrameStats {
            width,
            height,
            mode,
            edge_pixels,
        })
    }

    /// Like [`process_frame`](Self::process_frame), then overwrite the
    /// visible bytes of every luminance row with the edge map (0 or 255).
    ///
    /// Row padding is left alone. In preview mode there is no edge map and
    /// the luminance plane is not touched.
    #[allow(clippy::too_many_arguments)]
    pub fn process_frame_in_place(
        &mut self,
        luma: &mut [u8],
        luma_stride: usize,
        u: PlaneView<'_>,
        v: PlaneView<'_>,
        width: usize,
        height: usize,
        output: &mut [u8],
    ) -> Result<FrameStats, FrameError> {
        let mut luma = PlaneViewMut::named("y", luma, width, height, luma_stride)?;
        let stats = {
            let frame = YuvFrame::new(luma.as_view(), u, v)?;
            self.process_frame(&frame, output)?
        };
        if stats.mode.detects_edges() {
            convert::write_back_luma(&self.edges, &mut luma);
        }
        Ok(stats)
    }
}
