// This is free and unencumbered software released into the public domain.

use crate::shared::{FrameError, PlaneView};

/// Edge-detection capability: one 8-bit intensity plane in, one packed
/// binary edge map out.
///
/// Implementations keep whatever scratch they need between calls, hence
/// `&mut self`.
pub trait EdgeDetector: dogma::Named + Send {
    /// Writes `src.width() * src.height()` bytes into `edges`, row-major and
    /// tightly packed, each either `0` or `255`. Returns the number of edge
    /// pixels.
    fn detect(&mut self, src: PlaneView<'_>, edges: &mut [u8]) -> Result<usize, FrameError>;
}

/// Check the edge map a detector was handed.
pub(crate) fn check_edge_map(src: &PlaneView<'_>, edges: &[u8]) -> Result<(), FrameError> {
    let needed = src.width() * src.height();
    if edges.len() != needed {
        return Err(FrameError::invalid_argument(format!(
            "edge map holds {} bytes, {}x{} needs {needed}",
            edges.len(),
            src.width(),
            src.height(),
        )));
    }
    Ok(())
}
