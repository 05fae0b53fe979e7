// This is free and unencumbered software released into the public domain.

use crate::shared::{FrameError, PlaneView};

/// Bytes per pixel of the output image.
pub const RGBA_CHANNELS: usize = 4;

/// Chroma plane size for 4:2:0 subsampling of a `width` x `height` frame.
#[inline]
pub fn chroma_dimensions(width: usize, height: usize) -> (usize, usize) {
    (width.div_ceil(2), height.div_ceil(2))
}

/// Bytes a tightly packed RGBA buffer for `width` x `height` must hold.
pub fn rgba_len(width: usize, height: usize) -> Result<usize, FrameError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(RGBA_CHANNELS))
        .ok_or_else(|| FrameError::invalid_argument(format!("{width}x{height} RGBA size overflows")))
}

/// One planar 4:2:0 camera frame, borrowed from the caller.
#[derive(Clone, Copy, Debug)]
pub struct YuvFrame<'a> {
    pub y: PlaneView<'a>,
    pub u: PlaneView<'a>,
    pub v: PlaneView<'a>,
}

impl<'a> YuvFrame<'a> {
    pub fn new(y: PlaneView<'a>, u: PlaneView<'a>, v: PlaneView<'a>) -> Result<Self, FrameError> {
        let expected = chroma_dimensions(y.width(), y.height());
        for (name, plane) in [("u", &u), ("v", &v)] {
            if (plane.width(), plane.height()) != expected {
                return Err(FrameError::invalid_argument(format!(
                    "{name} plane is {}x{}, expected {}x{} for a {}x{} frame",
                    plane.width(),
                    plane.height(),
                    expected.0,
                    expected.1,
                    y.width(),
                    y.height(),
                )));
            }
        }
        Ok(Self { y, u, v })
    }

    /// Build a frame from raw plane bytes as a camera `ImageReader` hands
    /// them out: a packed luma plane and two chroma planes sharing the same
    /// pixel stride.
    #[allow(clippy::too_many_arguments)]
    pub fn from_planes(
        y: &'a [u8],
        y_stride: usize,
        u: &'a [u8],
        u_stride: usize,
        v: &'a [u8],
        v_stride: usize,
        width: usize,
        height: usize,
        chroma_pixel_stride: usize,
    ) -> Result<Self, FrameError> {
        let (cw, ch) = chroma_dimensions(width, height);
        Self::new(
            PlaneView::named("y", y, width, height, y_stride, 1)?,
            PlaneView::named("u", u, cw, ch, u_stride, chroma_pixel_stride)?,
            PlaneView::named("v", v, cw, ch, v_stride, chroma_pixel_stride)?,
        )
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.y.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y.height()
    }
}
