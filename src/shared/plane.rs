// This is free and unencumbered software released into the public domain.

//! Non-owning, stride-aware views over caller-allocated image planes.
//!
//! A plane is `height` rows of `width` samples. Rows start `stride` bytes
//! apart and samples within a row are `pixel_stride` bytes apart, so both
//! padded rows and interleaved (semi-planar) chroma can be described without
//! copying. The bytes between the last sample of a row and the start of the
//! next are never read.
//!
//! The backing slice only has to reach the last sample of the last row;
//! camera HALs routinely hand out planes whose final row is not padded.

use crate::shared::FrameError;

/// Number of bytes a plane of this shape must cover.
pub(crate) fn required_len(
    width: usize,
    height: usize,
    stride: usize,
    pixel_stride: usize,
) -> Option<usize> {
    let last_row = height.checked_sub(1)?.checked_mul(stride)?;
    let last_sample = width.checked_sub(1)?.checked_mul(pixel_stride)?;
    last_row.checked_add(last_sample)?.checked_add(1)
}

pub(crate) fn check_shape(
    name: &'static str,
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
    pixel_stride: usize,
) -> Result<(), FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::invalid_argument(format!(
            "{name} plane has empty dimensions {width}x{height}"
        )));
    }
    if pixel_stride == 0 {
        return Err(FrameError::invalid_argument(format!(
            "{name} plane pixel stride must be positive"
        )));
    }
    let row_span = (width - 1)
        .checked_mul(pixel_stride)
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| FrameError::invalid_argument(format!("{name} plane row overflows")))?;
    if stride < row_span {
        return Err(FrameError::invalid_argument(format!(
            "{name} plane stride {stride} is smaller than its row span {row_span}"
        )));
    }
    let needed = required_len(width, height, stride, pixel_stride)
        .ok_or_else(|| FrameError::invalid_argument(format!("{name} plane size overflows")))?;
    if len < needed {
        return Err(FrameError::invalid_argument(format!(
            "{name} plane holds {len} bytes, {width}x{height} with stride {stride} needs {needed}"
        )));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub struct PlaneView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
    pixel_stride: usize,
}

impl<'a> PlaneView<'a> {
    /// A packed plane: one byte per sample.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> Result<Self, FrameError> {
        Self::named("image", data, width, height, stride, 1)
    }

    pub fn with_pixel_stride(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
        pixel_stride: usize,
    ) -> Result<Self, FrameError> {
        Self::named("image", data, width, height, stride, pixel_stride)
    }

    pub(crate) fn named(
        name: &'static str,
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
        pixel_stride: usize,
    ) -> Result<Self, FrameError> {
        check_shape(name, data.len(), width, height, stride, pixel_stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            pixel_stride,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    /// Bytes of row `y` from its first to its last visible sample.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + (self.width - 1) * self.pixel_stride + 1]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x * self.pixel_stride]
    }

    /// The visible samples of row `y`.
    pub fn samples(self, y: usize) -> impl Iterator<Item = u8> + 'a {
        self.row(y).iter().step_by(self.pixel_stride).copied()
    }

    /// `true` when rows are packed back to back with no padding.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.pixel_stride == 1 && self.stride == self.width
    }
}

#[derive(Debug)]
pub struct PlaneViewMut<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PlaneViewMut<'a> {
    pub fn new(data: &'a mut [u8], width: usize, height: usize, stride: usize) -> Result<Self, FrameError> {
        Self::named("image", data, width, height, stride)
    }

    pub(crate) fn named(
        name: &'static str,
        data: &'a mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self, FrameError> {
        check_shape(name, data.len(), width, height, stride, 1)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }

    pub fn as_view(&self) -> PlaneView<'_> {
        PlaneView {
            data: &*self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            pixel_stride: 1,
        }
    }
}
