// This is free and unencumbered software released into the public domain.

#![allow(dead_code)]

use edge_viewer::shared::chroma_dimensions;

/// Planar 4:2:0 buffers with explicit row strides, as a camera delivers them.
pub struct SyntheticFrame {
    pub width: usize,
    pub height: usize,
    pub y: Vec<u8>,
    pub y_stride: usize,
    pub u: Vec<u8>,
    pub v: Vec<u8>,
    pub c_stride: usize,
}

impl SyntheticFrame {
    /// Luma from `f(x, y)`, neutral chroma, every row padded with `fill`.
    pub fn new(
        width: usize,
        height: usize,
        padding: usize,
        fill: u8,
        f: impl Fn(usize, usize) -> u8,
    ) -> Self {
        let y_stride = width + padding;
        let mut y = vec![fill; y_stride * height];
        for row in 0..height {
            for col in 0..width {
                y[row * y_stride + col] = f(col, row);
            }
        }
        let (cw, ch) = chroma_dimensions(width, height);
        let c_stride = cw + padding;
        Self {
            width,
            height,
            y,
            y_stride,
            u: vec![128; c_stride * ch],
            v: vec![128; c_stride * ch],
            c_stride,
        }
    }

    pub fn rgba_len(&self) -> usize {
        self.width * self.height * 4
    }
}

/// A bright square on a dark background.
pub fn square(width: usize, height: usize, from: usize, to: usize, padding: usize, fill: u8) -> SyntheticFrame {
    SyntheticFrame::new(width, height, padding, fill, |x, y| {
        if (from..to).contains(&x) && (from..to).contains(&y) {
            235
        } else {
            16
        }
    })
}

/// Every RGBA group is `(v, v, v, 255)` with `v` either 0 or 255.
pub fn is_binary_gray(rgba: &[u8]) -> bool {
    rgba.chunks_exact(4)
        .all(|px| px[0] == px[1] && px[1] == px[2] && px[3] == 255 && (px[0] == 0 || px[0] == 255))
}
