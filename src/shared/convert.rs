// This is free and unencumbered software released into the public domain.

//! Pixel format conversions into the caller's RGBA buffer.

use crate::shared::{FrameError, PlaneViewMut, RGBA_CHANNELS, YuvFrame, rgba_len};
use image::{ImageBuffer, Luma, Pixel, Rgba};

/// A tightly packed RGBA view over borrowed memory.
pub type RgbaImageMut<'a> = ImageBuffer<Rgba<u8>, &'a mut [u8]>;

// BT.601 limited-range YUV -> RGB, Q20 fixed point.
const YUV_SHIFT: u32 = 20;
const YUV_HALF: i32 = 1 << (YUV_SHIFT - 1);
const CY: i32 = 1_220_542;
const CUB: i32 = 2_116_026;
const CUG: i32 = -409_993;
const CVG: i32 = -852_492;
const CVR: i32 = 1_673_527;

/// View the first `width * height * 4` bytes of `output` as RGBA with a row
/// stride of `width * 4`.
pub fn rgba_view(output: &mut [u8], width: usize, height: usize) -> Result<RgbaImageMut<'_>, FrameError> {
    let len = rgba_len(width, height)?;
    if output.len() < len {
        return Err(FrameError::invalid_argument(format!(
            "output buffer holds {} bytes, {width}x{height} RGBA needs {len}",
            output.len()
        )));
    }
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(FrameError::invalid_argument(format!(
                "{width}x{height} exceeds the supported image size"
            )));
        },
    };
    ImageBuffer::from_raw(w, h, &mut output[..len])
        .ok_or_else(|| FrameError::invalid_argument("output buffer too small"))
}

/// Broadcast a packed single-channel plane into RGBA: `v -> (v, v, v, 255)`.
pub fn gray_to_rgba(gray: &[u8], rgba: &mut RgbaImageMut<'_>) {
    for (px, &v) in rgba.pixels_mut().zip(gray) {
        *px = Luma([v]).to_rgba();
    }
}

/// Paint every non-zero pixel of `mask` opaque white.
pub fn paint_mask(mask: &[u8], rgba: &mut RgbaImageMut<'_>) {
    for (px, _) in rgba.pixels_mut().zip(mask).filter(|(_, m)| **m != 0) {
        *px = Rgba([255, 255, 255, 255]);
    }
}

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Convert a 4:2:0 frame to RGBA, one chroma sample per 2x2 luma block.
pub fn yuv420_to_rgba(frame: &YuvFrame<'_>, rgba: &mut RgbaImageMut<'_>) {
    let width = frame.width();
    for (y, row) in rgba.chunks_exact_mut(width * RGBA_CHANNELS).enumerate() {
        let luma = frame.y.row(y);
        let (u_row, v_row) = (frame.u.row(y / 2), frame.v.row(y / 2));
        let (ups, vps) = (frame.u.pixel_stride(), frame.v.pixel_stride());

        for (x, px) in row.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
            let u = u_row[(x / 2) * ups] as i32 - 128;
            let v = v_row[(x / 2) * vps] as i32 - 128;
            let ruv = YUV_HALF + CVR * v;
            let guv = YUV_HALF + CVG * v + CUG * u;
            let buv = YUV_HALF + CUB * u;

            let yy = (luma[x] as i32 - 16).max(0) * CY;
            px[0] = clamp_u8((yy + ruv) >> YUV_SHIFT);
            px[1] = clamp_u8((yy + guv) >> YUV_SHIFT);
            px[2] = clamp_u8((yy + buv) >> YUV_SHIFT);
            px[3] = 255;
        }
    }
}

/// Copy a packed edge map back over the visible part of the luminance rows.
pub fn write_back_luma(edges: &[u8], luma: &mut PlaneViewMut<'_>) {
    let width = luma.width();
    for (y, src) in edges.chunks_exact(width).take(luma.height()).enumerate() {
        luma.row_mut(y).copy_from_slice(src);
    }
}
