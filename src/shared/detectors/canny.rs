// This is free and unencumbered software released into the public domain.

//! Canny edge detector over a single 8-bit plane.
//!
//! Follows the classic OpenCV formulation so results match `cv::Canny` with
//! aperture 3:
//!
//! 1. 3x3 Sobel derivatives, borders replicated. No Gaussian pre-blur.
//! 2. Magnitude `|dx| + |dy|`, or `dx² + dy²` with squared thresholds when
//!    the L2 norm is requested.
//! 3. Non-maximum suppression along one of four gradient sectors, picked
//!    with the fixed-point tan(22.5°) test. Ties keep the left/upper pixel.
//! 4. Hysteresis: pixels above `high` seed an 8-connected flood through
//!    pixels above `low`.

use crate::shared::{EdgeDetector, FrameError, PlaneView, Thresholds, detector::check_edge_map};
use std::borrow::Cow;

const CANNY_SHIFT: i32 = 15;
// tan(22.5°) in Q15.
const TG22: i32 = 13573;

/// Map states, in the order OpenCV uses them.
const CANDIDATE: u8 = 0;
const NOT_EDGE: u8 = 1;
const EDGE: u8 = 2;

const EDGE_VALUE: u8 = 255;

#[derive(Clone, Debug)]
pub struct CannyDetector {
    thresholds: Thresholds,
    l2_gradient: bool,
    dx: Vec<i32>,
    dy: Vec<i32>,
    // Magnitude and state maps carry a one-pixel border all round.
    mag: Vec<i32>,
    map: Vec<u8>,
    stack: Vec<usize>,
}

impl Default for CannyDetector {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl CannyDetector {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            l2_gradient: false,
            dx: Vec::new(),
            dy: Vec::new(),
            mag: Vec::new(),
            map: Vec::new(),
            stack: Vec::new(),
        }
    }

    pub fn with_l2_gradient(mut self, enabled: bool) -> Self {
        self.l2_gradient = enabled;
        self
    }

    /// Integer thresholds compared against the magnitude.
    fn integer_thresholds(&self) -> (i32, i32) {
        let (mut low, mut high) = (self.thresholds.low(), self.thresholds.high());
        if self.l2_gradient {
            low = low.min(32767.0);
            high = high.min(32767.0);
            if low > 0.0 {
                low *= low;
            }
            if high > 0.0 {
                high *= high;
            }
        }
        (low.floor() as i32, high.floor() as i32)
    }

    fn sobel(&mut self, src: &PlaneView<'_>) {
        let (w, h) = (src.width(), src.height());
        let ps = src.pixel_stride();
        self.dx.clear();
        self.dx.resize(w * h, 0);
        self.dy.clear();
        self.dy.resize(w * h, 0);

        for y in 0..h {
            let above = src.row(y.saturating_sub(1));
            let here = src.row(y);
            let below = src.row((y + 1).min(h - 1));
            for x in 0..w {
                let l = x.saturating_sub(1) * ps;
                let c = x * ps;
                let r = (x + 1).min(w - 1) * ps;
                let px = |row: &[u8], i: usize| row[i] as i32;

                let dx = (px(above, r) - px(above, l))
                    + 2 * (px(here, r) - px(here, l))
                    + (px(below, r) - px(below, l));
                let dy = (px(below, l) - px(above, l))
                    + 2 * (px(below, c) - px(above, c))
                    + (px(below, r) - px(above, r));

                self.dx[y * w + x] = dx;
                self.dy[y * w + x] = dy;
            }
        }
    }

    fn magnitude(&mut self, w: usize, h: usize) {
        let pw = w + 2;
        self.mag.clear();
        self.mag.resize(pw * (h + 2), 0);
        for y in 0..h {
            for x in 0..w {
                let (dx, dy) = (self.dx[y * w + x], self.dy[y * w + x]);
                self.mag[(y + 1) * pw + x + 1] = if self.l2_gradient {
                    dx * dx + dy * dy
                } else {
                    dx.abs() + dy.abs()
                };
            }
        }
    }

    /// Thin the magnitude to ridge pixels and classify each one.
    fn suppress(&mut self, w: usize, h: usize, low: i32, high: i32) {
        let pw = w + 2;
        self.map.clear();
        self.map.resize(pw * (h + 2), NOT_EDGE);
        self.stack.clear();

        for y in 0..h {
            for x in 0..w {
                let j = (y + 1) * pw + x + 1;
                let m = self.mag[j];
                if m <= low {
                    continue;
                }

                let xs = self.dx[y * w + x];
                let ys = self.dy[y * w + x];
                let ax = xs.abs();
                let ay = ys.abs() << CANNY_SHIFT;
                let tg22x = ax * TG22;

                let is_ridge = if ay < tg22x {
                    m > self.mag[j - 1] && m >= self.mag[j + 1]
                } else {
                    let tg67x = tg22x + (ax << (CANNY_SHIFT + 1));
                    if ay > tg67x {
                        m > self.mag[j - pw] && m >= self.mag[j + pw]
                    } else if (xs ^ ys) < 0 {
                        m > self.mag[j - pw + 1] && m > self.mag[j + pw - 1]
                    } else {
                        m > self.mag[j - pw - 1] && m > self.mag[j + pw + 1]
                    }
                };

                if !is_ridge {
                    continue;
                }
                if m > high {
                    self.map[j] = EDGE;
                    self.stack.push(j);
                } else {
                    self.map[j] = CANDIDATE;
                }
            }
        }
    }
}

/// Grow seeded edges through 8-connected candidates. The map border is
/// `NOT_EDGE`, so the flood never leaves the image.
fn hysteresis(map: &mut [u8], stride: usize, stack: &mut Vec<usize>) {
    let offsets = [
        -(stride as isize) - 1,
        -(stride as isize),
        -(stride as isize) + 1,
        -1,
        1,
        stride as isize - 1,
        stride as isize,
        stride as isize + 1,
    ];
    while let Some(j) = stack.pop() {
        for off in offsets {
            let n = j.wrapping_add_signed(off);
            if map[n] == CANDIDATE {
                map[n] = EDGE;
                stack.push(n);
            }
        }
    }
}

impl dogma::Named for CannyDetector {
    fn name(&self) -> Cow<'_, str> {
        "canny".into()
    }
}

impl EdgeDetector for CannyDetector {
    fn detect(&mut self, src: PlaneView<'_>, edges: &mut [u8]) -> Result<usize, FrameError> {
        check_edge_map(&src, edges)?;
        let (w, h) = (src.width(), src.height());
        let (low, high) = self.integer_thresholds();

        self.sobel(&src);
        self.magnitude(w, h);
        self.suppress(w, h, low, high);
        hysteresis(&mut self.map, w + 2, &mut self.stack);

        let pw = w + 2;
        let mut count = 0;
        for (y, out_row) in edges.chunks_exact_mut(w).enumerate() {
            let map_row = &self.map[(y + 1) * pw + 1..(y + 1) * pw + 1 + w];
            for (out, &state) in out_row.iter_mut().zip(map_row) {
                *out = if state == EDGE {
                    count += 1;
                    EDGE_VALUE
                } else {
                    0
                };
            }
        }
        Ok(count)
    }
}
