#![forbid(unsafe_code)]

//! Integer raster algorithms shared by the canvases.
//!
//! Each function reports the points it covers to a `plot` callback, but only
//! those inside a [`ClipRect`]. Coordinates may be anywhere in `i32`; stepping
//! is done in `i64` and far-away geometry is clipped before it is walked, so
//! the cost is bounded by the clip area rather than by the input.

/// Lines with more steps than this are clipped before rasterizing.
const UNCLIPPED_LINE_STEPS: i64 = 1 << 16;

/// Half-open clip area: `left..right` by `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl ClipRect {
    #[must_use]
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        let (left, top) = (i64::from(left), i64::from(top));
        Self {
            left,
            top,
            right: left + i64::from(width.max(0)),
            bottom: top + i64::from(height.max(0)),
        }
    }

    /// `0..width` by `0..height`.
    #[must_use]
    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    #[inline]
    fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Hand a point to `plot` if it is inside.
    #[inline]
    fn emit(&self, x: i64, y: i64, plot: &mut impl FnMut(i32, i32)) {
        if self.contains(x, y) {
            // Inside an i32-built rectangle, so both fit.
            plot(x as i32, y as i32);
        }
    }

    /// Liang-Barsky: the part of the segment inside, endpoints rounded.
    fn clip_segment(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> Option<[i64; 4]> {
        let (fx0, fy0) = (x0 as f64, y0 as f64);
        let (dx, dy) = (x1 as f64 - fx0, y1 as f64 - fy0);
        let (min_x, max_x) = (self.left as f64, (self.right - 1) as f64);
        let (min_y, max_y) = (self.top as f64, (self.bottom - 1) as f64);

        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [
            (-dx, fx0 - min_x),
            (dx, max_x - fx0),
            (-dy, fy0 - min_y),
            (dy, max_y - fy0),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let clamp_x = |v: f64| (v.round() as i64).clamp(self.left, self.right - 1);
        let clamp_y = |v: f64| (v.round() as i64).clamp(self.top, self.bottom - 1);
        Some([
            clamp_x(fx0 + t0 * dx),
            clamp_y(fy0 + t0 * dy),
            clamp_x(fx0 + t1 * dx),
            clamp_y(fy0 + t1 * dy),
        ])
    }
}

/// Points on the Bresenham line from `(x0, y0)` to `(x1, y1)`, both endpoints included.
///
/// Short lines are walked in full so the visible part matches the unclipped
/// raster exactly. Long lines are first cut down to the clip area.
pub fn line_points(
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    clip: ClipRect,
    mut plot: impl FnMut(i32, i32),
) {
    if clip.is_empty() {
        return;
    }
    let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    let steps = (x1 - x0).abs().max((y1 - y0).abs());
    if steps <= UNCLIPPED_LINE_STEPS {
        bresenham(x0, y0, x1, y1, clip, &mut plot);
    } else if let Some([cx0, cy0, cx1, cy1]) = clip.clip_segment(x0, y0, x1, y1) {
        bresenham(cx0, cy0, cx1, cy1, clip, &mut plot);
    }
}

fn bresenham(x0: i64, y0: i64, x1: i64, y1: i64, clip: ClipRect, plot: &mut impl FnMut(i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        clip.emit(x, y, plot);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Points of a `w × h` rectangle with its top-left corner at `(x, y)`.
///
/// The outline is the four edges drawn as lines, so corners are reported
/// more than once. Non-positive sizes cover nothing.
pub fn rect_points(
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    fill: bool,
    clip: ClipRect,
    mut plot: impl FnMut(i32, i32),
) {
    if w <= 0 || h <= 0 || clip.is_empty() {
        return;
    }
    let (left, top) = (i64::from(x), i64::from(y));
    let (right, bottom) = (left + i64::from(w) - 1, top + i64::from(h) - 1);
    if fill {
        for py in top.max(clip.top)..=bottom.min(clip.bottom - 1) {
            for px in left.max(clip.left)..=right.min(clip.right - 1) {
                clip.emit(px, py, &mut plot);
            }
        }
        return;
    }
    for [x0, y0, x1, y1] in [
        [left, top, right, top],
        [right, top, right, bottom],
        [right, bottom, left, bottom],
        [left, bottom, left, top],
    ] {
        edge_points(x0, y0, x1, y1, clip, &mut plot);
    }
}

/// Axis-aligned edge, walked only across the clip area.
fn edge_points(
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
    clip: ClipRect,
    plot: &mut impl FnMut(i32, i32),
) {
    let (lo_x, hi_x) = (x0.min(x1).max(clip.left), x0.max(x1).min(clip.right - 1));
    let (lo_y, hi_y) = (y0.min(y1).max(clip.top), y0.max(y1).min(clip.bottom - 1));
    for py in lo_y..=hi_y {
        for px in lo_x..=hi_x {
            clip.emit(px, py, plot);
        }
    }
}

/// Points of a circle of radius `r` around `(cx, cy)`.
///
/// Filled circles cover every point with `dx² + dy² ≤ r²`; outlines use the
/// midpoint algorithm. Radius 0 is the centre alone; negative radii cover nothing.
pub fn circle_points(
    cx: i32,
    cy: i32,
    r: i32,
    fill: bool,
    clip: ClipRect,
    mut plot: impl FnMut(i32, i32),
) {
    if r < 0 || clip.is_empty() {
        return;
    }
    let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(r));
    if cx + r < clip.left || cx - r >= clip.right || cy + r < clip.top || cy - r >= clip.bottom {
        return;
    }
    if r == 0 {
        clip.emit(cx, cy, &mut plot);
        return;
    }
    if fill {
        let r2 = r * r;
        for dy in (-r).max(clip.top - cy)..=r.min(clip.bottom - 1 - cy) {
            for dx in (-r).max(clip.left - cx)..=r.min(clip.right - 1 - cx) {
                if dx * dx + dy * dy <= r2 {
                    clip.emit(cx + dx, cy + dy, &mut plot);
                }
            }
        }
        return;
    }

    let (mut x, mut y) = (r, 0_i64);
    let mut d = 1 - r;
    while x >= y {
        for (px, py) in [
            (x, y),
            (-x, y),
            (x, -y),
            (-x, -y),
            (y, x),
            (-y, x),
            (y, -x),
            (-y, -x),
        ] {
            clip.emit(cx + px, cy + py, &mut plot);
        }
        y += 1;
        if d < 0 {
            d += 2 * y + 1;
        } else {
            x -= 1;
            d += 2 * (y - x) + 1;
        }
    }
}
