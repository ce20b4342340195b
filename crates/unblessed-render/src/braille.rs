#![forbid(unsafe_code)]

//! Sub-character pixel canvas rendered with Unicode braille patterns.
//!
//! Each character cell holds a 2 × 4 grid of dots packed into one byte:
//!
//! ```text
//!  dot column:   0     1
//!  row 0       0x01  0x08
//!  row 1       0x02  0x10
//!  row 2       0x04  0x20
//!  row 3       0x40  0x80
//! ```
//!
//! A cell byte `b` renders as `U+2800 + b`, except that an empty cell renders
//! as a plain space.
//!
//! # Example
//! ```
//! use unblessed_render::braille::PixelCanvas;
//!
//! let mut canvas = PixelCanvas::new(2, 1);
//! canvas.draw_line(0, 0, 1, 3);
//! assert_eq!(canvas.to_lines(), vec!["\u{28A3} "]);
//! ```

use crate::Widget;
use crate::drawing::{ClipRect, circle_points, line_points, rect_points};
use crate::geometry::Rect;
use crate::screen::ScreenLines;

/// Dot bit for `[dot_y][dot_x]` within a cell.
pub const BRAILLE_DOTS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Code point of the empty braille pattern.
pub const BRAILLE_BASE: u32 = 0x2800;

/// Glyph for a cell byte. Zero renders as a space.
#[inline]
#[must_use]
pub fn braille_glyph(bits: u8) -> char {
    if bits == 0 {
        ' '
    } else {
        char::from_u32(BRAILLE_BASE + u32::from(bits)).unwrap_or(' ')
    }
}

/// A bitmap of `char_width × 2` by `char_height × 4` pixels.
///
/// Pixel operations ignore out-of-range coordinates, negatives included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelCanvas {
    char_width: u16,
    char_height: u16,
    buffer: Vec<u8>,
}

impl PixelCanvas {
    /// A cleared canvas covering `char_width × char_height` cells.
    #[must_use]
    pub fn new(char_width: u16, char_height: u16) -> Self {
        Self {
            char_width,
            char_height,
            buffer: vec![0; char_width as usize * char_height as usize],
        }
    }

    /// A canvas sized to fill `area`.
    #[must_use]
    pub fn for_area(area: Rect) -> Self {
        Self::new(area.width, area.height)
    }

    #[inline]
    #[must_use]
    pub const fn char_width(&self) -> u16 {
        self.char_width
    }

    #[inline]
    #[must_use]
    pub const fn char_height(&self) -> u16 {
        self.char_height
    }

    #[inline]
    #[must_use]
    pub const fn pixel_width(&self) -> i32 {
        self.char_width as i32 * 2
    }

    #[inline]
    #[must_use]
    pub const fn pixel_height(&self) -> i32 {
        self.char_height as i32 * 4
    }

    /// The raw cell bytes, row-major.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Byte index and dot mask for pixel `(x, y)`.
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.pixel_width() || y >= self.pixel_height() {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let coord = x / 2 + self.char_width as usize * (y / 4);
        Some((coord, BRAILLE_DOTS[y % 4][x % 2]))
    }

    pub fn set_pixel(&mut self, x: i32, y: i32) {
        if let Some((i, mask)) = self.locate(x, y) {
            self.buffer[i] |= mask;
        }
    }

    pub fn unset_pixel(&mut self, x: i32, y: i32) {
        if let Some((i, mask)) = self.locate(x, y) {
            self.buffer[i] &= !mask;
        }
    }

    pub fn toggle_pixel(&mut self, x: i32, y: i32) {
        if let Some((i, mask)) = self.locate(x, y) {
            self.buffer[i] ^= mask;
        }
    }

    /// Whether pixel `(x, y)` is set. Out-of-range pixels read as unset.
    #[must_use]
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .is_some_and(|(i, mask)| self.buffer[i] & mask != 0)
    }

    /// Unset every pixel.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    fn clip(&self) -> ClipRect {
        ClipRect::from_size(self.pixel_width(), self.pixel_height())
    }

    /// Set every pixel on the line from `(x0, y0)` to `(x1, y1)`.
    ///
    /// Endpoints may lie anywhere; only the on-canvas part is drawn.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let clip = self.clip();
        line_points(x0, y0, x1, y1, clip, |x, y| self.set_pixel(x, y));
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, fill: bool) {
        let clip = self.clip();
        rect_points(x, y, w, h, fill, clip, |px, py| self.set_pixel(px, py));
    }

    pub fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, fill: bool) {
        let clip = self.clip();
        circle_points(cx, cy, r, fill, clip, |px, py| self.set_pixel(px, py));
    }

    /// Plot `f` over `[x0, x1]`.
    ///
    /// One sample is taken per pixel column. Sample `i` lands at screen
    /// `x = round(i × scale_x)` and `y = round(offset_y − f(x) × scale_y)`, and
    /// consecutive samples are joined with [`draw_line`](Self::draw_line).
    /// A non-finite sample breaks the curve. Samples far off the canvas
    /// saturate to the `i32` range and are clipped like any other line.
    pub fn plot_function<F>(
        &mut self,
        f: F,
        x0: f64,
        x1: f64,
        scale_x: f64,
        scale_y: f64,
        offset_y: f64,
    ) where
        F: Fn(f64) -> f64,
    {
        let samples = self.pixel_width();
        if samples <= 0 {
            return;
        }
        let step = if samples > 1 {
            (x1 - x0) / f64::from(samples - 1)
        } else {
            0.0
        };

        let mut previous: Option<(i32, i32)> = None;
        for i in 0..samples {
            let x = x0 + f64::from(i) * step;
            let sx = (f64::from(i) * scale_x).round();
            let sy = (offset_y - f(x) * scale_y).round();
            if !sx.is_finite() || !sy.is_finite() {
                previous = None;
                continue;
            }
            let point = (sx as i32, sy as i32);
            match previous {
                Some((px, py)) => self.draw_line(px, py, point.0, point.1),
                None => self.set_pixel(point.0, point.1),
            }
            previous = Some(point);
        }
    }

    /// Dot byte of cell `(cx, cy)`; zero out of range.
    #[must_use]
    pub fn cell_bits(&self, cx: u16, cy: u16) -> u8 {
        if cx >= self.char_width || cy >= self.char_height {
            return 0;
        }
        self.buffer[cy as usize * self.char_width as usize + cx as usize]
    }

    /// Rendered glyph of cell `(cx, cy)`.
    #[must_use]
    pub fn glyph_at(&self, cx: u16, cy: u16) -> char {
        braille_glyph(self.cell_bits(cx, cy))
    }

    /// The canvas as text, one string per cell row.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        if self.char_width == 0 {
            return vec![String::new(); self.char_height as usize];
        }
        self.buffer
            .chunks(self.char_width as usize)
            .map(|row| row.iter().map(|&b| braille_glyph(b)).collect())
            .collect()
    }

    /// Write every cell of the canvas that fits in `area` into `screen`.
    ///
    /// Rows written are marked dirty.
    pub fn render_with_attr(&self, area: Rect, screen: &mut ScreenLines, attr: u32) {
        let area = area.intersection(&screen.bounds());
        let cols = area.width.min(self.char_width);
        let rows = area.height.min(self.char_height);

        #[cfg(feature = "tracing")]
        tracing::trace!(cols, rows, "rendering pixel canvas");

        let mut glyph = [0u8; 4];
        for cy in 0..rows {
            for cx in 0..cols {
                let ch = self.glyph_at(cx, cy).encode_utf8(&mut glyph);
                screen.set(area.x + cx, area.y + cy, attr, ch);
            }
        }
    }
}

impl Widget for PixelCanvas {
    fn render(&self, area: Rect, screen: &mut ScreenLines) {
        self.render_with_attr(area, screen, 0);
    }
}
