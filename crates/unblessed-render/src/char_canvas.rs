#![forbid(unsafe_code)]

//! Character-cell canvas with a per-cell attribute.
//!
//! Drawing works at 1:1 cell resolution with a `(glyph, attribute)` brush.
//! Attribute 0 marks a cell as unstyled; at render time it is replaced by the
//! widget's default attribute.

use unblessed_text::width::char_width;
use unicode_segmentation::UnicodeSegmentation;

use crate::Widget;
use crate::drawing::{ClipRect, circle_points, line_points, rect_points};
use crate::geometry::Rect;
use crate::screen::ScreenLines;

/// One canvas cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasCell {
    /// Attribute word; 0 inherits the default at render time.
    pub attr: u32,
    pub ch: String,
}

impl Default for CanvasCell {
    fn default() -> Self {
        Self {
            attr: 0,
            ch: " ".to_string(),
        }
    }
}

/// A `width × height` grid of [`CanvasCell`]s, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharCanvas {
    width: u16,
    height: u16,
    cells: Vec<CanvasCell>,
}

impl CharCanvas {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![CanvasCell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Write one cell. Out-of-range writes are ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, ch: &str, attr: u32) {
        if let Some(i) = self.index(x, y) {
            let cell = &mut self.cells[i];
            cell.attr = attr;
            if cell.ch != ch {
                cell.ch.clear();
                cell.ch.push_str(ch);
            }
        }
    }

    /// Read one cell; `None` out of range.
    #[must_use]
    pub fn get_cell(&self, x: i32, y: i32) -> Option<&CanvasCell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Fill every cell with `ch` and `attr`.
    pub fn clear(&mut self, ch: &str, attr: u32) {
        for cell in &mut self.cells {
            cell.attr = attr;
            cell.ch.clear();
            cell.ch.push_str(ch);
        }
    }

    /// Fill with spaces and attribute 0.
    pub fn clear_default(&mut self) {
        self.clear(" ", 0);
    }

    fn clip(&self) -> ClipRect {
        ClipRect::from_size(i32::from(self.width), i32::from(self.height))
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, ch: &str, attr: u32) {
        let clip = self.clip();
        line_points(x0, y0, x1, y1, clip, |x, y| self.set_cell(x, y, ch, attr));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, fill: bool, ch: &str, attr: u32) {
        let clip = self.clip();
        rect_points(x, y, w, h, fill, clip, |px, py| self.set_cell(px, py, ch, attr));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, fill: bool, ch: &str, attr: u32) {
        let clip = self.clip();
        circle_points(cx, cy, r, fill, clip, |px, py| self.set_cell(px, py, ch, attr));
    }

    /// Place graphemes of `text` left to right from `(x, y)`, one per cell.
    ///
    /// Zero-width graphemes are skipped and writing stops at the right edge.
    /// Returns the number of cells written.
    pub fn write_text(&mut self, x: i32, y: i32, text: &str, attr: u32) -> usize {
        let mut written = 0;
        let mut cx = x;
        for grapheme in text.graphemes(true) {
            if grapheme.chars().map(char_width).sum::<usize>() == 0 {
                continue;
            }
            if cx >= i32::from(self.width) {
                break;
            }
            if self.index(cx, y).is_some() {
                self.set_cell(cx, y, grapheme, attr);
                written += 1;
            }
            cx += 1;
        }
        written
    }

    /// The glyphs of row `y` concatenated.
    #[must_use]
    pub fn row_text(&self, y: u16) -> Option<String> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(
            self.cells[start..start + self.width as usize]
                .iter()
                .map(|c| c.ch.as_str())
                .collect(),
        )
    }

    /// Write the part of the canvas that fits in `area` into `screen`.
    ///
    /// Cells with attribute 0 are written with `default_attr`. Rows written
    /// are marked dirty.
    pub fn render_with_default(&self, area: Rect, screen: &mut ScreenLines, default_attr: u32) {
        let area = area.intersection(&screen.bounds());
        let cols = area.width.min(self.width);
        let rows = area.height.min(self.height);

        #[cfg(feature = "tracing")]
        tracing::trace!(cols, rows, default_attr, "rendering char canvas");

        for y in 0..rows {
            let start = y as usize * self.width as usize;
            let row = &self.cells[start..start + cols as usize];
            for (x, cell) in row.iter().enumerate() {
                let attr = if cell.attr == 0 { default_attr } else { cell.attr };
                screen.set(area.x + x as u16, area.y + y, attr, &cell.ch);
            }
        }
    }
}

/// A [`CharCanvas`] paired with the attribute its unstyled cells inherit.
#[derive(Debug, Clone, Copy)]
pub struct StyledCharCanvas<'a> {
    pub canvas: &'a CharCanvas,
    pub default_attr: u32,
}

impl<'a> StyledCharCanvas<'a> {
    #[must_use]
    pub const fn new(canvas: &'a CharCanvas, default_attr: u32) -> Self {
        Self {
            canvas,
            default_attr,
        }
    }
}

impl Widget for StyledCharCanvas<'_> {
    fn render(&self, area: Rect, screen: &mut ScreenLines) {
        self.canvas
            .render_with_default(area, screen, self.default_attr);
    }
}
