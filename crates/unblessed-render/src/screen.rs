#![forbid(unsafe_code)]

//! The shared screen line buffer.
//!
//! Widgets composite into a grid of `(attribute, glyph)` cells and mark the
//! rows they touch as dirty. A compositor later flushes dirty rows to the
//! terminal and clears the flags with [`ScreenLines::take_dirty_rows`].
//!
//! A wide glyph occupies its head cell plus one continuation cell whose glyph
//! is the empty string.

use unblessed_text::strip_ansi;
use unblessed_text::width::char_width;
use unicode_segmentation::UnicodeSegmentation;

use crate::geometry::Rect;

/// One terminal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenCell {
    /// Packed attribute word. Zero is the terminal default.
    pub attr: u32,
    /// Grapheme shown in the cell; empty for the tail of a wide glyph.
    pub ch: String,
}

impl ScreenCell {
    #[must_use]
    pub fn new(attr: u32, ch: impl Into<String>) -> Self {
        Self {
            attr,
            ch: ch.into(),
        }
    }

    /// A space with the given attribute.
    #[must_use]
    pub fn blank(attr: u32) -> Self {
        Self::new(attr, " ")
    }

    /// Whether this cell is covered by the wide glyph to its left.
    #[inline]
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.ch.is_empty()
    }
}

impl Default for ScreenCell {
    fn default() -> Self {
        Self::blank(0)
    }
}

/// One row of cells with its dirty flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLine {
    pub cells: Vec<ScreenCell>,
    pub dirty: bool,
}

/// Row-major grid of screen cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLines {
    width: u16,
    height: u16,
    lines: Vec<ScreenLine>,
}

impl ScreenLines {
    /// A blank screen. Every row starts dirty so the first flush paints it.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let lines = (0..height)
            .map(|_| ScreenLine {
                cells: vec![ScreenCell::default(); width as usize],
                dirty: true,
            })
            .collect();
        Self {
            width,
            height,
            lines,
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

    /// The whole screen as a rectangle.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[must_use]
    pub fn line(&self, y: u16) -> Option<&ScreenLine> {
        self.lines.get(y as usize)
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&ScreenCell> {
        self.lines.get(y as usize)?.cells.get(x as usize)
    }

    /// Write one cell and mark its row dirty. Out-of-range writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, attr: u32, ch: &str) {
        let Some(line) = self.lines.get_mut(y as usize) else {
            return;
        };
        let Some(cell) = line.cells.get_mut(x as usize) else {
            return;
        };
        cell.attr = attr;
        if cell.ch != ch {
            cell.ch.clear();
            cell.ch.push_str(ch);
        }
        line.dirty = true;
    }

    pub fn mark_dirty(&mut self, y: u16) {
        if let Some(line) = self.lines.get_mut(y as usize) {
            line.dirty = true;
        }
    }

    #[must_use]
    pub fn is_dirty(&self, y: u16) -> bool {
        self.lines.get(y as usize).is_some_and(|line| line.dirty)
    }

    /// Indices of dirty rows, clearing their flags.
    pub fn take_dirty_rows(&mut self) -> Vec<u16> {
        let mut rows = Vec::new();
        for (y, line) in self.lines.iter_mut().enumerate() {
            if line.dirty {
                line.dirty = false;
                rows.push(y as u16);
            }
        }
        rows
    }

    /// Blank every cell with `attr` and mark every row dirty.
    pub fn clear(&mut self, attr: u32) {
        for line in &mut self.lines {
            line.cells.fill(ScreenCell::blank(attr));
            line.dirty = true;
        }
    }

    /// Glyphs of row `y` concatenated, ignoring attributes.
    #[must_use]
    pub fn row_text(&self, y: u16) -> Option<String> {
        self.line(y)
            .map(|line| line.cells.iter().map(|c| c.ch.as_str()).collect())
    }

    /// Write `text` starting at `(x, y)`, at most `max_width` columns wide.
    ///
    /// SGR sequences are stripped and glyphs are measured with full Unicode
    /// widths. A wide glyph that would straddle the limit is not written.
    /// Returns the number of columns written.
    pub fn put_text(&mut self, x: u16, y: u16, text: &str, attr: u32, max_width: u16) -> u16 {
        if y >= self.height {
            return 0;
        }
        let limit = x.saturating_add(max_width).min(self.width);
        let mut cx = x;
        let plain = strip_ansi(text);
        for grapheme in plain.graphemes(true) {
            let width = grapheme.chars().map(char_width).sum::<usize>().min(2) as u16;
            if width == 0 {
                continue;
            }
            if u32::from(cx) + u32::from(width) > u32::from(limit) {
                break;
            }
            self.set(cx, y, attr, grapheme);
            if width == 2 {
                self.set(cx + 1, y, attr, "");
            }
            cx += width;
        }
        cx - x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_screen_is_blank_and_dirty() {
        let mut screen = ScreenLines::new(3, 2);
        assert_eq!(screen.row_text(0).as_deref(), Some("   "));
        assert_eq!(screen.take_dirty_rows(), vec![0, 1]);
        assert!(screen.take_dirty_rows().is_empty());
    }

    #[test]
    fn set_marks_row_dirty() {
        let mut screen = ScreenLines::new(4, 3);
        screen.take_dirty_rows();
        screen.set(1, 2, 7, "x");
        assert_eq!(screen.get(1, 2), Some(&ScreenCell::new(7, "x")));
        assert!(screen.is_dirty(2));
        assert!(!screen.is_dirty(0));
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut screen = ScreenLines::new(2, 2);
        screen.take_dirty_rows();
        screen.set(2, 0, 1, "x");
        screen.set(0, 5, 1, "x");
        screen.mark_dirty(9);
        assert!(screen.get(2, 0).is_none());
        assert!(screen.take_dirty_rows().is_empty());
        assert!(!screen.is_dirty(9));
    }

    #[test]
    fn clear_fills_with_attr() {
        let mut screen = ScreenLines::new(2, 1);
        screen.set(0, 0, 3, "a");
        screen.clear(5);
        assert_eq!(screen.get(0, 0), Some(&ScreenCell::blank(5)));
    }

    #[test]
    fn put_text_strips_escapes() {
        let mut screen = ScreenLines::new(10, 1);
        let written = screen.put_text(1, 0, "\x1b[1mhi\x1b[0m", 2, 10);
        assert_eq!(written, 2);
        assert_eq!(screen.row_text(0).as_deref(), Some(" hi       "));
        assert_eq!(screen.get(1, 0).map(|c| c.attr), Some(2));
    }

    #[test]
    fn put_text_wide_glyphs_use_continuation_cells() {
        let mut screen = ScreenLines::new(5, 1);
        let written = screen.put_text(0, 0, "你好吗", 0, 5);
        assert_eq!(written, 4);
        assert!(screen.get(1, 0).is_some_and(ScreenCell::is_continuation));
        assert_eq!(screen.row_text(0).as_deref(), Some("你好 "));
    }

    #[test]
    fn put_text_at_right_edge_of_widest_screen() {
        let mut screen = ScreenLines::new(u16::MAX, 1);
        let last = u16::MAX - 1;
        assert_eq!(screen.put_text(last, 0, "你", 0, 5), 0);
        assert_eq!(screen.get(last, 0), Some(&ScreenCell::default()));
        assert_eq!(screen.put_text(last, 0, "ab", 0, u16::MAX), 1);
        assert_eq!(screen.get(last, 0).map(|c| c.ch.as_str()), Some("a"));
        assert_eq!(screen.put_text(u16::MAX - 2, 0, "你", 0, 2), 2);
        assert!(screen.get(last, 0).is_some_and(ScreenCell::is_continuation));
    }

    #[test]
    fn put_text_respects_max_width() {
        let mut screen = ScreenLines::new(10, 1);
        assert_eq!(screen.put_text(0, 0, "abcdef", 0, 3), 3);
        assert_eq!(screen.row_text(0).as_deref(), Some("abc       "));
        assert_eq!(screen.put_text(0, 1, "abc", 0, 3), 0);
    }
}
