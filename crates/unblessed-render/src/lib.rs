#![forbid(unsafe_code)]

//! Screen buffer and canvas compositing for unblessed.
//!
//! - [`ScreenLines`] - the shared `(attribute, glyph)` grid with dirty rows
//! - [`PixelCanvas`] - 2 × 4 dot braille bitmap per cell
//! - [`CharCanvas`] - one glyph and attribute per cell
//! - [`drawing`] - Bresenham lines, rectangles, and midpoint circles
//!
//! # Example
//! ```
//! use unblessed_render::{CharCanvas, Rect, ScreenLines, StyledCharCanvas, Widget};
//!
//! let mut canvas = CharCanvas::new(4, 1);
//! canvas.write_text(0, 0, "hi", 0);
//!
//! let mut screen = ScreenLines::new(4, 1);
//! StyledCharCanvas::new(&canvas, 3).render(Rect::from_size(4, 1), &mut screen);
//! assert_eq!(screen.row_text(0).as_deref(), Some("hi  "));
//! assert_eq!(screen.get(0, 0).map(|c| c.attr), Some(3));
//! ```

pub mod braille;
pub mod char_canvas;
pub mod drawing;
pub mod geometry;
pub mod screen;

pub use braille::{BRAILLE_DOTS, PixelCanvas, braille_glyph};
pub use char_canvas::{CanvasCell, CharCanvas, StyledCharCanvas};
pub use geometry::Rect;
pub use screen::{ScreenCell, ScreenLine, ScreenLines};

/// Something that draws itself into a region of the screen.
pub trait Widget {
    /// Render into `area` of `screen`, clipping to both.
    fn render(&self, area: Rect, screen: &mut ScreenLines);
}
