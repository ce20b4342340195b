//! Canvases compositing into one shared screen buffer.

use unblessed_render::{
    CharCanvas, PixelCanvas, Rect, ScreenLines, StyledCharCanvas, Widget, braille_glyph,
};

#[test]
fn braille_line_scenario() {
    let mut canvas = PixelCanvas::new(1, 1);
    canvas.draw_line(0, 0, 1, 3);

    let mut set = Vec::new();
    for y in 0..canvas.pixel_height() {
        for x in 0..canvas.pixel_width() {
            if canvas.get_pixel(x, y) {
                set.push((x, y));
            }
        }
    }
    assert_eq!(set, vec![(0, 0), (0, 1), (1, 2), (1, 3)]);
}

#[test]
fn side_by_side_widgets_share_rows() {
    let mut screen = ScreenLines::new(6, 2);
    screen.take_dirty_rows();

    let mut pixels = PixelCanvas::new(2, 2);
    pixels.draw_rect(0, 0, 4, 8, true);
    pixels.render(Rect::new(0, 0, 2, 2), &mut screen);

    let mut chars = CharCanvas::new(3, 1);
    chars.write_text(0, 0, "abc", 0);
    StyledCharCanvas::new(&chars, 5).render(Rect::new(3, 1, 3, 1), &mut screen);

    let full = braille_glyph(0xFF).to_string();
    assert_eq!(screen.row_text(0), Some(format!("{full}{full}    ")));
    assert_eq!(screen.row_text(1), Some(format!("{full}{full} abc")));
    assert_eq!(screen.get(3, 1).map(|c| c.attr), Some(5));
    assert_eq!(screen.take_dirty_rows(), vec![0, 1]);
}

#[test]
fn cleared_pixel_canvas_blanks_previous_output() {
    let mut screen = ScreenLines::new(2, 1);
    let mut canvas = PixelCanvas::new(2, 1);
    canvas.draw_circle(1, 1, 1, true);
    canvas.render(screen.bounds(), &mut screen);
    assert_ne!(screen.row_text(0).as_deref(), Some("  "));

    canvas.clear();
    canvas.render(screen.bounds(), &mut screen);
    assert_eq!(screen.row_text(0).as_deref(), Some("  "));
}

#[test]
fn plotted_sine_stays_inside_canvas() {
    let mut canvas = PixelCanvas::new(20, 5);
    let height = f64::from(canvas.pixel_height());
    canvas.plot_function(
        f64::sin,
        0.0,
        std::f64::consts::TAU,
        1.0,
        height / 2.0 - 1.0,
        height / 2.0,
    );
    let lit = canvas.as_bytes().iter().filter(|&&b| b != 0).count();
    assert!(lit >= 20, "only {lit} cells lit");
    // Leftmost column starts at sin(0) = 0, the vertical middle.
    assert!(canvas.get_pixel(0, 10));
}

#[test]
fn canvas_larger_than_screen_is_clipped() {
    let mut screen = ScreenLines::new(2, 2);
    let mut canvas = CharCanvas::new(10, 10);
    canvas.clear("#", 1);
    StyledCharCanvas::new(&canvas, 0).render(Rect::new(1, 1, 10, 10), &mut screen);
    assert_eq!(screen.row_text(0).as_deref(), Some("  "));
    assert_eq!(screen.row_text(1).as_deref(), Some(" #"));
}
