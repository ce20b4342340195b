#![forbid(unsafe_code)]

//! Visual width measurement.
//!
//! Width is counted in terminal columns after skipping SGR sequences. Two
//! models are supported:
//!
//! - **narrow** (`full_unicode == false`): every UTF-16 code unit is one
//!   column. This is the ASCII fast path; astral characters count as 2 and
//!   wide CJK glyphs as 1.
//! - **full unicode**: per-character cell widths from `unicode-width`
//!   (0 for combining marks, 2 for wide and emoji glyphs).
//!
//! # Example
//! ```
//! use unblessed_text::width::{measure_visual_width, needs_wrapping};
//!
//! assert_eq!(measure_visual_width("\x1b[1mhello\x1b[0m", false), 5);
//! assert_eq!(measure_visual_width("你好", true), 4);
//! assert_eq!(measure_visual_width("你好", false), 2);
//! assert!(needs_wrapping("hello world", 5, false));
//! ```

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use crate::ansi::{AnsiRun, AnsiScanner, SgrParams};

/// Cell width of one character under the full-unicode model.
#[inline]
#[must_use]
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Width of a literal (escape-free) string under the selected model.
#[inline]
fn literal_width(text: &str, full_unicode: bool) -> usize {
    if full_unicode {
        if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
            return text.len();
        }
        text.chars().map(char_width).sum()
    } else if text.is_ascii() {
        text.len()
    } else {
        text.chars().map(char::len_utf16).sum()
    }
}

/// Visual column count of `text`, ignoring SGR sequences.
#[must_use]
pub fn measure_visual_width(text: &str, full_unicode: bool) -> usize {
    AnsiScanner::new(text)
        .map(|run| match run {
            AnsiRun::Text { content } => literal_width(content, full_unicode),
            AnsiRun::Escape { .. } => 0,
        })
        .sum()
}

/// Whether `text` is wider than `width` columns.
#[inline]
#[must_use]
pub fn needs_wrapping(text: &str, width: usize, full_unicode: bool) -> bool {
    measure_visual_width(text, full_unicode) > width
}

/// An indivisible piece of a string for cutting purposes.
///
/// Escapes carry their parameters and have width 0. Glyphs are characters in
/// narrow mode and grapheme clusters in full-unicode mode, so a cut never
/// lands inside an escape, a surrogate pair, or a combining sequence.
#[derive(Debug, Clone)]
pub(crate) struct Unit {
    pub start: usize,
    pub end: usize,
    pub width: usize,
    pub params: Option<SgrParams>,
}

impl Unit {
    #[inline]
    pub fn is_escape(&self) -> bool {
        self.params.is_some()
    }

    #[inline]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Split `text` into escape and glyph units.
pub(crate) fn units(text: &str, full_unicode: bool) -> Vec<Unit> {
    let mut out = Vec::with_capacity(text.len());
    let mut offset = 0;
    for run in AnsiScanner::new(text) {
        let len = run.byte_len();
        match run {
            AnsiRun::Escape { params, .. } => out.push(Unit {
                start: offset,
                end: offset + len,
                width: 0,
                params: Some(params),
            }),
            AnsiRun::Text { content } if full_unicode => {
                for (idx, grapheme) in content.grapheme_indices(true) {
                    out.push(Unit {
                        start: offset + idx,
                        end: offset + idx + grapheme.len(),
                        width: grapheme.chars().map(char_width).sum(),
                        params: None,
                    });
                }
            }
            AnsiRun::Text { content } => {
                for (idx, c) in content.char_indices() {
                    out.push(Unit {
                        start: offset + idx,
                        end: offset + idx + c.len_utf8(),
                        width: c.len_utf16(),
                        params: None,
                    });
                }
            }
        }
        offset += len;
    }
    out
}

/// Byte offset just past the widest glyph prefix of `units` fitting `limit`.
///
/// Escapes between fitting glyphs are inside the prefix; escapes after the
/// last fitting glyph are not.
pub(crate) fn prefix_end(units: &[Unit], limit: usize) -> usize {
    let mut acc = 0;
    let mut end = units.first().map_or(0, |u| u.start);
    for unit in units.iter().filter(|u| !u.is_escape()) {
        if acc + unit.width > limit {
            break;
        }
        acc += unit.width;
        end = unit.end;
    }
    end
}

/// Byte offset where the widest glyph suffix of `units` fitting `limit` starts.
///
/// `text_len` is returned for an empty suffix.
pub(crate) fn suffix_start(units: &[Unit], limit: usize, text_len: usize) -> usize {
    let mut acc = 0;
    let mut start = text_len;
    for unit in units.iter().rev().filter(|u| !u.is_escape()) {
        if acc + unit.width > limit {
            break;
        }
        acc += unit.width;
        start = unit.start;
    }
    start
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::ansi::strip_ansi;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn escapes_never_add_width(s in "[a-z 你]{0,30}", bold in any::<bool>()) {
            let styled = if bold { format!("\x1b[1m{s}\x1b[0m") } else { s.clone() };
            prop_assert_eq!(measure_visual_width(&styled, true), measure_visual_width(&s, true));
            prop_assert_eq!(measure_visual_width(&styled, false), measure_visual_width(&s, false));
        }

        #[test]
        fn unit_widths_sum_to_measure(s in "[a-zA-Z你好😀 ]{0,30}", full in any::<bool>()) {
            let total: usize = units(&s, full).iter().map(|u| u.width).sum();
            prop_assert_eq!(total, measure_visual_width(&s, full));
        }

        #[test]
        fn stripping_preserves_width(s in "[a-z]{0,10}", t in "[a-z]{0,10}") {
            let text = format!("{s}\x1b[4m{t}");
            prop_assert_eq!(measure_visual_width(&strip_ansi(&text), false), s.len() + t.len());
        }
    }
}
