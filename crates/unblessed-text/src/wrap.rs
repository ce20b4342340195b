#![forbid(unsafe_code)]

//! Greedy, ANSI-aware line wrapping.
//!
//! Each line is cut at exactly `width` visual columns, then the cut is pulled
//! back to a space if one lies within `look_back_distance` glyphs. There is no
//! minimal-raggedness optimization; lines are decided left to right.
//!
//! # Example
//! ```
//! use unblessed_text::wrap::{WrapOptions, wrap_text_lines};
//!
//! let lines = wrap_text_lines("hello world foo", &WrapOptions::new(11));
//! assert_eq!(lines, vec!["hello world", "foo"]);
//!
//! // No space in reach: hard break mid-word.
//! let lines = wrap_text_lines("abcdefghij", &WrapOptions::new(4));
//! assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
//! ```

use crate::width::{Unit, units};

/// Default number of glyphs searched backwards for a break opportunity.
pub const DEFAULT_LOOK_BACK_DISTANCE: usize = 10;

/// Options for line wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapOptions {
    /// Maximum width in columns. Zero disables wrapping.
    pub width: usize,
    /// Measure with full Unicode widths.
    pub full_unicode: bool,
    /// Glyphs searched backwards from the cut for a space.
    pub look_back_distance: usize,
}

impl WrapOptions {
    /// Create new wrap options with the given width.
    #[must_use]
    pub const fn new(width: usize) -> Self {
        Self {
            width,
            full_unicode: false,
            look_back_distance: DEFAULT_LOOK_BACK_DISTANCE,
        }
    }

    /// Set the width model.
    #[must_use]
    pub const fn full_unicode(mut self, full_unicode: bool) -> Self {
        self.full_unicode = full_unicode;
        self
    }

    /// Set the look-back window.
    #[must_use]
    pub const fn look_back_distance(mut self, distance: usize) -> Self {
        self.look_back_distance = distance;
        self
    }
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self::new(80)
    }
}

/// Iterator over the wrapped lines of one paragraph.
///
/// Cloning yields an independent iterator from the same position. Embedded
/// newlines are not treated specially; split paragraphs first.
#[derive(Debug, Clone)]
pub struct LineWrapper<'a> {
    text: &'a str,
    units: Vec<Unit>,
    /// `remaining[i]` = total width of `units[i..]`.
    remaining: Vec<usize>,
    cursor: usize,
    options: WrapOptions,
    finished: bool,
}

impl<'a> LineWrapper<'a> {
    /// Prepare to wrap `text`.
    #[must_use]
    pub fn new(text: &'a str, options: WrapOptions) -> Self {
        let units = units(text, options.full_unicode);
        let mut remaining = vec![0; units.len() + 1];
        for i in (0..units.len()).rev() {
            remaining[i] = remaining[i + 1] + units[i].width;
        }
        Self {
            text,
            units,
            remaining,
            cursor: 0,
            options,
            finished: false,
        }
    }

    fn byte_at(&self, unit: usize) -> usize {
        self.units.get(unit).map_or(self.text.len(), |u| u.start)
    }

    fn emit_rest(&mut self) -> String {
        self.finished = true;
        self.text[self.byte_at(self.cursor)..].to_string()
    }

    /// Index of the first glyph at or after `self.cursor` that does not fit.
    fn raw_cut(&self) -> usize {
        let mut acc = 0;
        for (i, unit) in self.units.iter().enumerate().skip(self.cursor) {
            if unit.is_escape() {
                continue;
            }
            if acc + unit.width > self.options.width {
                return i;
            }
            acc += unit.width;
        }
        self.units.len()
    }

    /// End byte of the last glyph before unit `cut` on the current line.
    fn glyph_end_before(&self, cut: usize) -> Option<usize> {
        self.units[self.cursor..cut]
            .iter()
            .rev()
            .find(|u| !u.is_escape())
            .map(|u| u.end)
    }

    /// Search the look-back window (the cut glyph plus up to
    /// `look_back_distance` glyphs before it) for a space.
    fn find_space(&self, cut: usize) -> Option<usize> {
        let window = self.options.look_back_distance + 1;
        (self.cursor..=cut)
            .rev()
            .filter(|&i| !self.units[i].is_escape())
            .take(window)
            .find(|&i| self.units[i].slice(self.text) == " ")
    }
}

impl Iterator for LineWrapper<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }
        let width = self.options.width;
        if width == 0 || self.remaining[self.cursor] <= width {
            return Some(self.emit_rest());
        }

        let start = self.byte_at(self.cursor);
        let cut = self.raw_cut();
        let (line_end, next) = match self.find_space(cut) {
            // The space ends the line, even when it is the glyph that overflowed.
            Some(space) => (self.units[space].end, space + 1),
            None => match self.glyph_end_before(cut) {
                Some(end) => (end, self.next_after(end)),
                // Not even one glyph fits: emit it alone to make progress.
                None => (self.units[cut].end, cut + 1),
            },
        };

        self.cursor = next;
        let mut line = self.text[start..line_end].to_string();
        if self.remaining[self.cursor] == 0 {
            // Only escapes (or nothing) left: keep them on this line.
            self.finished = true;
            line.push_str(&self.text[self.byte_at(self.cursor)..]);
        }
        Some(line)
    }
}

impl LineWrapper<'_> {
    /// Unit index starting at byte `end`.
    fn next_after(&self, end: usize) -> usize {
        self.units[self.cursor..]
            .iter()
            .position(|u| u.start >= end)
            .map_or(self.units.len(), |p| self.cursor + p)
    }
}

/// Wrap `text` into lines no wider than `options.width`.
///
/// Always returns at least one line; empty input yields `[""]`.
#[must_use]
pub fn wrap_text_lines(text: &str, options: &WrapOptions) -> Vec<String> {
    LineWrapper::new(text, *options).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_ansi;
    use crate::width::measure_visual_width;

    fn wrap(text: &str, width: usize) -> Vec<String> {
        wrap_text_lines(text, &WrapOptions::new(width))
    }

    #[test]
    fn empty_yields_one_empty_line() {
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("", 0), vec![""]);
    }

    #[test]
    fn fitting_text_is_one_line() {
        assert_eq!(wrap("hello", 10), vec!["hello"]);
        assert_eq!(wrap("hello", 5), vec!["hello"]);
    }

    #[test]
    fn space_at_cut_stays_on_line() {
        let lines = wrap("hello world", 5);
        assert_eq!(lines, vec!["hello ", "world"]);
        assert_eq!(lines.concat(), "hello world");
    }

    #[test]
    fn space_inside_window_ends_line() {
        // Cut at 8 lands inside "world"; the space at index 5 is in reach.
        assert_eq!(wrap("hello world", 8), vec!["hello ", "world"]);
    }

    #[test]
    fn multiple_lines() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick ", "brown fox ", "jumps"]
        );
    }

    #[test]
    fn hard_break_without_space() {
        assert_eq!(wrap("supercalifragilistic", 10), vec!["supercalif", "ragilistic"]);
    }

    #[test]
    fn look_back_distance_limits_search() {
        let text = "a bcdefghijklmno";
        // Cut at 8 ("a bcdefg|hij"), space at index 1 is 7 glyphs back.
        let near = wrap_text_lines(text, &WrapOptions::new(8).look_back_distance(3));
        assert_eq!(near[0], "a bcdefg");
        let far = wrap_text_lines(text, &WrapOptions::new(8).look_back_distance(7));
        assert_eq!(far[0], "a ");
    }

    #[test]
    fn zero_look_back_only_checks_cut() {
        let opts = WrapOptions::new(5).look_back_distance(0);
        assert_eq!(wrap_text_lines("hello world", &opts), vec!["hello ", "world"]);
        assert_eq!(wrap_text_lines("hi there", &opts), vec!["hi th", "ere"]);
    }

    #[test]
    fn zero_width_disables_wrapping() {
        assert_eq!(wrap("hello world", 0), vec!["hello world"]);
    }

    #[test]
    fn trailing_space_at_cut_leaves_no_empty_line() {
        assert_eq!(wrap("abcde ", 5), vec!["abcde "]);
    }

    #[test]
    fn trailing_escape_stays_on_last_line() {
        let lines = wrap("abcde \x1b[0m", 5);
        assert_eq!(lines, vec!["abcde \x1b[0m"]);
        assert_eq!(measure_visual_width(&lines[0], false), 6);
    }

    #[test]
    fn escapes_do_not_count_toward_width() {
        let text = "\x1b[1mhello\x1b[0m world";
        let lines = wrap(text, 5);
        assert_eq!(lines, vec!["\x1b[1mhello\x1b[0m ", "world"]);
    }

    #[test]
    fn hard_break_moves_escape_to_next_line() {
        let lines = wrap("abc\x1b[31mdef", 3);
        assert_eq!(lines, vec!["abc", "\x1b[31mdef"]);
    }

    #[test]
    fn wide_glyph_wider_than_width_makes_progress() {
        let opts = WrapOptions::new(1).full_unicode(true);
        assert_eq!(wrap_text_lines("你好", &opts), vec!["你", "好"]);
    }

    #[test]
    fn cjk_full_unicode() {
        let opts = WrapOptions::new(4).full_unicode(true);
        assert_eq!(wrap_text_lines("你好世界", &opts), vec!["你好", "世界"]);
        let opts = WrapOptions::new(5).full_unicode(true);
        assert_eq!(wrap_text_lines("你好世", &opts), vec!["你好", "世"]);
    }

    #[test]
    fn wrapper_is_restartable() {
        let wrapper = LineWrapper::new("aaa bbb ccc", WrapOptions::new(4));
        let again = wrapper.clone();
        assert_eq!(wrapper.collect::<Vec<_>>(), again.collect::<Vec<_>>());
    }

    #[test]
    fn wrapper_is_fused_after_end() {
        let mut wrapper = LineWrapper::new("ab", WrapOptions::new(4));
        assert_eq!(wrapper.next().as_deref(), Some("ab"));
        assert_eq!(wrapper.next(), None);
        assert_eq!(wrapper.next(), None);
    }

    #[test]
    fn options_builder() {
        let opts = WrapOptions::new(40).full_unicode(true).look_back_distance(3);
        assert_eq!(opts.width, 40);
        assert!(opts.full_unicode);
        assert_eq!(opts.look_back_distance, 3);
        assert_eq!(WrapOptions::default().look_back_distance, DEFAULT_LOOK_BACK_DISTANCE);
    }

    #[test]
    fn stripped_lines_reconstruct_plain_text() {
        let text = "\x1b[1mthe\x1b[0m quick brown";
        let joined: String = wrap(text, 6).concat();
        assert_eq!(joined, text);
        assert_eq!(strip_ansi(&joined), "the quick brown");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::width::measure_visual_width;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn lines_never_exceed_width(s in "[a-zA-Z ]{0,100}", width in 1usize..40) {
            for line in wrap_text_lines(&s, &WrapOptions::new(width)) {
                // A line may end with the one space that stopped it.
                let body = line.strip_suffix(' ').unwrap_or(&line);
                prop_assert!(measure_visual_width(body, false) <= width, "{line:?} > {width}");
            }
        }

        #[test]
        fn wide_lines_never_exceed_width(s in "[a-z你好 ]{0,60}", width in 2usize..20) {
            let opts = WrapOptions::new(width).full_unicode(true);
            for line in wrap_text_lines(&s, &opts) {
                let body = line.strip_suffix(' ').unwrap_or(&line);
                prop_assert!(measure_visual_width(body, true) <= width);
            }
        }

        #[test]
        fn lines_concatenate_to_input(s in "[a-zA-Z ]{0,100}", width in 1usize..40) {
            let joined = wrap_text_lines(&s, &WrapOptions::new(width)).concat();
            prop_assert_eq!(joined, s);
        }

        #[test]
        fn spaceless_text_reconstructs_exactly(s in "[a-z]{0,80}", width in 1usize..20) {
            let joined = wrap_text_lines(&s, &WrapOptions::new(width)).concat();
            prop_assert_eq!(joined, s);
        }

        #[test]
        fn always_at_least_one_line(s in ".{0,40}", width in 0usize..20) {
            prop_assert!(!wrap_text_lines(&s, &WrapOptions::new(width)).is_empty());
        }
    }
}
