#![forbid(unsafe_code)]

//! SGR escape-sequence scanning and style-state tracking.
//!
//! The scanner splits a string into literal text runs and SGR (Select Graphic
//! Rendition) sequences of the exact form `ESC [ <digits/semicolons>* m`.
//! Everything else, including a lone ESC or a sequence truncated at the end of
//! the string, is literal text. Scanning never fails.
//!
//! # Example
//! ```
//! use unblessed_text::ansi::{AnsiRun, AnsiScanner, get_active_ansi_codes, strip_ansi};
//!
//! let text = "\x1b[1mbold\x1b[0m plain";
//! let runs: Vec<_> = AnsiScanner::new(text).collect();
//! assert_eq!(runs.len(), 4);
//! assert!(matches!(runs[1], AnsiRun::Text { content: "bold" }));
//!
//! assert_eq!(strip_ansi(text), "bold plain");
//! assert_eq!(get_active_ansi_codes(text, 5), "\x1b[1m");
//! assert_eq!(get_active_ansi_codes(text, text.len()), "");
//! ```

use std::borrow::Cow;
use std::fmt::Write as _;

use memchr::memchr;
use smallvec::SmallVec;

/// The escape byte that introduces every SGR sequence.
pub const ESC: u8 = 0x1b;

/// SGR reset: `CSI 0 m`.
pub const SGR_RESET: &str = "\x1b[0m";

/// Numeric SGR parameters (`ESC [ 1 ; 31 m` → `[1, 31]`).
pub type SgrParams = SmallVec<[u16; 4]>;

/// A scanned piece of a string: literal text or one SGR sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnsiRun<'a> {
    /// Literal text (never empty).
    Text { content: &'a str },
    /// One complete SGR sequence. `code` is the original bytes.
    Escape { code: &'a str, params: SgrParams },
}

impl AnsiRun<'_> {
    /// Length of the run in bytes of the source string.
    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Text { content } => content.len(),
            Self::Escape { code, .. } => code.len(),
        }
    }

    /// Whether this run is an escape sequence.
    #[inline]
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        matches!(self, Self::Escape { .. })
    }
}

/// Lazy, restartable scanner over a string's [`AnsiRun`]s.
#[derive(Debug, Clone)]
pub struct AnsiScanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> AnsiScanner<'a> {
    /// Start scanning `text` from the beginning.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Byte offset of the next run.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for AnsiScanner<'a> {
    type Item = AnsiRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        let start = self.pos;
        if start >= bytes.len() {
            return None;
        }

        if let Some(end) = sgr_end(bytes, start) {
            self.pos = end;
            let code = &self.text[start..end];
            return Some(AnsiRun::Escape {
                code,
                params: parse_params(&code[2..code.len() - 1]),
            });
        }

        // Literal run: extend to the next ESC that opens a well-formed SGR.
        // A malformed ESC is swallowed into the literal run.
        let mut search = if bytes[start] == ESC { start + 1 } else { start };
        let end = loop {
            match memchr(ESC, &bytes[search..]) {
                Some(rel) => {
                    let idx = search + rel;
                    if sgr_end(bytes, idx).is_some() {
                        break idx;
                    }
                    search = idx + 1;
                }
                None => break bytes.len(),
            }
        };

        self.pos = end;
        Some(AnsiRun::Text {
            content: &self.text[start..end],
        })
    }
}

/// If an SGR sequence starts at `idx`, return the byte index just past it.
fn sgr_end(bytes: &[u8], idx: usize) -> Option<usize> {
    if bytes.get(idx) != Some(&ESC) || bytes.get(idx + 1) != Some(&b'[') {
        return None;
    }
    let mut j = idx + 2;
    while j < bytes.len() && (bytes[j].is_ascii_digit() || bytes[j] == b';') {
        j += 1;
    }
    (bytes.get(j) == Some(&b'm')).then_some(j + 1)
}

/// Parse the body between `ESC [` and `m`. An empty body means reset.
fn parse_params(body: &str) -> SgrParams {
    if body.is_empty() {
        return SmallVec::from_slice(&[0]);
    }
    body.split(';')
        .map(|field| {
            field.bytes().fold(0u16, |acc, b| {
                acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
            })
        })
        .collect()
}

bitflags::bitflags! {
    /// Boolean SGR attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u8 {
        /// Bold / increased intensity (SGR 1).
        const BOLD          = 0b0000_0001;
        /// Dim / decreased intensity (SGR 2).
        const DIM           = 0b0000_0010;
        /// Italic (SGR 3).
        const ITALIC        = 0b0000_0100;
        /// Underline (SGR 4).
        const UNDERLINE     = 0b0000_1000;
        /// Blink (SGR 5/6).
        const BLINK         = 0b0001_0000;
        /// Inverse video (SGR 7).
        const INVERSE       = 0b0010_0000;
        /// Hidden (SGR 8).
        const HIDDEN        = 0b0100_0000;
        /// Strikethrough (SGR 9).
        const STRIKETHROUGH = 0b1000_0000;
    }
}

/// Flag → enabling SGR code, in serialization order.
const FLAG_CODES: [(StyleFlags, u16); 8] = [
    (StyleFlags::BOLD, 1),
    (StyleFlags::DIM, 2),
    (StyleFlags::ITALIC, 3),
    (StyleFlags::UNDERLINE, 4),
    (StyleFlags::BLINK, 5),
    (StyleFlags::INVERSE, 7),
    (StyleFlags::HIDDEN, 8),
    (StyleFlags::STRIKETHROUGH, 9),
];

/// Foreground or background color marker.
///
/// Extended colors (`38;5;n`, `38;2;r;g;b`) are recorded as [`ColorState::Custom`];
/// only "is a color active" matters for closing and reopening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorState {
    /// Terminal default color.
    #[default]
    Default,
    /// One of the 16 basic colors, stored as its SGR code.
    Basic(u16),
    /// A 256-color or truecolor value.
    Custom,
}

impl ColorState {
    /// Whether a non-default color is set.
    #[inline]
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::Default)
    }
}

/// Cumulative style state produced by replaying SGR sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SgrState {
    /// Active boolean attributes.
    pub flags: StyleFlags,
    /// Foreground color marker.
    pub fg: ColorState,
    /// Background color marker.
    pub bg: ColorState,
}

impl Default for SgrState {
    fn default() -> Self {
        Self::new()
    }
}

impl SgrState {
    /// A state with nothing active.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flags: StyleFlags::empty(),
            fg: ColorState::Default,
            bg: ColorState::Default,
        }
    }

    /// Clear every attribute and color.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Apply one SGR parameter list.
    pub fn apply(&mut self, params: &[u16]) {
        if params.is_empty() {
            self.reset();
            return;
        }

        let mut i = 0;
        while i < params.len() {
            match params[i] {
                0 => self.reset(),
                1 => self.flags.insert(StyleFlags::BOLD),
                2 => self.flags.insert(StyleFlags::DIM),
                3 => self.flags.insert(StyleFlags::ITALIC),
                4 => self.flags.insert(StyleFlags::UNDERLINE),
                5 | 6 => self.flags.insert(StyleFlags::BLINK),
                7 => self.flags.insert(StyleFlags::INVERSE),
                8 => self.flags.insert(StyleFlags::HIDDEN),
                9 => self.flags.insert(StyleFlags::STRIKETHROUGH),
                22 => self.flags.remove(StyleFlags::BOLD | StyleFlags::DIM),
                23 => self.flags.remove(StyleFlags::ITALIC),
                24 => self.flags.remove(StyleFlags::UNDERLINE),
                25 => self.flags.remove(StyleFlags::BLINK),
                27 => self.flags.remove(StyleFlags::INVERSE),
                28 => self.flags.remove(StyleFlags::HIDDEN),
                29 => self.flags.remove(StyleFlags::STRIKETHROUGH),
                code @ (30..=37 | 90..=97) => self.fg = ColorState::Basic(code),
                39 => self.fg = ColorState::Default,
                code @ (40..=47 | 100..=107) => self.bg = ColorState::Basic(code),
                49 => self.bg = ColorState::Default,
                code @ (38 | 48) => {
                    let skip = match params.get(i + 1) {
                        Some(5) => 2,
                        Some(2) => 4,
                        _ => 0,
                    };
                    if skip > 0 {
                        if code == 38 {
                            self.fg = ColorState::Custom;
                        } else {
                            self.bg = ColorState::Custom;
                        }
                    }
                    i += skip;
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Whether any attribute or color is active.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.flags.is_empty() || self.fg.is_set() || self.bg.is_set()
    }

    /// SGR sequence re-enabling the active boolean attributes, or `""`.
    ///
    /// Colors are tracked but not re-serialized.
    #[must_use]
    pub fn active_codes(&self) -> String {
        let mut out = String::new();
        for (flag, code) in FLAG_CODES {
            if self.flags.contains(flag) {
                out.push_str(if out.is_empty() { "\x1b[" } else { ";" });
                let _ = write!(out, "{code}");
            }
        }
        if !out.is_empty() {
            out.push('m');
        }
        out
    }

    /// Sequence needed to close the current state (`""` when inactive).
    #[inline]
    #[must_use]
    pub const fn close_sequence(&self) -> &'static str {
        if self.is_active() { SGR_RESET } else { "" }
    }
}

/// Style state produced by every escape that starts strictly before byte `position`.
#[must_use]
pub fn state_at(text: &str, position: usize) -> SgrState {
    let mut state = SgrState::new();
    let mut offset = 0;
    for run in AnsiScanner::new(text) {
        if offset >= position {
            break;
        }
        if let AnsiRun::Escape { params, .. } = &run {
            state.apply(params);
        }
        offset += run.byte_len();
    }
    state
}

/// Codes for the boolean attributes active at byte `position`.
///
/// See [`SgrState::active_codes`].
#[must_use]
pub fn get_active_ansi_codes(text: &str, position: usize) -> String {
    state_at(text, position).active_codes()
}

/// Remove every SGR sequence from `text`.
///
/// Borrows when there is nothing to strip.
#[must_use]
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if memchr(ESC, text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for run in AnsiScanner::new(text) {
        if let AnsiRun::Text { content } = run {
            out.push_str(content);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(text: &str) -> Vec<AnsiRun<'_>> {
        AnsiScanner::new(text).collect()
    }

    #[test]
    fn plain_text_is_single_run() {
        assert_eq!(runs("hello"), vec![AnsiRun::Text { content: "hello" }]);
    }

    #[test]
    fn empty_text_has_no_runs() {
        assert!(runs("").is_empty());
    }

    #[test]
    fn escape_params_are_parsed() {
        let r = runs("\x1b[1;31mx");
        assert_eq!(r.len(), 2);
        match &r[0] {
            AnsiRun::Escape { code, params } => {
                assert_eq!(*code, "\x1b[1;31m");
                assert_eq!(params.as_slice(), &[1, 31]);
            }
            other => panic!("expected escape, got {other:?}"),
        }
    }

    #[test]
    fn empty_params_mean_reset() {
        let r = runs("\x1b[m");
        assert!(matches!(&r[0], AnsiRun::Escape { params, .. } if params.as_slice() == [0]));
    }

    #[test]
    fn empty_fields_are_zero() {
        let r = runs("\x1b[;4m");
        assert!(matches!(&r[0], AnsiRun::Escape { params, .. } if params.as_slice() == [0, 4]));
    }

    #[test]
    fn huge_param_saturates() {
        let r = runs("\x1b[999999m");
        assert!(matches!(&r[0], AnsiRun::Escape { params, .. } if params.as_slice() == [u16::MAX]));
    }

    #[test]
    fn non_sgr_csi_is_literal() {
        // Cursor movement is not SGR; it stays in the text.
        assert_eq!(runs("a\x1b[2Jb"), vec![AnsiRun::Text { content: "a\x1b[2Jb" }]);
    }

    #[test]
    fn truncated_escape_at_end_is_literal() {
        assert_eq!(runs("ab\x1b[31"), vec![AnsiRun::Text { content: "ab\x1b[31" }]);
        assert_eq!(runs("\x1b"), vec![AnsiRun::Text { content: "\x1b" }]);
        assert_eq!(runs("\x1b["), vec![AnsiRun::Text { content: "\x1b[" }]);
    }

    #[test]
    fn malformed_escape_before_valid_one() {
        let r = runs("\x1b[xy\x1b[1mz");
        assert_eq!(r[0], AnsiRun::Text { content: "\x1b[xy" });
        assert!(r[1].is_escape());
        assert_eq!(r[2], AnsiRun::Text { content: "z" });
    }

    #[test]
    fn runs_cover_input_exactly() {
        let text = "\x1b[1mA\x1b[0m\x1b[4mBC\x1b[q";
        let total: usize = runs(text).iter().map(AnsiRun::byte_len).sum();
        assert_eq!(total, text.len());
    }

    #[test]
    fn scanner_is_restartable() {
        let scanner = AnsiScanner::new("\x1b[1mA");
        let first: Vec<_> = scanner.clone().collect();
        let second: Vec<_> = scanner.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn scanner_offset_advances() {
        let mut scanner = AnsiScanner::new("\x1b[1mA");
        assert_eq!(scanner.offset(), 0);
        scanner.next();
        assert_eq!(scanner.offset(), 4);
    }

    #[test]
    fn state_tracks_flags() {
        let mut state = SgrState::new();
        state.apply(&[1, 4]);
        assert!(state.flags.contains(StyleFlags::BOLD | StyleFlags::UNDERLINE));
        state.apply(&[22]);
        assert!(!state.flags.contains(StyleFlags::BOLD));
        assert!(state.flags.contains(StyleFlags::UNDERLINE));
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = SgrState::new();
        state.apply(&[1, 3, 31, 42]);
        assert!(state.is_active());
        state.apply(&[0]);
        assert_eq!(state, SgrState::new());
        assert!(!state.is_active());
    }

    #[test]
    fn reset_mid_list_is_atomic() {
        let mut state = SgrState::new();
        state.apply(&[1, 0, 4]);
        assert_eq!(state.flags, StyleFlags::UNDERLINE);
    }

    #[test]
    fn basic_colors_tracked() {
        let mut state = SgrState::new();
        state.apply(&[31, 104]);
        assert_eq!(state.fg, ColorState::Basic(31));
        assert_eq!(state.bg, ColorState::Basic(104));
        state.apply(&[39, 49]);
        assert!(!state.is_active());
    }

    #[test]
    fn extended_colors_are_custom() {
        let mut state = SgrState::new();
        state.apply(&[38, 5, 196, 1]);
        assert_eq!(state.fg, ColorState::Custom);
        // 196 must not be misread as an attribute; 1 after it is bold.
        assert_eq!(state.flags, StyleFlags::BOLD);

        state.apply(&[48, 2, 10, 20, 30]);
        assert_eq!(state.bg, ColorState::Custom);
    }

    #[test]
    fn active_codes_serialize_flags_only() {
        let mut state = SgrState::new();
        state.apply(&[4, 31, 1]);
        assert_eq!(state.active_codes(), "\x1b[1;4m");
    }

    #[test]
    fn color_only_state_has_no_codes_but_is_active() {
        let mut state = SgrState::new();
        state.apply(&[31]);
        assert_eq!(state.active_codes(), "");
        assert_eq!(state.close_sequence(), SGR_RESET);
    }

    #[test]
    fn get_active_codes_respects_position() {
        let text = "a\x1b[1mb\x1b[4mc\x1b[0md";
        assert_eq!(get_active_ansi_codes(text, 0), "");
        assert_eq!(get_active_ansi_codes(text, 1), "");
        assert_eq!(get_active_ansi_codes(text, 2), "\x1b[1m");
        let c = text.find('c').unwrap();
        assert_eq!(get_active_ansi_codes(text, c), "\x1b[1;4m");
        let d = text.find('d').unwrap();
        assert_eq!(get_active_ansi_codes(text, d), "");
    }

    #[test]
    fn red_color_is_not_reemitted() {
        // Pinned: colors are tracked but only boolean attributes are replayed.
        let text = "\x1b[31mred";
        assert_eq!(get_active_ansi_codes(text, text.len()), "");
        assert!(state_at(text, text.len()).fg.is_set());
    }

    #[test]
    fn strip_borrows_plain_text() {
        assert!(matches!(strip_ansi("hello"), Cow::Borrowed(_)));
    }

    #[test]
    fn strip_removes_sgr() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_ansi("\x1b[38;5;196mred\x1b[0m"), "red");
    }

    #[test]
    fn strip_keeps_malformed() {
        assert_eq!(strip_ansi("a\x1b[2Kb"), "a\x1b[2Kb");
    }
}
