#![forbid(unsafe_code)]

//! ANSI-aware truncation with an ellipsis.
//!
//! Cuts always land on glyph boundaries. When a style is active at a cut, the
//! kept head is closed with a reset, and the kept tail is reopened with the
//! boolean attributes that were active where it starts.
//!
//! # Example
//! ```
//! use unblessed_text::truncate::{TruncateOptions, TruncatePosition, truncate_text};
//!
//! let end = truncate_text("Hello World", 7, &TruncateOptions::default());
//! assert_eq!(end, "Hello …");
//!
//! let middle = truncate_text(
//!     "Hello World",
//!     7,
//!     &TruncateOptions::default().position(TruncatePosition::Middle),
//! );
//! assert_eq!(middle, "Hel…rld");
//! ```

use std::str::FromStr;

use crate::ansi::{get_active_ansi_codes, state_at};
use crate::error::TextError;
use crate::width::{measure_visual_width, prefix_end, suffix_start, units};

/// Default ellipsis (U+2026).
pub const DEFAULT_ELLIPSIS: &str = "…";

/// Which part of the text gives way to the ellipsis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TruncatePosition {
    /// Keep the end: `…orld`.
    Start,
    /// Keep both ends: `Hel…rld`.
    Middle,
    /// Keep the beginning: `Hello …`.
    #[default]
    End,
}

impl TruncatePosition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl FromStr for TruncatePosition {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "middle" => Ok(Self::Middle),
            "end" => Ok(Self::End),
            other => Err(TextError::InvalidTruncatePosition(other.to_string())),
        }
    }
}

/// Options for [`truncate_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncateOptions {
    /// Where to cut.
    pub position: TruncatePosition,
    /// Marker inserted at the cut.
    pub ellipsis: String,
    /// Measure with full Unicode widths.
    pub full_unicode: bool,
}

impl Default for TruncateOptions {
    fn default() -> Self {
        Self {
            position: TruncatePosition::End,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            full_unicode: false,
        }
    }
}

impl TruncateOptions {
    /// Set the cut position.
    #[must_use]
    pub fn position(mut self, position: TruncatePosition) -> Self {
        self.position = position;
        self
    }

    /// Set the ellipsis.
    #[must_use]
    pub fn ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    /// Set the width model.
    #[must_use]
    pub fn full_unicode(mut self, full_unicode: bool) -> Self {
        self.full_unicode = full_unicode;
        self
    }
}

/// Truncate `text` to at most `width` visual columns.
///
/// Text that already fits is returned unchanged. When the ellipsis alone does
/// not leave room for any content, the ellipsis itself is clipped to `width`.
#[must_use]
pub fn truncate_text(text: &str, width: usize, options: &TruncateOptions) -> String {
    let full_unicode = options.full_unicode;
    if measure_visual_width(text, full_unicode) <= width {
        return text.to_string();
    }

    let ellipsis = options.ellipsis.as_str();
    let ellipsis_width = measure_visual_width(ellipsis, full_unicode);
    if ellipsis_width >= width {
        return clip_to_width(ellipsis, width, full_unicode);
    }
    let available = width - ellipsis_width;

    let units = units(text, full_unicode);
    let mut out = String::with_capacity(text.len() + ellipsis.len() + 8);
    match options.position {
        TruncatePosition::End => {
            let end = prefix_end(&units, available);
            push_head(&mut out, text, end);
            out.push_str(ellipsis);
        }
        TruncatePosition::Start => {
            let start = suffix_start(&units, available, text.len());
            out.push_str(ellipsis);
            push_tail(&mut out, text, start);
        }
        TruncatePosition::Middle => {
            let head_width = available.div_ceil(2);
            let tail_width = available / 2;
            let end = prefix_end(&units, head_width);
            let start = suffix_start(&units, tail_width, text.len()).max(end);
            push_head(&mut out, text, end);
            out.push_str(ellipsis);
            push_tail(&mut out, text, start);
        }
    }
    out
}

/// Keep the widest prefix of `text` fitting `width` columns, closing any open style.
#[must_use]
pub fn clip_to_width(text: &str, width: usize, full_unicode: bool) -> String {
    let units = units(text, full_unicode);
    let end = prefix_end(&units, width);
    let mut out = String::with_capacity(end + 4);
    push_head(&mut out, text, end);
    out
}

fn push_head(out: &mut String, text: &str, end: usize) {
    out.push_str(&text[..end]);
    out.push_str(state_at(text, end).close_sequence());
}

fn push_tail(out: &mut String, text: &str, start: usize) {
    out.push_str(&get_active_ansi_codes(text, start));
    out.push_str(&text[start..]);
}
