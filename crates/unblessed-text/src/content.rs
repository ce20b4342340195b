#![forbid(unsafe_code)]

//! Widget content layout: tag parsing, wrapping or truncation, and alignment.
//!
//! [`wrap_content`] turns raw widget content into a [`WrappedContent`], the
//! value stored in the wrap cache. Source lines (split on `\n`) are called
//! *fake* lines; the display lines they produce are *real* lines.
//!
//! # Example
//! ```
//! use unblessed_text::content::{ContentOptions, wrap_content};
//!
//! let wrapped = wrap_content("hello world\nfoo", &ContentOptions::new(5));
//! assert_eq!(wrapped.real, vec!["hello ", "world", "foo"]);
//! assert_eq!(wrapped.rtof, vec![0, 0, 1]);
//! assert_eq!(wrapped.ftor, vec![vec![0, 1], vec![2]]);
//! assert_eq!(wrapped.mwidth, 6);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::TextError;
use crate::tags::parse_tags;
use crate::truncate::{DEFAULT_ELLIPSIS, TruncateOptions, TruncatePosition, truncate_text};
use crate::width::measure_visual_width;
use crate::wrap::{DEFAULT_LOOK_BACK_DISTANCE, LineWrapper, WrapOptions};

/// Horizontal alignment of display lines within the content width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// Left padding for a line of `line_width` inside `width` columns.
    #[must_use]
    pub const fn left_padding(self, line_width: usize, width: usize) -> usize {
        if line_width >= width {
            return 0;
        }
        match self {
            Self::Left => 0,
            Self::Center => (width - line_width) / 2,
            Self::Right => width - line_width,
        }
    }
}

impl FromStr for Align {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(TextError::InvalidAlign(other.to_string())),
        }
    }
}

/// How lines wider than the content width are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Leave long lines as they are.
    None,
    /// Break long lines with [`LineWrapper`].
    #[default]
    Wrap,
    /// Shorten long lines with an ellipsis.
    Truncate(TruncatePosition),
}

impl WrapMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Wrap => "wrap",
            Self::Truncate(TruncatePosition::Start) => "truncate-start",
            Self::Truncate(TruncatePosition::Middle) => "truncate-middle",
            Self::Truncate(TruncatePosition::End) => "truncate-end",
        }
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WrapMode {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "wrap" => Ok(Self::Wrap),
            "truncate-start" => Ok(Self::Truncate(TruncatePosition::Start)),
            "truncate-middle" => Ok(Self::Truncate(TruncatePosition::Middle)),
            "truncate-end" => Ok(Self::Truncate(TruncatePosition::End)),
            other => Err(TextError::InvalidWrapMode(other.to_string())),
        }
    }
}

impl From<bool> for WrapMode {
    fn from(wrap: bool) -> Self {
        if wrap { Self::Wrap } else { Self::None }
    }
}

/// Options for [`wrap_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentOptions {
    /// Content width in columns. Zero means unconstrained.
    pub width: usize,
    pub wrap_mode: WrapMode,
    pub full_unicode: bool,
    pub align: Align,
    /// Convert `{bold}`-style tags before layout.
    pub parse_tags: bool,
    pub look_back_distance: usize,
    /// Ellipsis used by [`WrapMode::Truncate`].
    pub ellipsis: String,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ContentOptions {
    /// Options for the given width with wrapping on.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            wrap_mode: WrapMode::Wrap,
            full_unicode: false,
            align: Align::Left,
            parse_tags: false,
            look_back_distance: DEFAULT_LOOK_BACK_DISTANCE,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
        }
    }

    #[must_use]
    pub fn wrap_mode(mut self, wrap_mode: WrapMode) -> Self {
        self.wrap_mode = wrap_mode;
        self
    }

    #[must_use]
    pub fn full_unicode(mut self, full_unicode: bool) -> Self {
        self.full_unicode = full_unicode;
        self
    }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn parse_tags(mut self, parse_tags: bool) -> Self {
        self.parse_tags = parse_tags;
        self
    }

    #[must_use]
    pub fn look_back_distance(mut self, distance: usize) -> Self {
        self.look_back_distance = distance;
        self
    }

    #[must_use]
    pub fn ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    fn wrap_options(&self) -> WrapOptions {
        WrapOptions::new(self.width)
            .full_unicode(self.full_unicode)
            .look_back_distance(self.look_back_distance)
    }

    fn truncate_options(&self, position: TruncatePosition) -> TruncateOptions {
        TruncateOptions::default()
            .position(position)
            .ellipsis(self.ellipsis.as_str())
            .full_unicode(self.full_unicode)
    }
}

/// Laid-out content with the mapping between source and display lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WrappedContent {
    /// Display lines.
    pub real: Vec<String>,
    /// `rtof[i]`: source line that display line `i` came from.
    pub rtof: Vec<usize>,
    /// `ftor[j]`: display lines produced by source line `j`.
    pub ftor: Vec<Vec<usize>>,
    /// Source lines, after tag parsing.
    pub fake: Vec<String>,
    /// Widest display line, in columns.
    pub mwidth: usize,
}

impl WrappedContent {
    /// Number of display lines.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.real.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }
}

/// Lay out `content` according to `options`.
///
/// Always yields at least one display line per source line.
#[must_use]
pub fn wrap_content(content: &str, options: &ContentOptions) -> WrappedContent {
    let parsed: Cow<'_, str> = if options.parse_tags {
        parse_tags(content)
    } else {
        Cow::Borrowed(content)
    };

    let mut out = WrappedContent::default();
    for (index, source) in parsed.split('\n').enumerate() {
        let source = source.strip_suffix('\r').unwrap_or(source);
        let mut produced = Vec::new();
        for line in layout_line(source, options) {
            let line = pad_line(line, options);
            out.mwidth = out
                .mwidth
                .max(measure_visual_width(&line, options.full_unicode));
            produced.push(out.real.len());
            out.rtof.push(index);
            out.real.push(line);
        }
        out.ftor.push(produced);
        out.fake.push(source.to_string());
    }
    out
}

fn layout_line(line: &str, options: &ContentOptions) -> Vec<String> {
    if options.width == 0 {
        return vec![line.to_string()];
    }
    match options.wrap_mode {
        WrapMode::None => vec![line.to_string()],
        WrapMode::Wrap => LineWrapper::new(line, options.wrap_options()).collect(),
        WrapMode::Truncate(position) => vec![truncate_text(
            line,
            options.width,
            &options.truncate_options(position),
        )],
    }
}

fn pad_line(line: String, options: &ContentOptions) -> String {
    if options.width == 0 || options.align == Align::Left {
        return line;
    }
    let width = measure_visual_width(&line, options.full_unicode);
    let pad = options.align.left_padding(width, options.width);
    if pad == 0 {
        return line;
    }
    let mut padded = " ".repeat(pad);
    padded.push_str(&line);
    padded
}
