#![forbid(unsafe_code)]

//! Errors raised at string-parsing call boundaries.
//!
//! Data edge cases (tiny widths, malformed escapes, out-of-range drawing)
//! degrade silently; only caller bugs such as an unknown mode name surface here.

/// Error from parsing options or configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// Unknown truncation position (expected `start`, `middle`, or `end`).
    InvalidTruncatePosition(String),
    /// Unknown wrap mode name.
    InvalidWrapMode(String),
    /// Unknown alignment (expected `left`, `center`, or `right`).
    InvalidAlign(String),
    /// A configuration value could not be parsed.
    InvalidConfig { key: String, value: String },
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTruncatePosition(value) => write!(
                f,
                "invalid truncate position {value:?}: expected \"start\", \"middle\", or \"end\""
            ),
            Self::InvalidWrapMode(value) => write!(
                f,
                "invalid wrap mode {value:?}: expected \"wrap\", \"none\", \"truncate-end\", \
                 \"truncate-middle\", or \"truncate-start\""
            ),
            Self::InvalidAlign(value) => write!(
                f,
                "invalid alignment {value:?}: expected \"left\", \"center\", or \"right\""
            ),
            Self::InvalidConfig { key, value } => {
                write!(f, "invalid value {value:?} for {key}")
            }
        }
    }
}

impl std::error::Error for TextError {}
