#![forbid(unsafe_code)]

//! ANSI-aware text layout for unblessed.
//!
//! This crate provides the text primitives behind widget content:
//! - [`AnsiScanner`] - lazy split of a string into text and SGR escape runs
//! - [`measure_visual_width`] - terminal column count ignoring escapes
//! - [`truncate_text`] - ellipsis truncation that keeps styles balanced
//! - [`LineWrapper`] - greedy word wrapping with a bounded look-back
//! - [`wrap_content`] - tag parsing, wrapping, and alignment of whole content
//! - [`WrapCache`] - LRU cache of wrapped content
//!
//! # Example
//! ```
//! use unblessed_text::{TruncateOptions, WrapCache, WrapCacheKey, truncate_text};
//!
//! assert_eq!(truncate_text("Hello World", 7, &TruncateOptions::default()), "Hello …");
//!
//! let mut cache = WrapCache::new(16);
//! let wrapped = cache.get_or_wrap(WrapCacheKey::new("hello world", 5));
//! assert_eq!(wrapped.real, vec!["hello ", "world"]);
//! ```

pub mod ansi;
pub mod config;
pub mod content;
pub mod error;
pub mod tags;
pub mod truncate;
pub mod width;
pub mod wrap;
pub mod wrap_cache;

pub use ansi::{
    AnsiRun, AnsiScanner, ColorState, SGR_RESET, SgrState, StyleFlags, get_active_ansi_codes,
    strip_ansi,
};
pub use config::{DEFAULT_WRAP_CACHE_CAPACITY, WrapCacheConfig};
pub use content::{Align, ContentOptions, WrapMode, WrappedContent, wrap_content};
pub use error::TextError;
pub use tags::parse_tags;
pub use truncate::{TruncateOptions, TruncatePosition, clip_to_width, truncate_text};
pub use width::{char_width, measure_visual_width, needs_wrapping};
pub use wrap::{LineWrapper, WrapOptions, wrap_text_lines};
pub use wrap_cache::{
    WrapCache, WrapCacheKey, WrapCacheStats, global_wrap_cache_initialized,
    replace_global_wrap_cache, reset_global_wrap_cache, with_global_wrap_cache,
};
