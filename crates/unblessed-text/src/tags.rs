#![forbid(unsafe_code)]

//! Curly-brace tag markup.
//!
//! Widget content may carry tags such as `{bold}` or `{red-fg}` that are
//! converted to SGR sequences before measurement. Unknown tags are left in
//! place as literal text, so conversion never fails.
//!
//! # Syntax
//! - `{bold}`, `{dim}`, `{italic}`, `{underline}`, `{blink}`, `{inverse}`,
//!   `{invisible}`, `{strikethrough}` and their `{/name}` closing forms
//! - `{red-fg}`, `{light-blue-bg}`, `{grey-fg}` … and `{/red-fg}` etc.
//! - `{/}` resets everything
//! - `{open}` and `{close}` produce literal braces
//!
//! # Example
//! ```
//! use unblessed_text::tags::parse_tags;
//!
//! assert_eq!(parse_tags("{bold}hi{/bold}"), "\x1b[1mhi\x1b[22m");
//! assert_eq!(parse_tags("{open}x{close}"), "{x}");
//! assert_eq!(parse_tags("{nope}"), "{nope}");
//! ```

use std::borrow::Cow;
use std::fmt::Write as _;

use memchr::memchr;

/// The eight basic color names, in SGR order.
const COLOR_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// Attribute name → (enable, disable) codes.
fn attribute_codes(name: &str) -> Option<(u16, u16)> {
    Some(match name {
        "bold" => (1, 22),
        "dim" => (2, 22),
        "italic" => (3, 23),
        "underline" | "underlined" => (4, 24),
        "blink" => (5, 25),
        "inverse" | "reverse" => (7, 27),
        "invisible" | "hidden" => (8, 28),
        "strikethrough" => (9, 29),
        _ => return None,
    })
}

/// Color name (without `-fg`/`-bg`) → offset from the foreground base code.
///
/// Basic colors map to 0..=7, light/bright variants to 60..=67 (90..=97 as
/// foreground).
fn color_offset(name: &str) -> Option<u16> {
    if matches!(name, "grey" | "gray") {
        return Some(60);
    }
    let (bright, base) = match name
        .strip_prefix("light-")
        .or_else(|| name.strip_prefix("bright-"))
    {
        Some(rest) => (true, rest),
        None => (false, name),
    };
    let index = COLOR_NAMES.iter().position(|&c| c == base)?;
    Some(index as u16 + if bright { 60 } else { 0 })
}

/// SGR code for one tag body (the text between the braces).
fn tag_code(body: &str) -> Option<u16> {
    let (closing, name) = match body.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    if let Some((on, off)) = attribute_codes(name) {
        return Some(if closing { off } else { on });
    }
    if let Some(color) = name.strip_suffix("-fg") {
        let offset = color_offset(color)?;
        return Some(if closing { 39 } else { 30 + offset });
    }
    if let Some(color) = name.strip_suffix("-bg") {
        let offset = color_offset(color)?;
        return Some(if closing { 49 } else { 40 + offset });
    }
    None
}

/// Replacement text for a whole tag body, if it is a known tag.
fn expand(body: &str, out: &mut String) -> bool {
    match body {
        "open" => out.push('{'),
        "close" => out.push('}'),
        "/" => out.push_str("\x1b[0m"),
        _ => match tag_code(body) {
            Some(code) => {
                let _ = write!(out, "\x1b[{code}m");
            }
            None => return false,
        },
    }
    true
}

/// Convert tag markup in `text` to SGR sequences.
///
/// Borrows when `text` has no `{`.
#[must_use]
pub fn parse_tags(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let Some(first) = memchr(b'{', bytes) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    let mut pos = first;
    while pos < text.len() {
        let Some(open) = memchr(b'{', &bytes[pos..]).map(|i| pos + i) else {
            out.push_str(&text[pos..]);
            break;
        };
        out.push_str(&text[pos..open]);
        // Tag bodies never contain another '{'; a nested brace restarts the scan.
        let close = bytes[open + 1..]
            .iter()
            .position(|&b| b == b'}' || b == b'{')
            .map(|i| open + 1 + i)
            .filter(|&i| bytes[i] == b'}');
        match close {
            Some(close) if expand(&text[open + 1..close], &mut out) => pos = close + 1,
            _ => {
                out.push('{');
                pos = open + 1;
            }
        }
    }
    Cow::Owned(out)
}
