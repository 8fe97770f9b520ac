//! CSS color expression normalization for the markup dialect.
//!
//! The dialect's `color`/`backcolor` tags take either a named/hex value or
//! a comma-joined channel token (`255,0,0` or `255,0,0,128`). CSS-style
//! `rgb()`/`rgba()` expressions are rewritten to the token form.

use std::sync::LazyLock;

use regex::Regex;

/// Regex for `rgb(...)` / `rgba(...)` expressions.
static RGB_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^rgba?\(\s*([^)]*?)\s*\)$").expect("invalid rgb regex"));

/// Normalize a CSS color value to the dialect's token form.
///
/// `rgb(r, g, b)` becomes `r,g,b` and `rgba(r, g, b, a)` becomes
/// `r,g,b,a`. The alpha channel accepts a 0-1 fraction or a 0-255 integer
/// and is emitted as a 0-255 integer. Channels are rounded and clamped to
/// 0-255. Any other value (named colors, `#rrggbb`, malformed expressions)
/// passes through trimmed.
#[must_use]
pub fn normalize_color(value: &str) -> String {
    let trimmed = value.trim();
    let Some(caps) = RGB_PATTERN.captures(trimmed) else {
        return trimmed.to_owned();
    };

    let parts: Vec<&str> = caps[1].split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return trimmed.to_owned();
    }

    let mut channels: Vec<u32> = Vec::with_capacity(4);
    for part in &parts[..3] {
        let Ok(channel) = part.parse::<f64>() else {
            return trimmed.to_owned();
        };
        channels.push(clamp_channel(channel));
    }

    if let Some(alpha_raw) = parts.get(3) {
        let Ok(alpha) = alpha_raw.parse::<f64>() else {
            return trimmed.to_owned();
        };
        // Alpha of 1.0 or less is a CSS fraction; anything above is
        // already a 0-255 integer.
        let alpha = if alpha <= 1.0 { alpha * 255.0 } else { alpha };
        channels.push(clamp_channel(alpha));
    }

    channels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Round and clamp a channel value to 0-255.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_channel(value: f64) -> u32 {
    value.round().clamp(0.0, 255.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_tokens() {
        assert_eq!(normalize_color("rgb(255, 0, 0)"), "255,0,0");
        assert_eq!(normalize_color("rgb(12,34,56)"), "12,34,56");
    }

    #[test]
    fn test_rgba_fraction_alpha() {
        assert_eq!(normalize_color("rgba(255, 0, 0, 0.5)"), "255,0,0,128");
        assert_eq!(normalize_color("rgba(0, 0, 0, 1)"), "0,0,0,255");
    }

    #[test]
    fn test_rgba_integer_alpha() {
        assert_eq!(normalize_color("rgba(10, 20, 30, 200)"), "10,20,30,200");
    }

    #[test]
    fn test_channels_rounded_and_clamped() {
        assert_eq!(normalize_color("rgb(127.6, -5, 300)"), "128,0,255");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(normalize_color("RGB(1, 2, 3)"), "1,2,3");
    }

    #[test]
    fn test_named_color_passes_through() {
        assert_eq!(normalize_color("red"), "red");
        assert_eq!(normalize_color("  red  "), "red");
    }

    #[test]
    fn test_hex_color_passes_through() {
        assert_eq!(normalize_color("#ff0000"), "#ff0000");
    }

    #[test]
    fn test_malformed_rgb_passes_through() {
        assert_eq!(normalize_color("rgb(1, 2)"), "rgb(1, 2)");
        assert_eq!(normalize_color("rgb(a, b, c)"), "rgb(a, b, c)");
        assert_eq!(normalize_color("rgba(1, 2, 3, x)"), "rgba(1, 2, 3, x)");
    }
}
