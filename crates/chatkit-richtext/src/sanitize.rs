//! Markup sanitization and dialect normalization.
//!
//! Walks inline markup already present in the text (paired tags,
//! self-closing tags, comments), strips what the capability set does not
//! allow while preserving inner text, remaps special tags to dialect
//! fallbacks (`code`/`pre` to a font wrap, `h1`-`h6` to size+bold), and
//! re-derives the attribute subset each supported tag may carry so no
//! foreign attribute passes through.
//!
//! The whole pass repeats until a fixed point. A second pass over already
//! sanitized output is a no-op; iteration is capped by input length so a
//! pathological input terminates with the remaining text left as-is.

use std::sync::LazyLock;

use regex::Regex;

use crate::color::normalize_color;
use crate::tags::{TagSet, normalize_tag};
use crate::util::{
    find_close_tag, font_markup, header_markup, strip_comments, textify_html_lists,
};

/// An opening tag: name plus everything up to `>`.
static OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z][A-Za-z0-9]*)([^>]*)>").expect("invalid open-tag regex"));

/// `<span style="color:X">` with a single color declaration.
static SPAN_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<span[^>]*style\s*=\s*"\s*color\s*:\s*([^";]+?)\s*;?\s*"[^>]*>(.*?)</span>"#)
        .expect("invalid color-span regex")
});

/// `<span style="background-color:X">` with a single declaration.
static SPAN_BACKCOLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<span[^>]*style\s*=\s*"\s*background-color\s*:\s*([^";]+?)\s*;?\s*"[^>]*>(.*?)</span>"#,
    )
    .expect("invalid backcolor-span regex")
});

/// `href` attribute, double- or single-quoted.
static HREF_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("invalid href regex")
});

/// `src` attribute, double- or single-quoted.
static SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)src\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("invalid src regex")
});

/// `alt` attribute, double- or single-quoted.
static ALT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)alt\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("invalid alt regex")
});

/// `face` attribute, double- or single-quoted.
static FACE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)face\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("invalid face regex")
});

/// Markup sanitizer for one capability set.
pub(crate) struct MarkupSanitizer<'a> {
    tags: &'a TagSet,
    code_font: &'a str,
}

impl<'a> MarkupSanitizer<'a> {
    pub(crate) fn new(tags: &'a TagSet, code_font: &'a str) -> Self {
        Self { tags, code_font }
    }

    /// Sanitize to a fixed point.
    pub(crate) fn sanitize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let mut current = text.to_owned();
        let cap = current.len().max(4);
        for iteration in 0..cap {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            if iteration + 1 == cap {
                tracing::debug!(iterations = cap, "sanitize iteration cap reached");
            }
            current = next;
        }
        current
    }

    /// One full sanitation pass.
    fn pass(&self, text: &str) -> String {
        let out = strip_comments(text);
        let out = self.convert_color_spans(&out);
        let ul_ok = self.tags.supports_all(&["ul", "li"]);
        let ol_ok = self.tags.supports_all(&["ol", "li"]);
        let out = textify_html_lists(&out, !ul_ok, !ol_ok);
        self.sanitize_tags(&out)
    }

    /// Convert color/backcolor spans to dialect tags before the generic
    /// tag pass runs; the generic pass then applies the capability check.
    fn convert_color_spans(&self, text: &str) -> String {
        let out = SPAN_BACKCOLOR.replace_all(text, |caps: &regex::Captures| {
            format!("<backcolor={}>{}</backcolor>", normalize_color(&caps[1]), &caps[2])
        });
        SPAN_COLOR
            .replace_all(&out, |caps: &regex::Captures| {
                format!("<color={}>{}</color>", normalize_color(&caps[1]), &caps[2])
            })
            .into_owned()
    }

    /// Walk paired and self-closing tags left to right, innermost-out.
    ///
    /// Unmatched opening tags and orphan closing tags are left verbatim:
    /// malformed input is tolerated, never an error.
    fn sanitize_tags(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;

        while let Some(caps) = OPEN_TAG.captures(&text[pos..]) {
            let m = caps.get(0).expect("match 0 always present");
            let (start, end) = (pos + m.start(), pos + m.end());
            out.push_str(&text[pos..start]);

            let raw_name = caps.get(1).expect("tag name group").as_str();
            let attrs = caps.get(2).map_or("", |g| g.as_str());

            if attrs.trim_end().ends_with('/') {
                out.push_str(&self.render_self_closing(raw_name, attrs, m.as_str()));
                pos = end;
                continue;
            }

            if let Some((close_start, close_end)) = find_close_tag(text, raw_name, end) {
                let inner = self.sanitize_tags(&text[end..close_start]);
                out.push_str(&self.render_tag(raw_name, attrs, &inner));
                pos = close_end;
            } else {
                out.push_str(m.as_str());
                pos = end;
            }
        }

        out.push_str(&text[pos..]);
        out
    }

    /// Re-emit one paired tag with sanitized inner content, applying the
    /// capability check, dialect remapping, and the attribute allow-list.
    fn render_tag(&self, raw_name: &str, attrs: &str, inner: &str) -> String {
        let name = normalize_tag(raw_name);
        match name.as_str() {
            "code" | "pre" => {
                if self.tags.supports(&name) {
                    format!("<{name}>{inner}</{name}>")
                } else {
                    font_markup(self.tags, self.code_font, inner)
                }
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name.as_bytes()[1] - b'0';
                header_markup(self.tags, level, inner)
            }
            "a" => {
                if !self.tags.supports("a") {
                    return inner.to_owned();
                }
                match extract_attr(attrs, &HREF_ATTR) {
                    Some(href) => format!(r#"<a href="{href}">{inner}</a>"#),
                    None => format!("<a>{inner}</a>"),
                }
            }
            "img" => {
                if !self.tags.supports("img") {
                    return inner.to_owned();
                }
                format!("{}{inner}", img_markup(attrs))
            }
            "font" => {
                if !self.tags.supports("font") {
                    return inner.to_owned();
                }
                match extract_face(attrs) {
                    Some(face) => format!("<font=\"{face}\">{inner}</font>"),
                    None => inner.to_owned(),
                }
            }
            "size" | "color" | "backcolor" => {
                if !self.tags.supports(&name) {
                    return inner.to_owned();
                }
                match extract_value(attrs) {
                    Some(value) => {
                        let value = if name == "size" {
                            value
                        } else {
                            normalize_color(&value)
                        };
                        format!("<{name}={value}>{inner}</{name}>")
                    }
                    None => inner.to_owned(),
                }
            }
            _ => {
                if self.tags.supports(&name) {
                    format!("<{name}>{inner}</{name}>")
                } else {
                    inner.to_owned()
                }
            }
        }
    }

    /// Self-closing tags: unsupported ones are stripped; supported ones
    /// are kept verbatim, except `img` which gets its attribute subset
    /// re-derived like the paired form.
    fn render_self_closing(&self, raw_name: &str, attrs: &str, original: &str) -> String {
        let name = normalize_tag(raw_name);
        if !self.tags.supports(&name) {
            return String::new();
        }
        if name == "img" {
            img_markup(attrs)
        } else {
            original.to_owned()
        }
    }
}

/// Canonical image tag carrying only `src` and `alt`.
fn img_markup(attrs: &str) -> String {
    let src = extract_attr(attrs, &SRC_ATTR).unwrap_or_default();
    let alt = extract_attr(attrs, &ALT_ATTR).unwrap_or_default();
    format!(r#"<img src="{src}" alt="{alt}" />"#)
}

/// Extract a quoted attribute value. Values are re-emitted verbatim —
/// converter output is already attribute-escaped, and re-escaping would
/// break idempotence.
fn extract_attr(attrs: &str, pattern: &Regex) -> Option<String> {
    pattern.captures(attrs).map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map_or_else(String::new, |g| g.as_str().to_owned())
    })
}

/// Font face: HTML `face="..."` attribute or the dialect `="name"` form.
fn extract_face(attrs: &str) -> Option<String> {
    if let Some(face) = extract_attr(attrs, &FACE_ATTR) {
        return Some(face);
    }
    let rest = attrs.trim().strip_prefix('=')?;
    let value = rest.trim().trim_matches('"').trim_matches('\'');
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// Single value token after `=`, quotes stripped.
fn extract_value(attrs: &str) -> Option<String> {
    let (_, rest) = attrs.split_once('=')?;
    let value = rest.trim().trim_matches('"').trim_matches('\'').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
