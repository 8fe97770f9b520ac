//! Markdown to markup-dialect conversion.
//!
//! A sequence of regex rewrite passes over raw message text. Pass order is
//! significant: each pass assumes earlier passes have consumed their syntax
//! (fenced code before inline code, images before links, emphasis last).
//! Every pass consults the [`TagSet`] to decide between converting a
//! construct and degrading it to plain text.
//!
//! Unterminated constructs are not errors: a pattern that does not match
//! leaves the text unmodified for that construct.

use std::sync::LazyLock;

use regex::Regex;

use crate::escape::escape_html;
use crate::tags::TagSet;
use crate::util::{font_markup, header_markup};

/// Fenced code blocks with an optional language tag.
pub(crate) static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+\-]*[ \t]*\r?\n(.*?)```").expect("invalid fenced-code regex")
});

/// Inline code spans.
pub(crate) static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("invalid inline-code regex"));

/// Images: `![alt](src)`. Alt text may be empty.
pub(crate) static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").expect("invalid image regex"));

/// Links: `[text](url)`. Text must be non-empty, so `[]()` never matches.
pub(crate) static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]*)\)").expect("invalid link regex"));

/// ATX headers, levels 1-6.
pub(crate) static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]+(.+?)[ \t]*$").expect("invalid header regex"));

/// Blockquote lines.
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^>[ \t]?(.*)$").expect("invalid blockquote regex"));

/// An unordered list item line.
static UL_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-[ \t]+(.+)$").expect("invalid ul-item regex"));

/// An ordered list item line.
static OL_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.[ \t]+(.+)$").expect("invalid ol-item regex"));

/// Triple-marker bold italic.
pub(crate) static BOLD_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*([^\n]+?)\*\*\*").expect("invalid bold-italic regex"));

/// Double-marker bold.
pub(crate) static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^\n]+?)\*\*").expect("invalid bold regex"));

/// Single-marker italic. Content excludes `*` so an unmatched `**` run can
/// never be half-consumed.
pub(crate) static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+?)\*").expect("invalid italic regex"));

/// Strikethrough.
pub(crate) static STRIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~([^\n]+?)~~").expect("invalid strikethrough regex"));

/// Markdown-to-dialect converter for one capability set.
pub(crate) struct MarkdownConverter<'a> {
    tags: &'a TagSet,
    code_font: &'a str,
}

impl<'a> MarkdownConverter<'a> {
    pub(crate) fn new(tags: &'a TagSet, code_font: &'a str) -> Self {
        Self { tags, code_font }
    }

    /// Run all passes in order.
    pub(crate) fn convert(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        tracing::trace!(len = text.len(), "converting markdown");

        let out = self.convert_fenced_code(text);
        let out = self.convert_inline_code(&out);
        let out = self.convert_images(&out);
        let out = self.convert_links(&out);
        let out = self.convert_headers(&out);
        let out = self.convert_blockquotes(&out);
        let out = self.convert_lists(&out);
        self.convert_emphasis(&out)
    }

    /// Span-level conversion for text nested inside another construct
    /// (link text, header text, list items, blockquote lines).
    fn convert_spans(&self, text: &str) -> String {
        self.convert_emphasis(text)
    }

    /// Pass 1: fenced code blocks. Content is entity-escaped, the trailing
    /// newline stripped, and the result padded with blank lines whether or
    /// not a font wrap is available.
    fn convert_fenced_code(&self, text: &str) -> String {
        FENCED_CODE
            .replace_all(text, |caps: &regex::Captures| {
                let raw = &caps[1];
                let content = raw.strip_suffix('\n').unwrap_or(raw);
                let escaped = escape_html(content);
                format!("\n{}\n", font_markup(self.tags, self.code_font, &escaped))
            })
            .into_owned()
    }

    /// Pass 2: inline code. Same escape and font policy, no padding.
    fn convert_inline_code(&self, text: &str) -> String {
        INLINE_CODE
            .replace_all(text, |caps: &regex::Captures| {
                font_markup(self.tags, self.code_font, &escape_html(&caps[1]))
            })
            .into_owned()
    }

    /// Pass 3: images. Unsupported images degrade to their alt text, so an
    /// image with empty alt vanishes entirely.
    fn convert_images(&self, text: &str) -> String {
        IMAGE
            .replace_all(text, |caps: &regex::Captures| {
                if self.tags.supports("img") {
                    format!(
                        r#"<img src="{}" alt="{}" />"#,
                        escape_html(&caps[2]),
                        escape_html(&caps[1])
                    )
                } else {
                    caps[1].to_owned()
                }
            })
            .into_owned()
    }

    /// Pass 4: links. Link text is recursively processed so nested
    /// emphasis still converts; unsupported anchors degrade to the
    /// processed text alone.
    fn convert_links(&self, text: &str) -> String {
        LINK.replace_all(text, |caps: &regex::Captures| {
            let inner = self.convert_spans(&caps[1]);
            if self.tags.supports("a") {
                format!(r#"<a href="{}">{inner}</a>"#, escape_html(&caps[2]))
            } else {
                inner
            }
        })
        .into_owned()
    }

    /// Pass 5: headers. Level comes from the literal `#` run length.
    fn convert_headers(&self, text: &str) -> String {
        HEADER
            .replace_all(text, |caps: &regex::Captures| {
                let level = u8::try_from(caps[1].len()).unwrap_or(6);
                let inner = self.convert_spans(&caps[2]);
                header_markup(self.tags, level, &inner)
            })
            .into_owned()
    }

    /// Pass 6: blockquote lines. When the tag is unsupported the `>`
    /// syntax is left untouched.
    fn convert_blockquotes(&self, text: &str) -> String {
        if !self.tags.supports("blockquote") {
            return text.to_owned();
        }
        BLOCKQUOTE
            .replace_all(text, |caps: &regex::Captures| {
                format!("<blockquote>{}</blockquote>", self.convert_spans(&caps[1]))
            })
            .into_owned()
    }

    /// Pass 7: list runs. A contiguous run of matching lines becomes one
    /// list; an open run is flushed at the first non-matching line or at
    /// end of text. Conversion requires both the list tag and `li`.
    fn convert_lists(&self, text: &str) -> String {
        let ul_ok = self.tags.supports_all(&["ul", "li"]);
        let ol_ok = self.tags.supports_all(&["ol", "li"]);
        if !ul_ok && !ol_ok {
            return text.to_owned();
        }

        let mut lines_out: Vec<String> = Vec::new();
        let mut run_ordered: Option<bool> = None;
        let mut items: Vec<String> = Vec::new();

        for line in text.split('\n') {
            let item = if ul_ok {
                UL_ITEM.captures(line).map(|caps| (false, caps[1].to_owned()))
            } else {
                None
            }
            .or_else(|| {
                if ol_ok {
                    OL_ITEM.captures(line).map(|caps| (true, caps[1].to_owned()))
                } else {
                    None
                }
            });

            match item {
                Some((ordered, item_text)) => {
                    if run_ordered != Some(ordered) {
                        flush_list_run(&mut run_ordered, &mut items, &mut lines_out);
                        run_ordered = Some(ordered);
                    }
                    items.push(self.convert_spans(&item_text));
                }
                None => {
                    flush_list_run(&mut run_ordered, &mut items, &mut lines_out);
                    lines_out.push(line.to_owned());
                }
            }
        }
        flush_list_run(&mut run_ordered, &mut items, &mut lines_out);

        lines_out.join("\n")
    }

    /// Pass 8: inline emphasis, in strict precedence order: `***`, `**`,
    /// `*`, then `~~`.
    fn convert_emphasis(&self, text: &str) -> String {
        let bold = self.tags.supports("b");
        let italic = self.tags.supports("i");

        let out = BOLD_ITALIC
            .replace_all(text, |caps: &regex::Captures| {
                let inner = &caps[1];
                match (bold, italic) {
                    (true, true) => format!("<b><i>{inner}</i></b>"),
                    (true, false) => format!("<b>{inner}</b>"),
                    (false, true) => format!("<i>{inner}</i>"),
                    (false, false) => inner.to_owned(),
                }
            })
            .into_owned();

        let out = BOLD
            .replace_all(&out, |caps: &regex::Captures| {
                if bold {
                    format!("<b>{}</b>", &caps[1])
                } else {
                    // Bold is unavailable, but nested italic inside the
                    // markers must still resolve.
                    self.convert_italic(&caps[1])
                }
            })
            .into_owned();

        let out = self.convert_italic(&out);

        STRIKE
            .replace_all(&out, |caps: &regex::Captures| {
                if self.tags.supports("s") {
                    format!("<s>{}</s>", &caps[1])
                } else {
                    caps[1].to_owned()
                }
            })
            .into_owned()
    }

    fn convert_italic(&self, text: &str) -> String {
        let italic = self.tags.supports("i");
        ITALIC
            .replace_all(text, |caps: &regex::Captures| {
                if italic {
                    format!("<i>{}</i>", &caps[1])
                } else {
                    caps[1].to_owned()
                }
            })
            .into_owned()
    }
}

/// Emit a pending list run as one `<ul>`/`<ol>` line.
fn flush_list_run(
    run_ordered: &mut Option<bool>,
    items: &mut Vec<String>,
    lines_out: &mut Vec<String>,
) {
    if let Some(ordered) = run_ordered.take() {
        let tag = if ordered { "ol" } else { "ul" };
        let body: String = items
            .drain(..)
            .map(|item| format!("<li>{item}</li>"))
            .collect();
        lines_out.push(format!("<{tag}>{body}</{tag}>"));
    }
}
