//! Formatter façade and message-content adapters.

use chatkit_content::{ContentError, MessageContent};

use crate::markdown::MarkdownConverter;
use crate::plain::reduce;
use crate::sanitize::MarkupSanitizer;
use crate::tags::TagSet;

/// Default font applied to fenced/inline code spans.
pub const DEFAULT_CODE_FONT: &str = "Consolas";

/// Formatting errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    /// Content kind outside the formatter's accepted set.
    #[error("unsupported message content")]
    UnsupportedContent(#[from] ContentError),
}

/// Rich-text formatter for one rendering context.
///
/// Owns an immutable [`TagSet`] and a configurable code font. Instances are
/// created once per rendering context and reused for every message; all
/// formatting calls are pure string-to-string functions, so a shared
/// reference is safe across threads. Changing the code font requires
/// `&mut self` and therefore cannot race an in-flight call.
///
/// # Example
///
/// ```
/// use chatkit_richtext::RichTextFormatter;
///
/// let formatter = RichTextFormatter::new(["b", "i", "a"]);
/// assert_eq!(formatter.format("Hello, **world**!"), "Hello, <b>world</b>!");
/// ```
#[derive(Debug, Clone)]
pub struct RichTextFormatter {
    tags: TagSet,
    code_font: String,
}

impl RichTextFormatter {
    /// Create a formatter supporting the given output tags.
    ///
    /// Names are normalized (lower-cased, alias-resolved); an empty
    /// sequence is legal and strips everything.
    pub fn new<I, S>(supported_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_tag_set(TagSet::new(supported_tags))
    }

    /// Create a formatter from an existing tag set.
    #[must_use]
    pub fn from_tag_set(tags: TagSet) -> Self {
        Self {
            tags,
            code_font: DEFAULT_CODE_FONT.to_owned(),
        }
    }

    /// Create a formatter for a configured rendering context.
    ///
    /// The context's code font wins over the global one. A context marked
    /// `plain_text` has no tag capabilities to honor; route it through
    /// [`PlainTextFormatter`] instead.
    #[must_use]
    pub fn from_context(
        formatting: &chatkit_config::FormattingConfig,
        context: &chatkit_config::ContextConfig,
    ) -> Self {
        let code_font = context
            .code_font
            .clone()
            .unwrap_or_else(|| formatting.code_font.clone());
        Self {
            tags: TagSet::new(&context.supported_tags),
            code_font,
        }
    }

    /// Builder-style code font override.
    #[must_use]
    pub fn with_code_font(mut self, font: impl Into<String>) -> Self {
        self.code_font = font.into();
        self
    }

    /// Change the code font. A blank value suppresses font wrapping of
    /// code even when `font` is in the supported set.
    pub fn set_code_font(&mut self, font: impl Into<String>) {
        self.code_font = font.into();
    }

    /// The configured code font.
    #[must_use]
    pub fn code_font(&self) -> &str {
        &self.code_font
    }

    /// The supported-tag set.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Format raw message text: Markdown conversion, then markup
    /// sanitation, then trim.
    #[must_use]
    pub fn format(&self, text: &str) -> String {
        let converted = self.convert(text);
        let sanitized = self.sanitize(&converted);
        sanitized.trim().to_owned()
    }

    /// Markdown-to-dialect conversion only (spec: `Convert`).
    #[must_use]
    pub fn convert(&self, text: &str) -> String {
        MarkdownConverter::new(&self.tags, &self.code_font).convert(text)
    }

    /// Markup sanitation only (spec: `Sanitize`), for input that already
    /// contains markup rather than Markdown.
    #[must_use]
    pub fn sanitize(&self, text: &str) -> String {
        MarkupSanitizer::new(&self.tags, &self.code_font).sanitize(text)
    }

    /// Format a tagged content value.
    ///
    /// Text, function-call, and function-result content render through
    /// their canonical text form; any other kind fails fast with
    /// [`FormatError::UnsupportedContent`].
    pub fn format_content(&self, content: &MessageContent) -> Result<String, FormatError> {
        tracing::trace!(kind = content.kind(), "formatting message content");
        let text = content.render_text()?;
        Ok(self.format(&text))
    }
}

/// Plain-text formatter: the non-configurable sibling pipeline.
///
/// Always strips Markdown and markup to unstyled text, regardless of any
/// capability set.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormatter;

impl PlainTextFormatter {
    /// Create a plain-text formatter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reduce text to its plain form (spec: `Reduce`). Output is trimmed.
    #[must_use]
    pub fn reduce(&self, text: &str) -> String {
        reduce(text)
    }

    /// Reduce a tagged content value, failing fast on kinds outside the
    /// accepted set.
    pub fn reduce_content(&self, content: &MessageContent) -> Result<String, FormatError> {
        tracing::trace!(kind = content.kind(), "reducing message content");
        let text = content.render_text()?;
        Ok(self.reduce(&text))
    }
}
