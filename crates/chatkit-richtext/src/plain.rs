//! Plain-text reduction of Markdown and markup.
//!
//! The non-configurable sibling of the rich pipeline: strips every Markdown
//! construct and every tag down to unstyled text, for contexts that cannot
//! render markup at all. Runs over the same input as the rich pipeline, not
//! downstream of it.

use crate::markdown::{BOLD, BOLD_ITALIC, FENCED_CODE, HEADER, IMAGE, INLINE_CODE, ITALIC, LINK, STRIKE};
use crate::util::{strip_tags, textify_html_lists};

/// Reduce Markdown and markup to plain text. Output is trimmed.
pub(crate) fn reduce(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    tracing::trace!(len = text.len(), "reducing to plain text");

    let out = FENCED_CODE.replace_all(text, |caps: &regex::Captures| {
        let raw = &caps[1];
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        format!("\n{content}\n")
    });
    let out = INLINE_CODE.replace_all(&out, "$1");
    let out = IMAGE.replace_all(&out, "$1");
    let out = LINK.replace_all(&out, "$1");
    let out = HEADER.replace_all(&out, "$2");
    let out = BOLD_ITALIC.replace_all(&out, "$1");
    let out = BOLD.replace_all(&out, "$1");
    let out = ITALIC.replace_all(&out, "$1");
    let out = STRIKE.replace_all(&out, "$1");

    // Lists become prefixed lines before generic stripping removes the
    // tags that delimit them.
    let out = textify_html_lists(&out, true, true);
    strip_tags(&out).trim().to_owned()
}
