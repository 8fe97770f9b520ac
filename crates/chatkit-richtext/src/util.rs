//! Shared helpers for dialect tag emission and markup stripping.

use std::sync::LazyLock;

use regex::Regex;

use crate::tags::TagSet;

/// Any tag: opening, closing, or self-closing.
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("invalid tag regex"));

/// HTML comments, including multi-line ones.
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("invalid comment regex"));

/// `<ul>`/`<ol>` opening tags.
static LIST_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(ul|ol)[^>]*>").expect("invalid list-open regex"));

/// `<li>` items inside a list block.
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").expect("invalid list-item regex"));

/// Remove every tag and comment, keeping text content.
pub(crate) fn strip_tags(text: &str) -> String {
    let without_comments = COMMENT.replace_all(text, "");
    ANY_TAG.replace_all(&without_comments, "").into_owned()
}

/// Remove HTML comments only.
pub(crate) fn strip_comments(text: &str) -> String {
    COMMENT.replace_all(text, "").into_owned()
}

/// Wrap already-processed header text for the given level (1-6).
///
/// The literal `h{level}` tag wins when supported; otherwise the text is
/// wrapped in `<b>` and/or `<size=+N>` (`N = 6 - level`) as available.
/// Level 6 never receives a size wrapper.
pub(crate) fn header_markup(tags: &TagSet, level: u8, inner: &str) -> String {
    let literal = format!("h{level}");
    if tags.supports(&literal) {
        return format!("<{literal}>{inner}</{literal}>");
    }
    let mut wrapped = if tags.supports("b") {
        format!("<b>{inner}</b>")
    } else {
        inner.to_owned()
    };
    if level < 6 && tags.supports("size") {
        wrapped = format!("<size=+{}>{wrapped}</size>", 6 - level);
    }
    wrapped
}

/// Wrap escaped code content in the configured code font, when the `font`
/// tag is supported and a non-blank font name is configured.
pub(crate) fn font_markup(tags: &TagSet, font: &str, escaped: &str) -> String {
    if tags.supports("font") && !font.trim().is_empty() {
        format!("<font=\"{font}\">{escaped}</font>")
    } else {
        escaped.to_owned()
    }
}

/// Find the next `</tag>` closing tag (ASCII case-insensitive, optional
/// whitespace before `>`) at or after byte offset `from`.
///
/// Returns the byte range of the closing tag. This stands in for a
/// backreference-based pair match: the first matching close wins, exactly
/// like a non-greedy `<tag>(.*?)</tag>` would pair.
pub(crate) fn find_close_tag(text: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut search = from;
    while let Some(rel) = text[search..].find("</") {
        let start = search + rel;
        let mut j = start + 2;
        while j < bytes.len() && bytes[j].is_ascii_alphanumeric() {
            j += 1;
        }
        let name = &text[start + 2..j];
        let mut k = j;
        while k < bytes.len() && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k < bytes.len() && bytes[k] == b'>' && name.eq_ignore_ascii_case(tag) {
            return Some((start, k + 1));
        }
        search = start + 2;
    }
    None
}

/// Convert HTML list blocks to `- `/`N. ` prefixed lines, innermost first.
///
/// `textify_ul`/`textify_ol` select which list kinds are flattened. Inner
/// tags are stripped from item text. The rewrite repeats until no eligible
/// block remains, capped by input length so pathological nesting terminates
/// with the remaining text left as-is.
pub(crate) fn textify_html_lists(text: &str, textify_ul: bool, textify_ol: bool) -> String {
    if !textify_ul && !textify_ol {
        return text.to_owned();
    }
    let mut current = text.to_owned();
    let cap = current.len().max(4);
    for _ in 0..cap {
        match textify_innermost_list(&current, textify_ul, textify_ol) {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}

/// Rewrite the innermost eligible list block, if any.
///
/// The last opening tag with a close after it can contain no further list
/// opening, so it is innermost by construction.
fn textify_innermost_list(text: &str, textify_ul: bool, textify_ol: bool) -> Option<String> {
    let openings: Vec<(usize, usize, String)> = LIST_OPEN
        .captures_iter(text)
        .map(|caps| {
            let m = caps.get(0).expect("match 0 always present");
            (m.start(), m.end(), caps[1].to_ascii_lowercase())
        })
        .collect();

    for (start, open_end, kind) in openings.into_iter().rev() {
        let ordered = kind == "ol";
        if (ordered && !textify_ol) || (!ordered && !textify_ul) {
            continue;
        }
        let Some((close_start, close_end)) = find_close_tag(text, &kind, open_end) else {
            continue;
        };

        let content = &text[open_end..close_start];
        let mut lines = Vec::new();
        for (idx, item) in LIST_ITEM.captures_iter(content).enumerate() {
            let item_text = strip_tags(&item[1]).trim().to_owned();
            if ordered {
                lines.push(format!("{}. {item_text}", idx + 1));
            } else {
                lines.push(format!("- {item_text}"));
            }
        }

        let before = &text[..start];
        let after = &text[close_end..];
        let mut next = String::with_capacity(text.len());
        next.push_str(before);
        // Lists are block-level: keep line separation from surrounding text.
        if !before.is_empty() && !before.ends_with('\n') {
            next.push('\n');
        }
        next.push_str(&lines.join("\n"));
        if !after.is_empty() && !after.starts_with('\n') {
            next.push('\n');
        }
        next.push_str(after);
        return Some(next);
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_strip_tags_keeps_content() {
        assert_eq!(strip_tags("<b>bold</b> and <i>italic</i>"), "bold and italic");
    }

    #[test]
    fn test_strip_tags_handles_dialect_forms() {
        assert_eq!(strip_tags("<size=+3>big</size>"), "big");
        assert_eq!(strip_tags(r#"<font="Consolas">code</font>"#), "code");
    }

    #[test]
    fn test_strip_tags_drops_comments() {
        assert_eq!(strip_tags("a<!-- note -->b"), "ab");
    }

    #[test]
    fn test_header_markup_literal_tag() {
        let tags = TagSet::new(["h2"]);
        assert_eq!(header_markup(&tags, 2, "Title"), "<h2>Title</h2>");
    }

    #[test]
    fn test_header_markup_size_and_bold() {
        let tags = TagSet::new(["b", "size"]);
        assert_eq!(header_markup(&tags, 1, "Title"), "<size=+5><b>Title</b></size>");
        assert_eq!(header_markup(&tags, 3, "Title"), "<size=+3><b>Title</b></size>");
    }

    #[test]
    fn test_header_markup_level_six_never_sized() {
        let tags = TagSet::new(["b", "size"]);
        assert_eq!(header_markup(&tags, 6, "Title"), "<b>Title</b>");
    }

    #[test]
    fn test_header_markup_bold_only() {
        let tags = TagSet::new(["b"]);
        assert_eq!(header_markup(&tags, 1, "Title"), "<b>Title</b>");
    }

    #[test]
    fn test_header_markup_nothing_available() {
        let tags = TagSet::empty();
        assert_eq!(header_markup(&tags, 1, "Title"), "Title");
    }

    #[test]
    fn test_font_markup_wraps_when_supported() {
        let tags = TagSet::new(["font"]);
        assert_eq!(
            font_markup(&tags, "Consolas", "code"),
            r#"<font="Consolas">code</font>"#
        );
    }

    #[test]
    fn test_font_markup_blank_name_suppresses_wrap() {
        let tags = TagSet::new(["font"]);
        assert_eq!(font_markup(&tags, "  ", "code"), "code");
    }

    #[test]
    fn test_font_markup_unsupported() {
        let tags = TagSet::empty();
        assert_eq!(font_markup(&tags, "Consolas", "code"), "code");
    }

    #[test]
    fn test_find_close_tag() {
        let text = "<b>bold</b> rest";
        assert_eq!(find_close_tag(text, "b", 3), Some((7, 11)));
    }

    #[test]
    fn test_find_close_tag_case_insensitive_with_space() {
        let text = "<B>bold</B > rest";
        assert_eq!(find_close_tag(text, "b", 3), Some((7, 12)));
    }

    #[test]
    fn test_find_close_tag_missing() {
        assert_eq!(find_close_tag("<b>unterminated", "b", 3), None);
    }

    #[test]
    fn test_find_close_tag_first_close_wins() {
        let text = "<b>x</b>y</b>";
        assert_eq!(find_close_tag(text, "b", 3), Some((4, 8)));
    }

    #[test]
    fn test_textify_unordered_list() {
        assert_eq!(
            textify_html_lists("<ul><li>A</li><li>B</li></ul>", true, true),
            "- A\n- B"
        );
    }

    #[test]
    fn test_textify_ordered_list() {
        assert_eq!(
            textify_html_lists("<ol><li>A</li><li>B</li></ol>", true, true),
            "1. A\n2. B"
        );
    }

    #[test]
    fn test_textify_strips_inner_tags() {
        assert_eq!(
            textify_html_lists("<ul><li><b>A</b></li></ul>", true, true),
            "- A"
        );
    }

    #[test]
    fn test_textify_nested_list_flattens() {
        assert_eq!(
            textify_html_lists(
                "<ul><li>a<ul><li>b</li></ul></li></ul>",
                true,
                true
            ),
            "- a\n- b"
        );
    }

    #[test]
    fn test_textify_respects_kind_selection() {
        let text = "<ul><li>A</li></ul>";
        assert_eq!(textify_html_lists(text, false, true), text);
    }

    #[test]
    fn test_textify_unclosed_list_left_alone() {
        let text = "<ul><li>A</li>";
        assert_eq!(textify_html_lists(text, true, true), text);
    }
}
