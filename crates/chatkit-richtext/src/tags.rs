//! Supported-tag registry with alias normalization.
//!
//! Every rendering context owns a [`TagSet`]: the allow-list of output tags
//! it may receive. Membership tests are case-insensitive and alias-aware, so
//! `<strong>` is answered exactly like `<b>`.

use std::collections::HashSet;

/// Immutable set of output tags a rendering context supports.
///
/// Constructed once per formatter instance. Tag names are normalized on
/// construction and on lookup: lower-cased, then resolved through the alias
/// table (`strong`→`b`, `em`→`i`, `del`/`strike`→`s`). Unknown tags are
/// simply unsupported; construction never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagSet {
    tags: HashSet<String>,
}

impl TagSet {
    /// Build a tag set from caller-supplied names.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|tag| normalize_tag(tag.as_ref()))
                .collect(),
        }
    }

    /// The empty set: every tag degrades to plain text.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the (normalized) tag may appear in output.
    #[must_use]
    pub fn supports(&self, tag: &str) -> bool {
        self.tags.contains(&normalize_tag(tag))
    }

    /// Whether every tag in `tags` is supported.
    pub(crate) fn supports_all(&self, tags: &[&str]) -> bool {
        tags.iter().all(|tag| self.supports(tag))
    }

    /// Number of distinct normalized tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Normalize a tag name: trim, lower-case, then resolve aliases.
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    let lower = tag.trim().to_ascii_lowercase();
    match lower.as_str() {
        "strong" => "b".to_owned(),
        "em" => "i".to_owned(),
        "del" | "strike" => "s".to_owned(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_listed_tag() {
        let tags = TagSet::new(["b", "i", "a"]);
        assert!(tags.supports("b"));
        assert!(tags.supports("a"));
        assert!(!tags.supports("ul"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let tags = TagSet::new(["b"]);
        assert!(tags.supports("B"));
        assert!(tags.supports("b"));
    }

    #[test]
    fn test_construction_normalizes_case() {
        let tags = TagSet::new(["B", "I"]);
        assert!(tags.supports("b"));
        assert!(tags.supports("i"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_aliases_resolve_on_lookup() {
        let tags = TagSet::new(["b", "i", "s"]);
        assert!(tags.supports("strong"));
        assert!(tags.supports("em"));
        assert!(tags.supports("del"));
        assert!(tags.supports("strike"));
    }

    #[test]
    fn test_aliases_resolve_on_construction() {
        let tags = TagSet::new(["strong", "em", "del"]);
        assert!(tags.supports("b"));
        assert!(tags.supports("i"));
        assert!(tags.supports("s"));
        // Three aliases, three canonical tags.
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let tags = TagSet::new(["b"]);
        assert!(!tags.supports("marquee"));
    }

    #[test]
    fn test_empty_set_supports_nothing() {
        let tags = TagSet::empty();
        assert!(tags.is_empty());
        assert!(!tags.supports("b"));
    }

    #[test]
    fn test_supports_all() {
        let tags = TagSet::new(["ul", "li"]);
        assert!(tags.supports_all(&["ul", "li"]));
        assert!(!tags.supports_all(&["ol", "li"]));
    }
}
