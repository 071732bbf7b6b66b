//! `[[Title]]` reference extraction from note content.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static WIKI_LINK: LazyLock<Regex> = LazyLock::new(|| {
    // Literal pattern, always valid
    Regex::new(r"\[\[([^\]]+)\]\]").unwrap_or_else(|e| panic!("invalid wiki-link pattern: {e}"))
});

/// Extract the titles referenced as `[[Title]]` in `content`.
///
/// Titles are trimmed; blank ones are dropped. Duplicates are removed,
/// keeping the order of first occurrence.
pub fn extract_wiki_links(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    WIKI_LINK
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|title| !title.is_empty())
        .filter(|title| seen.insert(title.to_string()))
        .map(str::to_string)
        .collect()
}
