//! Link stripping for scraped page text.
//!
//! Scraped markdown is full of navigation links that pollute prompts. Every
//! link-like construct is replaced with [`LINK_MARKER`], and runs of markers
//! separated only by whitespace or list punctuation collapse to one.

use std::sync::LazyLock;

use regex::Regex;

/// Replacement text for every removed link.
pub const LINK_MARKER: &str = "LINK REMOVED";

/// Anchors first so their inner text goes with them, then markdown links
/// and images, then bare references.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<a\b[^>]*>.*?</a\s*>|!?\[[^\]]*\]\([^)]*\)|mailto:[^\s)>\]"']+|https?://[^\s)>\]"']+|\bwww\.[^\s)>\]"']+"#,
    )
    .expect("valid regex")
});

static REPEATED_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"LINK REMOVED(?:[\s,;|/\-]*LINK REMOVED)+").expect("valid regex")
});

/// Replace every link in `text` with [`LINK_MARKER`].
///
/// Idempotent: running it on its own output changes nothing.
pub fn remove_links(text: &str) -> String {
    let replaced = LINK_RE.replace_all(text, LINK_MARKER);
    REPEATED_MARKER_RE
        .replace_all(&replaced, LINK_MARKER)
        .into_owned()
}
