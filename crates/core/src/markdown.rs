//! Markdown to structured paragraphs, for DOCX export.
//!
//! Only the subset scripts actually use is understood: `#`/`##`/`###`
//! headings and inline `**bold**`, `*italic*` and `` `code` `` spans.
//! Anything else is kept as plain text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Inline span pattern. Alternation order matters: `**` must be tried before `*`.
static INLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(?P<bold>[^*]+?)\*\*|`(?P<code>[^`]+)`|\*(?P<italic>[^*\s](?:[^*]*[^*\s])?)\*")
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
}

impl BlockKind {
    /// Word paragraph style id, if the block needs one.
    pub fn style_id(self) -> Option<&'static str> {
        match self {
            Self::Heading1 => Some("Heading1"),
            Self::Heading2 => Some("Heading2"),
            Self::Heading3 => Some("Heading3"),
            Self::Paragraph => None,
        }
    }
}

/// A run of text sharing one set of inline styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            code: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self {
            code: true,
            ..Self::plain(text)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub kind: BlockKind,
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Concatenated text of all runs, without markup.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Parse markdown into paragraphs. Each non-blank line is one paragraph.
pub fn parse_markdown(input: &str) -> Vec<Paragraph> {
    input
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Paragraph {
    let (kind, body) = if let Some(rest) = line.strip_prefix("### ") {
        (BlockKind::Heading3, rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        (BlockKind::Heading2, rest)
    } else if let Some(rest) = line.strip_prefix("# ") {
        (BlockKind::Heading1, rest)
    } else {
        (BlockKind::Paragraph, line)
    };

    Paragraph {
        kind,
        runs: parse_inline(body.trim()),
    }
}

/// Split a line into styled runs. Unmatched markers stay in the plain text.
pub fn parse_inline(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut cursor = 0;

    for caps in INLINE_RE.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always present");
        if whole.start() > cursor {
            runs.push(Run::plain(&text[cursor..whole.start()]));
        }
        if let Some(m) = caps.name("bold") {
            runs.push(Run::bold(m.as_str()));
        } else if let Some(m) = caps.name("code") {
            runs.push(Run::code(m.as_str()));
        } else if let Some(m) = caps.name("italic") {
            runs.push(Run::italic(m.as_str()));
        }
        cursor = whole.end();
    }

    if cursor < text.len() {
        runs.push(Run::plain(&text[cursor..]));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_map_to_levels() {
        let paras = parse_markdown("# Title\n## Part\n### Scene\nBody");
        let kinds: Vec<BlockKind> = paras.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Heading1,
                BlockKind::Heading2,
                BlockKind::Heading3,
                BlockKind::Paragraph
            ]
        );
        assert_eq!(paras[0].text(), "Title");
        assert_eq!(paras[2].text(), "Scene");
    }

    #[test]
    fn hash_without_space_is_plain_text() {
        let paras = parse_markdown("#hashtag");
        assert_eq!(paras[0].kind, BlockKind::Paragraph);
        assert_eq!(paras[0].text(), "#hashtag");
    }

    #[test]
    fn inline_spans_keep_surrounding_text() {
        let runs = parse_inline("Say **hello** to *everyone* with `code` now");
        assert_eq!(
            runs,
            vec![
                Run::plain("Say "),
                Run::bold("hello"),
                Run::plain(" to "),
                Run::italic("everyone"),
                Run::plain(" with "),
                Run::code("code"),
                Run::plain(" now"),
            ]
        );
    }

    #[test]
    fn heading_with_inline_styles() {
        let paras = parse_markdown("## The **big** reveal");
        assert_eq!(paras[0].kind, BlockKind::Heading2);
        assert_eq!(
            paras[0].runs,
            vec![Run::plain("The "), Run::bold("big"), Run::plain(" reveal")]
        );
    }

    #[test]
    fn unmatched_markers_stay_literal() {
        let runs = parse_inline("2 * 3 = 6 and **unclosed");
        assert_eq!(runs, vec![Run::plain("2 * 3 = 6 and **unclosed")]);
    }

    #[test]
    fn plain_text_is_never_lost() {
        let input = "# A\nintro **b** mid *c* tail `d` end\n\n### E *f*";
        let recovered: Vec<String> = parse_markdown(input).iter().map(Paragraph::text).collect();
        assert_eq!(recovered, vec!["A", "intro b mid c tail d end", "E f"]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        assert!(parse_markdown("\n   \n\n").is_empty());
        assert_eq!(parse_markdown("a\n\n\nb").len(), 2);
    }
}
