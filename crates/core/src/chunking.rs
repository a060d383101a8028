//! Script chunking for scene extraction.
//!
//! Long scripts are cut into pieces small enough for a single model call.
//! Cuts prefer paragraph breaks, then sentence ends, then spaces; a word
//! longer than the limit is split mid-word as a last resort.

use crate::error::CoreError;

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_CHARS: usize = 4_000;

/// Smallest accepted chunk size.
pub const MIN_CHUNK_CHARS: usize = 100;

/// Largest accepted chunk size.
pub const MAX_CHUNK_CHARS: usize = 50_000;

/// Validate a requested chunk size.
pub fn validate_chunk_size(max_chars: usize) -> Result<(), CoreError> {
    if !(MIN_CHUNK_CHARS..=MAX_CHUNK_CHARS).contains(&max_chars) {
        return Err(CoreError::Validation(format!(
            "maxChars must be between {MIN_CHUNK_CHARS} and {MAX_CHUNK_CHARS} (got {max_chars})"
        )));
    }
    Ok(())
}

/// Split `text` into trimmed chunks of at most `max_chars` characters.
///
/// Lengths are counted in `char`s, not bytes. Empty input yields no chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text.trim();
    // Chars left in `rest`, kept in step with each cut.
    let mut remaining = rest.chars().count();

    while remaining > 0 {
        if remaining <= max_chars {
            chunks.push(rest.to_string());
            break;
        }

        // Byte offset of the first char past the limit.
        let limit = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let window = &rest[..limit];

        let cut = find_break(window).unwrap_or(limit);
        let (head, tail) = rest.split_at(cut);
        let head = head.trim();
        if !head.is_empty() {
            chunks.push(head.to_string());
        }
        let next = tail.trim_start();
        remaining -= rest[..rest.len() - next.len()].chars().count();
        rest = next;
    }

    chunks
}

/// Best byte offset to cut `window` at, or `None` if it has no boundary.
fn find_break(window: &str) -> Option<usize> {
    if let Some(i) = window.rfind("\n\n") {
        if i > 0 {
            return Some(i);
        }
    }

    let sentence_end = window
        .char_indices()
        .zip(window.chars().skip(1))
        .filter(|((_, c), next)| matches!(c, '.' | '!' | '?') && next.is_whitespace())
        .map(|((i, c), _)| i + c.len_utf8())
        .last();
    if sentence_end.is_some() {
        return sentence_end;
    }

    window.rfind(char::is_whitespace).filter(|i| *i > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk_text("  hello world  ", 100), vec!["hello world"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunk_text("   \n ", 100).is_empty());
    }

    #[test]
    fn prefers_paragraph_breaks() {
        let text = "First paragraph here.\n\nSecond paragraph follows.";
        let chunks = chunk_text(text, 30);
        assert_eq!(chunks, vec!["First paragraph here.", "Second paragraph follows."]);
    }

    #[test]
    fn falls_back_to_sentence_ends() {
        let text = "One two three. Four five six. Seven eight nine.";
        let chunks = chunk_text(text, 32);
        assert_eq!(chunks[0], "One two three. Four five six.");
        assert_eq!(chunks[1], "Seven eight nine.");
    }

    #[test]
    fn falls_back_to_words_then_hard_split() {
        let chunks = chunk_text("alpha beta gamma", 8);
        assert_eq!(chunks, vec!["alpha", "beta", "gamma"]);

        let chunks = chunk_text("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn chunks_never_exceed_limit_and_keep_all_words() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                    Sed do eiusmod tempor incididunt ut labore.\n\nUt enim ad minim veniam, \
                    quis nostrud exercitation ullamco laboris nisi ut aliquip.";
        for limit in [25, 40, 80] {
            let chunks = chunk_text(text, limit);
            assert!(chunks.iter().all(|c| c.chars().count() <= limit));
            let rejoined: Vec<&str> = chunks.iter().flat_map(|c| c.split_whitespace()).collect();
            let original: Vec<&str> = text.split_whitespace().collect();
            assert_eq!(rejoined, original, "limit {limit}");
        }
    }

    #[test]
    fn long_input_is_split_in_linear_time() {
        let text = "word ".repeat(200_000);
        let chunks = chunk_text(&text, 100);
        assert_eq!(chunks.len(), 10_000);
        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
        assert_eq!(chunks.iter().flat_map(|c| c.split_whitespace()).count(), 200_000);
    }

    #[test]
    fn counts_chars_not_bytes() {
        let chunks = chunk_text("ééééé ééééé", 5);
        assert_eq!(chunks, vec!["ééééé", "ééééé"]);
    }

    #[test]
    fn chunk_size_bounds() {
        assert!(validate_chunk_size(MIN_CHUNK_CHARS).is_ok());
        assert!(validate_chunk_size(MAX_CHUNK_CHARS).is_ok());
        assert!(validate_chunk_size(MIN_CHUNK_CHARS - 1).is_err());
        assert!(validate_chunk_size(MAX_CHUNK_CHARS + 1).is_err());
    }
}
