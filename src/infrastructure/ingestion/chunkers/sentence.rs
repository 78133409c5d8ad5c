//! Sentence-based chunking strategy

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::{Chunk, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

/// Packs whole sentences into chunks of at most `chunk_size` characters
///
/// Each new chunk starts with the last `chunk_overlap` characters of the
/// previous one. Sentences longer than a chunk are split on character
/// boundaries. A chunk below `min_chunk_size` is topped up from the next
/// sentence, or from the end of the previous chunk when it is the last one;
/// no text is ever dropped.
#[derive(Debug, Clone, Default)]
pub struct SentenceChunker;

impl SentenceChunker {
    pub fn new() -> Self {
        Self
    }

    fn sentences(text: &str, max_chars: usize) -> Vec<String> {
        let mut out = Vec::new();

        for sentence in text.unicode_sentences() {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }

            if char_len(sentence) <= max_chars {
                out.push(sentence.to_string());
                continue;
            }

            let chars: Vec<char> = sentence.chars().collect();
            for piece in chars.chunks(max_chars) {
                out.push(piece.iter().collect());
            }
        }

        out
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split after the first `n` characters, backing off to a word break when
/// the cut would land inside a word
fn head_at_word(s: &str, n: usize) -> (&str, &str) {
    let cut = s.char_indices().nth(n).map_or(s.len(), |(idx, _)| idx);
    let (head, rest) = s.split_at(cut);

    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return (head, rest);
    }

    match head.rfind(char::is_whitespace) {
        Some(space) => s.split_at(space),
        None => (head, rest),
    }
}

/// The last `n` characters of `s`, starting at a word when possible
fn tail_at_word(s: &str, n: usize) -> &str {
    let t = tail(s, n);
    let before = &s[..s.len() - t.len()];

    if before.is_empty() || before.ends_with(char::is_whitespace) {
        return t;
    }

    t.split_once(char::is_whitespace)
        .map_or(t, |(_, rest)| rest)
        .trim_start()
}

/// The last `n` characters of `s`
fn tail(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }

    let len = char_len(s);
    if n >= len {
        return s;
    }

    match s.char_indices().nth(len - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

impl ChunkingStrategy for SentenceChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let content = content.trim();

        if content.is_empty() {
            return Ok(vec![]);
        }

        if char_len(content) <= config.chunk_size {
            return Ok(vec![Chunk::new(content, 0, 1)]);
        }

        let mut pieces: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for sentence in Self::sentences(content, config.chunk_size) {
            let sentence_len = char_len(&sentence);

            if current.is_empty() {
                current = sentence;
                current_len = sentence_len;
                continue;
            }

            if current_len + 1 + sentence_len <= config.chunk_size {
                current.push(' ');
                current.push_str(&sentence);
                current_len += 1 + sentence_len;
                continue;
            }

            let mut sentence = sentence;

            if current_len < config.min_chunk_size {
                let room = config.chunk_size.saturating_sub(current_len + 1);
                let (head, rest) = head_at_word(&sentence, room);
                let (head, rest) = (head.trim_end().to_string(), rest.trim_start().to_string());

                if !head.is_empty() {
                    current.push(' ');
                    current.push_str(&head);
                }
                sentence = rest;
            }

            let overlap = tail(&current, config.chunk_overlap).trim_start().to_string();
            let overlap_len = char_len(&overlap);
            pieces.push(std::mem::take(&mut current));
            current_len = 0;

            if sentence.is_empty() {
                continue;
            }
            let sentence_len = char_len(&sentence);

            if config.chunk_overlap > 0
                && overlap_len > 0
                && overlap_len + 1 + sentence_len <= config.chunk_size
            {
                current = format!("{} {}", overlap, sentence);
                current_len = overlap_len + 1 + sentence_len;
            } else {
                current = sentence;
                current_len = sentence_len;
            }
        }

        if !current.is_empty() {
            if let Some(previous) = pieces.last().filter(|_| current_len < config.min_chunk_size) {
                let room = config.chunk_size.saturating_sub(current_len + 1);
                let lead = tail_at_word(previous, room);

                if !lead.is_empty() {
                    current = format!("{} {}", lead, current);
                }
            }
            pieces.push(current);
        }

        let total = pieces.len();
        Ok(pieces
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk::new(text, index, total))
            .collect())
    }

    fn name(&self) -> &'static str {
        "sentence"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content() {
        let chunker = SentenceChunker::new();

        assert!(chunker.chunk("", &ChunkingConfig::default()).unwrap().is_empty());
        assert!(chunker.chunk("   \n ", &ChunkingConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = SentenceChunker::new();
        let chunks = chunker
            .chunk("  This is a single sentence.  ", &ChunkingConfig::default())
            .unwrap();

        assert_eq!(chunks, vec![Chunk::new("This is a single sentence.", 0, 1)]);
    }

    #[test]
    fn test_sentences_are_packed() {
        let chunker = SentenceChunker::new();
        let config = ChunkingConfig::new(45, 0);

        let content = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = chunker.chunk(content, &config).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "First sentence here. Second sentence here.");
        assert_eq!(chunks[1].content, "Third sentence here.");
        assert!(chunks.iter().all(|c| c.total == 2));
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn test_overlap_carries_tail_forward() {
        let chunker = SentenceChunker::new();
        let config = ChunkingConfig::new(30, 5);

        let content = "Alpha beta gamma delta. Epsilon zeta eta theta.";
        let chunks = chunker.chunk(content, &config).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "Alpha beta gamma delta.");
        assert_eq!(chunks[1].content, "elta. Epsilon zeta eta theta.");
    }

    #[test]
    fn test_overlap_respects_char_boundaries() {
        let chunker = SentenceChunker::new();
        let config = ChunkingConfig::new(12, 3);

        let content = "Привет мир. Ещё раз.";
        let chunks = chunker.chunk(content, &config).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "Привет мир.");
        assert_eq!(chunks[1].content, "ир. Ещё раз.");
        assert!(chunks.iter().all(|c| c.content.chars().count() <= 12));
    }

    #[test]
    fn test_long_sentence_is_split() {
        let chunker = SentenceChunker::new();
        let config = ChunkingConfig::new(10, 0);

        let content = "abcdefghijklmnopqrstuvwxy";
        let chunks = chunker.chunk(content, &config).unwrap();

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["abcdefghij", "klmnopqrst", "uvwxy"]);
    }

    #[test]
    fn test_short_trailing_sentence_borrows_previous_words() {
        let chunker = SentenceChunker::new();
        let config = ChunkingConfig::new(25, 0).with_min_chunk_size(10);

        let content = "A fairly long sentence. Tiny.";
        let chunks = chunker.chunk(content, &config).unwrap();

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["A fairly long sentence.", "long sentence. Tiny."]);
    }

    #[test]
    fn test_short_heading_before_unbroken_block_is_kept() {
        let chunker = SentenceChunker::new();
        let config = ChunkingConfig::default();

        let content = format!("Warranty is two years. {}", "x".repeat(5000));
        let chunks = chunker.chunk(&content, &config).unwrap();

        assert!(chunks[0].content.starts_with("Warranty is two years. xxx"));
        assert!(chunks.iter().all(|c| c.content.chars().count() <= config.chunk_size));

        let xs: usize = chunks.iter().map(|c| c.content.matches('x').count()).sum();
        assert!(xs >= 5000);
    }

    #[test]
    fn test_short_closing_sentence_is_kept_without_overlap() {
        let chunker = SentenceChunker::new();
        let config = ChunkingConfig::new(130, 0).with_min_chunk_size(50);

        let content = "Our support team answers every ticket within one business day. \
                       Replacement parts ship from the central warehouse in Leipzig. \
                       Call us.";
        let chunks = chunker.chunk(content, &config).unwrap();

        let last = &chunks.last().unwrap().content;
        assert!(last.ends_with("Call us."), "{}", last);
        assert!(last.chars().count() >= 50);
        assert!(chunks.iter().all(|c| c.content.chars().count() <= 130));
    }

    #[test]
    fn test_word_boundary_helpers() {
        assert_eq!(head_at_word("alpha beta gamma", 8), ("alpha", " beta gamma"));
        assert_eq!(head_at_word("alpha beta", 5), ("alpha", " beta"));
        assert_eq!(head_at_word("xxxxxxxx", 3), ("xxx", "xxxxx"));
        assert_eq!(tail_at_word("alpha beta gamma", 8), "gamma");
        assert_eq!(tail_at_word("alpha beta", 20), "alpha beta");
    }

    #[test]
    fn test_invalid_config() {
        let chunker = SentenceChunker::new();
        let result = chunker.chunk("text", &ChunkingConfig::new(10, 10));

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_name() {
        assert_eq!(SentenceChunker::new().name(), "sentence");
    }
}
