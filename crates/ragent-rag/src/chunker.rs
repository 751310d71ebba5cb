//! Text chunking for document ingestion

/// One chunk of a source document
#[derive(Debug, Clone)]
pub struct Chunk {
    pub text: String,
    pub index: usize,
}

/// Overlapping text splitter
///
/// Chunks are at most `chunk_size` bytes and consecutive chunks share
/// `chunk_overlap` bytes. Break points prefer paragraph, then sentence,
/// then line, then word boundaries; offsets are always snapped to UTF-8
/// character boundaries.
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        // Overlap must leave room to advance, otherwise chunking never terminates
        let chunk_overlap = chunk_overlap.min(chunk_size.saturating_sub(1));
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        if text.len() <= self.chunk_size {
            return vec![Chunk {
                text: text.to_string(),
                index: 0,
            }];
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut index = 0;

        while start < text.len() {
            let raw_end = (start + self.chunk_size).min(text.len());
            let end = snap_to_char_boundary(text, raw_end);

            let actual_end = if end < text.len() {
                self.find_break_point(text, start, end)
            } else {
                end
            };

            let chunk_text = text[start..actual_end].trim();
            if !chunk_text.is_empty() {
                chunks.push(Chunk {
                    text: chunk_text.to_string(),
                    index,
                });
                index += 1;
            }

            if actual_end >= text.len() {
                break;
            }

            let step = if actual_end - start > self.chunk_overlap {
                actual_end - start - self.chunk_overlap
            } else {
                actual_end - start
            };
            start = snap_to_char_boundary(text, start + step.max(1));
        }

        chunks
    }

    fn find_break_point(&self, text: &str, start: usize, preferred_end: usize) -> usize {
        let raw_search_start = preferred_end.saturating_sub(200).max(start);
        let search_start = snap_to_char_boundary(text, raw_search_start);
        let safe_end = snap_to_char_boundary(text, preferred_end);

        if search_start >= safe_end {
            return safe_end;
        }

        let search_region = &text[search_start..safe_end];

        // Priority: paragraph break > sentence end > line break > word break
        if let Some(pos) = search_region.rfind("\n\n") {
            return search_start + pos + 2;
        }
        if let Some(pos) = search_region.rfind(". ") {
            return search_start + pos + 2;
        }
        if let Some(pos) = search_region.rfind(".\n") {
            return search_start + pos + 2;
        }
        if let Some(pos) = search_region.rfind('\n') {
            return search_start + pos + 1;
        }
        if let Some(pos) = search_region.rfind(' ') {
            return search_start + pos + 1;
        }

        safe_end
    }
}

fn snap_to_char_boundary(text: &str, mut offset: usize) -> usize {
    offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(100, 20);
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n  ").is_empty());
    }

    #[test]
    fn test_short_text_yields_single_chunk() {
        let chunker = TextChunker::new(100, 20);
        let chunks = chunker.chunk("a short document");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "a short document");
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_long_text_splits_with_contiguous_indices() {
        let sentence = "The quick brown fox jumps over the lazy dog. ";
        let text = sentence.repeat(50);

        let chunker = TextChunker::new(200, 40);
        let chunks = chunker.chunk(&text);

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert!(chunk.text.len() <= 200);
        }
    }

    #[test]
    fn test_prefers_sentence_boundaries() {
        let text = format!("{}. {}", "a".repeat(80), "b".repeat(80));
        let chunker = TextChunker::new(100, 10);
        let chunks = chunker.chunk(&text);

        assert!(chunks[0].text.ends_with('.'));
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let text = "héllo wörld ünïcode ".repeat(100);
        let chunker = TextChunker::new(64, 16);
        let chunks = chunker.chunk(&text);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn test_overlap_larger_than_chunk_size_still_terminates() {
        let chunker = TextChunker::new(10, 50);
        let chunks = chunker.chunk(&"word ".repeat(100));
        assert!(!chunks.is_empty());
    }
}
