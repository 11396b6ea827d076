use serde::{Deserialize, Serialize};

/// A bounded contiguous slice of the source text, the unit of retrieval.
///
/// Offsets are byte positions into the original text and always fall on
/// UTF-8 character boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    pub index: usize,
    pub content: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Splits `text` into ordered chunks of at most `max_chunk_size` bytes,
/// where each chunk after the first starts `overlap_size` bytes before the
/// previous chunk's end so context survives a cut boundary.
///
/// Cut points prefer, in order: a paragraph break, a line break, a sentence
/// end, any whitespace, and finally a hard cut at the size limit. Empty
/// input yields an empty sequence.
pub fn split_text(text: &str, max_chunk_size: usize, overlap_size: usize) -> Vec<TextChunk> {
    let mut chunks = Vec::new();
    if text.is_empty() {
        return chunks;
    }

    let max_chunk_size = max_chunk_size.max(1);
    let overlap_size = overlap_size.min(max_chunk_size - 1);

    let len = text.len();
    let mut start = 0;
    while start < len {
        let mut hard_end = floor_char_boundary(text, start.saturating_add(max_chunk_size).min(len));
        if hard_end <= start {
            // A single character wider than the limit still has to go somewhere
            hard_end = ceil_char_boundary(text, start + 1);
        }

        let end = if hard_end >= len {
            len
        } else {
            find_cut(text, start, hard_end)
        };

        chunks.push(TextChunk {
            index: chunks.len(),
            content: text[start..end].to_string(),
            start_offset: start,
            end_offset: end,
        });

        if end >= len {
            break;
        }

        let mut next = ceil_char_boundary(text, end.saturating_sub(overlap_size));
        if next <= start {
            // The natural boundary produced a chunk shorter than the overlap;
            // skip the overlap so the scan keeps moving forward
            next = end;
        }
        start = next;
    }

    chunks
}

/// Picks the best cut position in `(start, hard_end]`, preferring the latest
/// natural boundary. The separator stays with the preceding chunk so that
/// concatenating chunks reconstructs the original text.
fn find_cut(text: &str, start: usize, hard_end: usize) -> usize {
    let window = &text[start..hard_end];

    if let Some(pos) = window.rfind("\n\n") {
        return start + pos + 2;
    }
    if let Some(pos) = window.rfind('\n') {
        return start + pos + 1;
    }
    if let Some(pos) = rfind_sentence_end(window) {
        return start + pos;
    }
    if let Some(pos) = window.rfind(|c: char| c == ' ' || c == '\t') {
        if pos > 0 {
            return start + pos + 1;
        }
    }

    hard_end
}

/// Position just past the last sentence-ending punctuation followed by a
/// space, if any.
fn rfind_sentence_end(window: &str) -> Option<usize> {
    [". ", "! ", "? "]
        .iter()
        .filter_map(|sep| window.rfind(sep).map(|pos| pos + sep.len()))
        .max()
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
