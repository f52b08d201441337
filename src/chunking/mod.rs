//! UTF-8 safe chunking of documents
//!
//! A document is split into an ordered sequence of slices whose UTF-8 byte
//! length never exceeds the configured maximum. Boundaries always fall on
//! `char` boundaries, so every chunk is valid text on its own.
//!
//! ```rust
//! use kv_chunk_sync::chunking::chunks;
//! use kv_chunk_sync::domain::MaxChunkBytes;
//!
//! let max = MaxChunkBytes::try_new(4).unwrap();
//! let parts: Vec<&str> = chunks("héllo", max).collect();
//! assert_eq!(parts, vec!["hél", "lo"]);
//! ```

use crate::domain::MaxChunkBytes;
use std::iter::FusedIterator;

/// Split `text` into chunks of at most `max_bytes` UTF-8 bytes each
///
/// The returned iterator is lazy and borrows from `text`. A single character
/// wider than `max_bytes` is emitted alone as an over-limit chunk.
pub fn chunks(text: &str, max_bytes: MaxChunkBytes) -> Chunks<'_> {
    Chunks {
        rest: text,
        max_bytes: max_bytes.into_inner(),
    }
}

/// Iterator returned by [`chunks`]
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
    max_bytes: usize,
}

impl<'a> Chunks<'a> {
    /// Byte offset of the end of the next chunk within `rest`
    fn next_boundary(&self) -> usize {
        if self.rest.len() <= self.max_bytes {
            return self.rest.len();
        }

        let mut end = self.max_bytes;
        while !self.rest.is_char_boundary(end) {
            end -= 1;
        }

        if end == 0 {
            // The first character alone is wider than the limit
            self.rest
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(self.rest.len())
        } else {
            end
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let (chunk, rest) = self.rest.split_at(self.next_boundary());
        self.rest = rest;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.rest.is_empty() {
            (0, Some(0))
        } else {
            // Each chunk holds at least one char and at most `max_bytes` bytes
            // unless a single char overflows it; chars are at most 4 bytes.
            let lower = self.rest.len().div_ceil(self.max_bytes.max(4));
            (lower.max(1), Some(self.rest.len()))
        }
    }
}

impl FusedIterator for Chunks<'_> {}
