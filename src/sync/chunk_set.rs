//! Key layout of a chunked document

use crate::domain::StorageKey;

const CHUNK_COUNT_SUFFIX: &str = "-chunk-count";
const CHUNK_INDEX_INFIX: &str = "-chunk-";

/// Describes where the pieces of one logical document live in the key space
///
/// A document stored under base key `doc` occupies `doc-chunk-count`, holding
/// the decimal number of chunks `N`, and `doc-chunk-0` through
/// `doc-chunk-{N-1}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSet {
    base: StorageKey,
}

impl ChunkSet {
    pub fn new(base: StorageKey) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &StorageKey {
        &self.base
    }

    pub fn count_key(&self) -> String {
        format!("{}{CHUNK_COUNT_SUFFIX}", self.base)
    }

    pub fn chunk_key(&self, index: usize) -> String {
        format!("{}{CHUNK_INDEX_INFIX}{index}", self.base)
    }

    /// Chunk keys for indices `0..count`, in order
    pub fn chunk_keys(&self, count: usize) -> impl Iterator<Item = String> + '_ {
        (0..count).map(|index| self.chunk_key(index))
    }

    /// Interpret the stored count value
    ///
    /// Missing, non-integer and non-positive values all mean the document
    /// does not exist yet.
    pub fn parse_count(raw: Option<&str>) -> Option<usize> {
        raw?.trim()
            .parse::<i64>()
            .ok()
            .filter(|count| *count > 0)
            .and_then(|count| usize::try_from(count).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_set(base: &str) -> ChunkSet {
        ChunkSet::new(StorageKey::try_new(base.to_string()).unwrap())
    }

    #[test]
    fn test_key_naming() {
        let set = chunk_set("alice");
        assert_eq!(set.count_key(), "alice-chunk-count");
        assert_eq!(set.chunk_key(0), "alice-chunk-0");
        assert_eq!(set.chunk_key(12), "alice-chunk-12");
        assert_eq!(
            set.chunk_keys(3).collect::<Vec<_>>(),
            vec!["alice-chunk-0", "alice-chunk-1", "alice-chunk-2"]
        );
        assert_eq!(set.chunk_keys(0).count(), 0);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(ChunkSet::parse_count(Some("3")), Some(3));
        assert_eq!(ChunkSet::parse_count(Some(" 7 ")), Some(7));
        assert_eq!(ChunkSet::parse_count(Some("0")), None);
        assert_eq!(ChunkSet::parse_count(Some("-2")), None);
        assert_eq!(ChunkSet::parse_count(Some("1.5")), None);
        assert_eq!(ChunkSet::parse_count(Some("abc")), None);
        assert_eq!(ChunkSet::parse_count(Some("")), None);
        assert_eq!(ChunkSet::parse_count(None), None);
    }
}
