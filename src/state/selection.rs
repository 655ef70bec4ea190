//! Selection — the per-field dirty bits of an attribute record.

use smallvec::SmallVec;
use crate::{Error, Result};

const WORD_BITS: usize = 64;

/// Fixed-size bitset, one bit per field, sized once at construction.
///
/// A set bit means the field changed since the last synchronization point
/// and belongs in the next partial serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    words: SmallVec<[u64; 1]>,
    len: usize,
}

impl Selection {
    /// Selection over `len` fields with every field selected.
    pub fn all(len: usize) -> Self {
        let mut s = Self::none(len);
        s.select_all();
        s
    }

    /// Selection over `len` fields with nothing selected.
    pub fn none(len: usize) -> Self {
        let words = len.div_ceil(WORD_BITS);
        Self {
            words: SmallVec::from_elem(0, words),
            len,
        }
    }

    /// Number of fields covered (not the number selected).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(Error::FieldIndexOutOfRange { index, count: self.len });
        }
        self.set(index);
        Ok(())
    }

    /// Select an index the caller knows is in range.
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "field index {index} out of range ({} fields)", self.len);
        self.words[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
    }

    pub fn select_all(&mut self) {
        let full = self.len / WORD_BITS;
        for w in &mut self.words[..full] {
            *w = u64::MAX;
        }
        let rem = self.len % WORD_BITS;
        if rem != 0 {
            self.words[full] = (1u64 << rem) - 1;
        }
    }

    pub fn clear(&mut self) {
        for w in &mut self.words {
            *w = 0;
        }
    }

    /// Out-of-range indices are never selected.
    pub fn is_selected(&self, index: usize) -> bool {
        index < self.len && self.words[index / WORD_BITS] & (1u64 << (index % WORD_BITS)) != 0
    }

    /// Selected indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.is_selected(i))
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_and_none() {
        let all = Selection::all(3);
        assert_eq!(all.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(all.count(), 3);

        let none = Selection::none(3);
        assert!(!none.any());
        assert_eq!(none.len(), 3);
    }

    #[test]
    fn test_select_single() {
        let mut s = Selection::none(4);
        s.select(2).unwrap();
        assert!(s.is_selected(2));
        assert!(!s.is_selected(1));
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut s = Selection::none(2);
        let err = s.select(2).unwrap_err();
        assert!(matches!(err, Error::FieldIndexOutOfRange { index: 2, count: 2 }));
        assert!(!s.is_selected(2));
    }

    #[test]
    fn test_set_known_index() {
        let mut s = Selection::none(3);
        s.set(0);
        s.set(0);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_out_of_range_panics() {
        Selection::none(3).set(3);
    }

    #[test]
    fn test_select_all_idempotent() {
        let mut once = Selection::none(5);
        once.select_all();
        let mut twice = Selection::none(5);
        twice.select_all();
        twice.select_all();
        assert_eq!(once, twice);
        assert_eq!(once, Selection::all(5));
    }

    #[test]
    fn test_spans_multiple_words() {
        let mut s = Selection::all(70);
        assert_eq!(s.count(), 70);
        assert!(s.is_selected(69));
        assert!(!s.is_selected(70));
        s.clear();
        s.select(65).unwrap();
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![65]);
    }
}
