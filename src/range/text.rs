//! Half-open byte ranges over a document.

use std::fmt;
use std::ops::Range;

/// An immutable half-open interval `[start, end)` of document byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    /// Create a new range.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "invalid text range: start {start} > end {end}");
        Self { start, end }
    }

    /// An empty range at the given offset.
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely inside this range.
    pub fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges overlap or touch.
    pub fn intersects(&self, other: TextRange) -> bool {
        self.start.max(other.start) <= self.end.min(other.end)
    }

    /// Smallest range covering both.
    pub fn union(&self, other: TextRange) -> TextRange {
        TextRange::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        TextRange::new(range.start, range.end)
    }
}

impl From<TextRange> for Range<usize> {
    fn from(range: TextRange) -> Self {
        range.start..range.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range() {
        let range = TextRange::empty(7);
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert!(!TextRange::new(7, 8).is_empty());
    }

    #[test]
    #[should_panic(expected = "invalid text range")]
    fn rejects_inverted_range() {
        TextRange::new(5, 4);
    }

    #[test]
    fn touching_ranges_intersect() {
        let a = TextRange::new(0, 10);
        assert!(a.intersects(TextRange::new(10, 20)));
        assert!(a.intersects(TextRange::new(5, 6)));
        assert!(!a.intersects(TextRange::new(11, 20)));
    }

    #[test]
    fn containment() {
        let outer = TextRange::new(10, 20);
        assert!(outer.contains_range(TextRange::new(10, 20)));
        assert!(outer.contains_range(TextRange::new(12, 15)));
        assert!(!outer.contains_range(TextRange::new(9, 15)));
    }

    #[test]
    fn union_and_conversion() {
        let range = TextRange::new(3, 5).union(TextRange::new(8, 12));
        assert_eq!(range, TextRange::from(3..12));
        assert_eq!(Range::from(range), 3..12);
        assert_eq!(range.to_string(), "[3, 12)");
    }
}
