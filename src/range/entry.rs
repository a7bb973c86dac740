//! Single format range entries and the read-only policy applied to them.

use super::text::TextRange;

/// A range scheduled for formatting.
///
/// `process_heading_whitespace` marks the whitespace immediately before
/// `range.start()` as in scope as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRange {
    range: TextRange,
    process_heading_whitespace: bool,
}

impl FormatRange {
    pub fn new(range: TextRange, process_heading_whitespace: bool) -> Self {
        Self {
            range,
            process_heading_whitespace,
        }
    }

    pub fn text_range(&self) -> TextRange {
        self.range
    }

    pub fn start(&self) -> usize {
        self.range.start()
    }

    pub fn end(&self) -> usize {
        self.range.end()
    }

    pub fn process_heading_whitespace(&self) -> bool {
        self.process_heading_whitespace
    }

    /// Whether `candidate` lies strictly outside this entry.
    ///
    /// A candidate that only touches the entry boundary is still writable.
    pub fn is_read_only(&self, candidate: TextRange) -> bool {
        candidate.start() > self.end() || candidate.end() < self.start()
    }

    /// Whether whitespace covered by `candidate` must be left untouched.
    pub fn is_whitespace_read_only(&self, candidate: TextRange) -> bool {
        if candidate.start() >= self.end() {
            return true;
        }
        if self.process_heading_whitespace && candidate.end() == self.start() {
            return false;
        }
        candidate.end() <= self.start()
    }

    /// Combine two entries into one spanning both.
    ///
    /// The heading-whitespace flag comes from the entry starting first; on
    /// equal starts `self` wins.
    pub(crate) fn merge(self, other: FormatRange) -> FormatRange {
        let process_heading_whitespace = if other.start() < self.start() {
            other.process_heading_whitespace
        } else {
            self.process_heading_whitespace
        };
        FormatRange::new(self.range.union(other.range), process_heading_whitespace)
    }
}

/// Decides whether a queried range is immutable relative to one entry.
///
/// [`FormatRangeSet`](super::FormatRangeSet) aggregates these answers over
/// all of its entries.
pub trait ReadOnlyPolicy {
    fn is_read_only(&self, entry: &FormatRange, candidate: TextRange) -> bool;

    fn is_whitespace_read_only(&self, entry: &FormatRange, candidate: TextRange) -> bool;
}

/// Treats everything strictly outside an entry as read-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryPolicy;

impl ReadOnlyPolicy for BoundaryPolicy {
    fn is_read_only(&self, entry: &FormatRange, candidate: TextRange) -> bool {
        entry.is_read_only(candidate)
    }

    fn is_whitespace_read_only(&self, entry: &FormatRange, candidate: TextRange) -> bool {
        entry.is_whitespace_read_only(candidate)
    }
}
