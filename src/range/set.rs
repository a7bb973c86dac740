//! Merge-on-insert set of format ranges.

use std::collections::BTreeMap;

use super::entry::{BoundaryPolicy, FormatRange, ReadOnlyPolicy};
use super::text::TextRange;

/// Read access to a set of format ranges.
///
/// Handed to blocks when they are asked for extra ranges, so they can look
/// at the current plan without depending on the set's policy type.
pub trait RangesInfo {
    /// Whether every entry leaves `range` untouched.
    fn is_read_only(&self, range: TextRange) -> bool;

    /// Whether every entry leaves the whitespace in `range` untouched.
    fn is_whitespace_read_only(&self, range: TextRange) -> bool;

    /// Whether `range` lies inside a formatter-disabled region.
    fn is_in_disabled_range(&self, range: TextRange) -> bool;

    /// The stored ranges in ascending order.
    fn text_ranges(&self) -> Vec<TextRange>;

    /// Whether the set holds no entries.
    fn is_empty(&self) -> bool;
}

/// Ranges to reformat, kept minimal and non-overlapping.
///
/// Entries are keyed by start offset. After every insertion no two entries
/// overlap or touch; touching and overlapping ranges are merged.
#[derive(Debug, Clone, Default)]
pub struct FormatRangeSet<P = BoundaryPolicy> {
    entries: BTreeMap<usize, FormatRange>,
    policy: P,
    extended: Vec<TextRange>,
    extend_to_context: bool,
    disabled: Vec<TextRange>,
}

impl FormatRangeSet {
    /// An empty set using [`BoundaryPolicy`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A set seeded with a single range.
    pub fn with_range(range: TextRange, process_heading_whitespace: bool) -> Self {
        let mut set = Self::new();
        set.add(range, process_heading_whitespace);
        set
    }
}

impl<P: ReadOnlyPolicy> FormatRangeSet<P> {
    /// An empty set answering read-only queries through `policy`.
    pub fn with_policy(policy: P) -> Self {
        Self {
            entries: BTreeMap::new(),
            policy,
            extended: Vec::new(),
            extend_to_context: false,
            disabled: Vec::new(),
        }
    }

    /// Insert a range, merging it with the entries it overlaps or touches.
    ///
    /// Empty ranges are ignored.
    ///
    /// # Panics
    /// Panics if a fresh entry would land on an occupied start offset. That
    /// can only happen if the merge target search is broken.
    pub fn add(&mut self, range: TextRange, process_heading_whitespace: bool) {
        if range.is_empty() {
            return;
        }

        let incoming = FormatRange::new(range, process_heading_whitespace);
        let target = self
            .merge_target(range)
            .filter(|target| range.start() <= target.end())
            .and_then(|target| self.entries.remove(&target.start()));

        let entry = match target {
            Some(target) => target.merge(incoming),
            None => incoming,
        };
        let entry = self.absorb_touching(entry);

        assert!(
            !self.entries.contains_key(&entry.start()),
            "format range already registered at offset {}",
            entry.start()
        );
        self.entries.insert(entry.start(), entry);
    }

    /// The entry a new range should merge into, if any.
    ///
    /// This is the entry with the greatest start not after `range.end()`.
    /// A neighbour starting exactly at `range.end()` that does not pull in
    /// its heading whitespace is skipped in favour of the entry before it.
    fn merge_target(&self, range: TextRange) -> Option<FormatRange> {
        let floor = self.floor_entry(range.end())?;
        if floor.start() == range.end() && !floor.process_heading_whitespace() {
            return range
                .end()
                .checked_sub(1)
                .and_then(|offset| self.floor_entry(offset));
        }
        Some(floor)
    }

    fn floor_entry(&self, offset: usize) -> Option<FormatRange> {
        self.entries
            .range(..=offset)
            .next_back()
            .map(|(_, entry)| *entry)
    }

    /// Fold every stored entry that overlaps or touches `entry` into it.
    ///
    /// The stored entry is the merge receiver so it keeps its flag on a tied
    /// start.
    fn absorb_touching(&mut self, mut entry: FormatRange) -> FormatRange {
        while let Some(start) = self
            .floor_entry(entry.end())
            .filter(|other| other.end() >= entry.start())
            .map(|other| other.start())
        {
            if let Some(other) = self.entries.remove(&start) {
                entry = other.merge(entry);
            }
        }
        entry
    }

    /// True unless some entry considers `range` writable.
    ///
    /// An empty set treats every range as read-only.
    pub fn is_read_only(&self, range: TextRange) -> bool {
        !self
            .entries
            .values()
            .any(|entry| !self.policy.is_read_only(entry, range))
    }

    /// True unless some entry considers the whitespace in `range` writable.
    pub fn is_whitespace_read_only(&self, range: TextRange) -> bool {
        !self
            .entries
            .values()
            .any(|entry| !self.policy.is_whitespace_read_only(entry, range))
    }

    /// All entries ordered by start offset.
    pub fn ranges(&self) -> Vec<FormatRange> {
        self.entries.values().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn text_ranges(&self) -> Vec<TextRange> {
        self.entries
            .values()
            .map(FormatRange::text_range)
            .collect()
    }

    /// Range from the first entry's start to the last entry's end.
    pub fn bound_range(&self) -> Option<TextRange> {
        let first = self.entries.values().next()?;
        let last = self.entries.values().next_back()?;
        Some(TextRange::new(first.start(), last.end()))
    }

    /// Whether the set covers exactly the whole document in one entry.
    pub fn is_full_reformat(&self, document: TextRange) -> bool {
        self.entries.len() == 1
            && self
                .entries
                .values()
                .next()
                .is_some_and(|entry| entry.text_range() == document)
    }

    /// Ranges a context-extending formatter should look at.
    ///
    /// Falls back to [`text_ranges`](Self::text_ranges) when none were set.
    pub fn extended_ranges(&self) -> Vec<TextRange> {
        if self.extended.is_empty() {
            self.text_ranges()
        } else {
            self.extended.clone()
        }
    }

    pub fn set_extended_ranges(&mut self, ranges: Vec<TextRange>) {
        self.extended = ranges;
    }

    pub fn is_extend_to_context(&self) -> bool {
        self.extend_to_context
    }

    pub fn set_extend_to_context(&mut self, extend: bool) {
        self.extend_to_context = extend;
    }

    /// Ranges the formatter must leave untouched (e.g. `@formatter:off` regions).
    pub fn disabled_ranges(&self) -> &[TextRange] {
        &self.disabled
    }

    pub fn set_disabled_ranges(&mut self, ranges: Vec<TextRange>) {
        self.disabled = ranges;
    }

    /// Whether some disabled range fully contains `range`.
    pub fn is_in_disabled_range(&self, range: TextRange) -> bool {
        self.disabled
            .iter()
            .any(|disabled| disabled.contains_range(range))
    }
}

impl<P: ReadOnlyPolicy + Clone> FormatRangeSet<P> {
    /// A copy holding at least one entry.
    ///
    /// An empty set becomes a single empty range at offset 0 that processes
    /// heading whitespace.
    pub fn ensure_non_empty(&self) -> Self {
        let mut copy = self.clone();
        if copy.entries.is_empty() {
            copy.entries
                .insert(0, FormatRange::new(TextRange::empty(0), true));
        }
        copy
    }
}

impl<P: ReadOnlyPolicy> RangesInfo for FormatRangeSet<P> {
    fn is_read_only(&self, range: TextRange) -> bool {
        FormatRangeSet::is_read_only(self, range)
    }

    fn is_whitespace_read_only(&self, range: TextRange) -> bool {
        FormatRangeSet::is_whitespace_read_only(self, range)
    }

    fn is_in_disabled_range(&self, range: TextRange) -> bool {
        FormatRangeSet::is_in_disabled_range(self, range)
    }

    fn text_ranges(&self) -> Vec<TextRange> {
        FormatRangeSet::text_ranges(self)
    }

    fn is_empty(&self) -> bool {
        FormatRangeSet::is_empty(self)
    }
}

impl FromIterator<TextRange> for FormatRangeSet {
    /// Collect ranges without heading whitespace processing.
    fn from_iter<I: IntoIterator<Item = TextRange>>(iter: I) -> Self {
        let mut set = FormatRangeSet::new();
        for range in iter {
            set.add(range, false);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: usize, end: usize) -> TextRange {
        TextRange::new(start, end)
    }

    fn spans(set: &FormatRangeSet) -> Vec<(usize, usize, bool)> {
        set.ranges()
            .iter()
            .map(|e| (e.start(), e.end(), e.process_heading_whitespace()))
            .collect()
    }

    /// No two entries overlap or touch.
    fn assert_maximal(set: &FormatRangeSet) {
        let ranges = set.ranges();
        for pair in ranges.windows(2) {
            assert!(
                pair[0].end() < pair[1].start(),
                "unmerged entries {} and {}",
                pair[0].text_range(),
                pair[1].text_range()
            );
        }
    }

    #[test]
    fn empty_range_is_ignored() {
        let mut set = FormatRangeSet::new();
        set.add(r(5, 5), true);
        assert!(set.is_empty());
    }

    #[test]
    fn overlapping_ranges_merge() {
        let mut set = FormatRangeSet::new();
        set.add(r(10, 20), false);
        set.add(r(15, 25), false);
        assert_eq!(spans(&set), vec![(10, 25, false)]);
    }

    #[test]
    fn adjacent_ranges_merge_with_earlier_flag() {
        let mut set = FormatRangeSet::new();
        set.add(r(0, 10), true);
        set.add(r(10, 20), false);
        assert_eq!(spans(&set), vec![(0, 20, true)]);
    }

    #[test]
    fn adjacent_ranges_merge_in_reverse_order() {
        let mut set = FormatRangeSet::new();
        set.add(r(10, 20), false);
        set.add(r(0, 10), true);
        assert_eq!(spans(&set), vec![(0, 20, true)]);

        let mut set = FormatRangeSet::new();
        set.add(r(10, 20), true);
        set.add(r(0, 10), false);
        assert_eq!(spans(&set), vec![(0, 20, false)]);
    }

    #[test]
    fn subsumed_range_keeps_outer_entry() {
        let mut set = FormatRangeSet::new();
        set.add(r(0, 100), false);
        set.add(r(20, 30), true);
        assert_eq!(spans(&set), vec![(0, 100, false)]);
    }

    #[test]
    fn disjoint_ranges_stay_apart() {
        let mut set = FormatRangeSet::new();
        set.add(r(30, 40), false);
        set.add(r(0, 10), true);
        set.add(r(12, 20), false);
        assert_eq!(
            spans(&set),
            vec![(0, 10, true), (12, 20, false), (30, 40, false)]
        );
    }

    #[test]
    fn spanning_range_collapses_several_entries() {
        let mut set = FormatRangeSet::new();
        set.add(r(0, 5), true);
        set.add(r(10, 15), false);
        set.add(r(20, 25), false);
        set.add(r(40, 45), false);
        set.add(r(3, 22), false);
        assert_eq!(spans(&set), vec![(0, 25, true), (40, 45, false)]);
        assert_maximal(&set);
    }

    #[test]
    fn insertion_is_idempotent() {
        let mut once = FormatRangeSet::new();
        once.add(r(4, 9), true);

        let mut twice = FormatRangeSet::new();
        twice.add(r(4, 9), true);
        twice.add(r(4, 9), true);

        assert_eq!(spans(&once), spans(&twice));
    }

    #[test]
    fn same_start_keeps_stored_flag() {
        let mut set = FormatRangeSet::new();
        set.add(r(0, 10), false);
        set.add(r(0, 20), true);
        assert_eq!(spans(&set), vec![(0, 20, false)]);
    }

    #[test]
    fn same_start_keeps_stored_flag_across_several_entries() {
        let mut alone = FormatRangeSet::new();
        alone.add(r(0, 3), false);
        alone.add(r(0, 25), true);

        let mut with_neighbour = FormatRangeSet::new();
        with_neighbour.add(r(0, 3), false);
        with_neighbour.add(r(10, 20), false);
        with_neighbour.add(r(0, 25), true);

        assert_eq!(spans(&alone), vec![(0, 25, false)]);
        assert_eq!(spans(&with_neighbour), vec![(0, 25, false)]);
    }

    #[test]
    fn merge_maximality_for_mixed_sequence() {
        let inserts = [
            (50, 60),
            (0, 3),
            (7, 12),
            (3, 4),
            (58, 70),
            (90, 95),
            (12, 12),
            (30, 31),
            (4, 7),
            (71, 89),
            (89, 90),
            (31, 50),
        ];
        let mut set = FormatRangeSet::new();
        for (i, (start, end)) in inserts.into_iter().enumerate() {
            set.add(r(start, end), i % 2 == 0);
            assert_maximal(&set);
        }
        assert_eq!(set.text_ranges(), vec![r(0, 12), r(30, 70), r(71, 95)]);
    }

    #[test]
    fn empty_set_is_read_only_everywhere() {
        let set = FormatRangeSet::new();
        assert!(set.is_read_only(r(5, 8)));
        assert!(set.is_read_only(r(0, 0)));
        assert!(set.is_whitespace_read_only(r(5, 8)));
    }

    #[test]
    fn read_only_requires_every_entry_to_agree() {
        let mut set = FormatRangeSet::new();
        set.add(r(10, 20), false);
        set.add(r(40, 50), false);

        assert!(!set.is_read_only(r(12, 14)));
        assert!(!set.is_read_only(r(45, 60)));
        assert!(set.is_read_only(r(25, 35)));
        assert!(set.is_read_only(r(0, 5)));
    }

    #[test]
    fn whitespace_read_only_honours_heading_flag() {
        let mut set = FormatRangeSet::new();
        set.add(r(10, 20), true);
        set.add(r(40, 50), false);

        assert!(!set.is_whitespace_read_only(r(8, 10)));
        assert!(set.is_whitespace_read_only(r(38, 40)));
        assert!(!set.is_whitespace_read_only(r(41, 42)));
    }

    #[test]
    fn injected_policy_is_consulted() {
        #[derive(Clone)]
        struct NothingWritable;

        impl ReadOnlyPolicy for NothingWritable {
            fn is_read_only(&self, _: &FormatRange, _: TextRange) -> bool {
                true
            }

            fn is_whitespace_read_only(&self, _: &FormatRange, _: TextRange) -> bool {
                true
            }
        }

        let mut set = FormatRangeSet::with_policy(NothingWritable);
        set.add(r(0, 100), false);
        assert!(set.is_read_only(r(10, 20)));
        assert!(set.is_whitespace_read_only(r(10, 20)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn bound_and_full_reformat() {
        let mut set = FormatRangeSet::new();
        assert_eq!(set.bound_range(), None);

        set.add(r(5, 10), false);
        set.add(r(30, 40), false);
        assert_eq!(set.bound_range(), Some(r(5, 40)));
        assert!(!set.is_full_reformat(r(0, 40)));

        let whole = FormatRangeSet::with_range(r(0, 40), true);
        assert!(whole.is_full_reformat(r(0, 40)));
    }

    #[test]
    fn ensure_non_empty_adds_placeholder() {
        let set = FormatRangeSet::new().ensure_non_empty();
        assert_eq!(spans(&set), vec![(0, 0, true)]);

        let seeded = FormatRangeSet::with_range(r(3, 4), false).ensure_non_empty();
        assert_eq!(spans(&seeded), vec![(3, 4, false)]);
    }

    #[test]
    fn extended_ranges_fall_back_to_text_ranges() {
        let mut set: FormatRangeSet = [r(0, 5), r(8, 9)].into_iter().collect();
        assert_eq!(set.extended_ranges(), vec![r(0, 5), r(8, 9)]);

        set.set_extended_ranges(vec![r(0, 20)]);
        set.set_extend_to_context(true);
        assert_eq!(set.extended_ranges(), vec![r(0, 20)]);
        assert!(set.is_extend_to_context());
    }

    #[test]
    fn disabled_range_containment() {
        let mut set = FormatRangeSet::with_range(r(0, 100), false);
        set.set_disabled_ranges(vec![r(20, 40)]);

        assert!(set.is_in_disabled_range(r(25, 30)));
        assert!(set.is_in_disabled_range(r(20, 40)));
        assert!(!set.is_in_disabled_range(r(35, 45)));
        assert!(!set.is_read_only(r(25, 30)));
    }
}
