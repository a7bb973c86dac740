//! Resumable collection of extra format ranges from a block tree.

use log::{debug, trace};

use crate::range::{FormatRangeSet, ReadOnlyPolicy, TextRange};

use super::Block;

/// Walks a block tree one block per [`step`](Self::step), collecting the
/// extra ranges blocks report and folding them into the range set once the
/// walk is over.
///
/// The traversal uses an explicit stack so a driver can stop between any two
/// steps. Subtrees whose range is read-only are never entered. The range set
/// is only written by the final step, so a walker dropped early leaves it as
/// it was.
pub struct RangeExpansionWalker<'a, P: ReadOnlyPolicy> {
    ranges: &'a mut FormatRangeSet<P>,
    stack: Vec<&'a dyn Block>,
    pending: Vec<TextRange>,
    visited: usize,
}

impl<'a, P: ReadOnlyPolicy> RangeExpansionWalker<'a, P> {
    /// Start a walk at `root`. The root is visited even when read-only.
    pub fn new(root: &'a dyn Block, ranges: &'a mut FormatRangeSet<P>) -> Self {
        Self {
            ranges,
            stack: vec![root],
            pending: Vec::new(),
            visited: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    /// Visit the next block. Does nothing once the walk is done.
    pub fn step(&mut self) {
        let Some(block) = self.stack.pop() else {
            return;
        };
        self.visited += 1;

        let range = block.range();
        let read_only = self.ranges.is_read_only(range);
        trace!("visiting block {} (read-only: {})", range, read_only);

        self.collect_extra_ranges(block);

        if !read_only {
            // Reversed so children pop in document order.
            for child in block.children().into_iter().rev() {
                if !self.ranges.is_read_only(child.range()) {
                    self.stack.push(child);
                }
            }
        }

        if self.stack.is_empty() {
            self.finish();
        }
    }

    /// Extra ranges collected so far and not yet folded into the set.
    pub fn pending(&self) -> &[TextRange] {
        &self.pending
    }

    /// Number of blocks visited so far.
    pub fn visited(&self) -> usize {
        self.visited
    }

    fn collect_extra_ranges(&mut self, block: &dyn Block) {
        if let Some(extra) = block.extra_ranges(&*self.ranges) {
            self.pending.extend(extra);
        }
    }

    fn finish(&mut self) {
        let folded = self.pending.len();
        for range in self.pending.drain(..) {
            self.ranges.add(range, false);
        }
        debug!(
            "range expansion finished: visited {} blocks, folded {} extra ranges, {} ranges planned",
            self.visited,
            folded,
            self.ranges.len()
        );
    }
}
