//! An owned block tree.

use crate::range::{RangesInfo, TextRange};

use super::Block;

/// A block with owned children and a fixed list of extra ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleBlock {
    range: TextRange,
    children: Vec<SimpleBlock>,
    extra_ranges: Option<Vec<TextRange>>,
}

impl SimpleBlock {
    pub fn leaf(range: TextRange) -> Self {
        Self {
            range,
            children: Vec::new(),
            extra_ranges: None,
        }
    }

    pub fn composite(range: TextRange, children: Vec<SimpleBlock>) -> Self {
        Self {
            range,
            children,
            extra_ranges: None,
        }
    }

    /// Attach ranges this block reports for independent formatting.
    pub fn with_extra_ranges(mut self, ranges: Vec<TextRange>) -> Self {
        self.extra_ranges = Some(ranges);
        self
    }

    pub fn push_child(&mut self, child: SimpleBlock) {
        self.children.push(child);
    }
}

impl Block for SimpleBlock {
    fn range(&self) -> TextRange {
        self.range
    }

    fn children(&self) -> Vec<&dyn Block> {
        self.children
            .iter()
            .map(|child| child as &dyn Block)
            .collect()
    }

    fn extra_ranges(&self, _ranges: &dyn RangesInfo) -> Option<Vec<TextRange>> {
        self.extra_ranges.clone()
    }
}
