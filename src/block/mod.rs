//! Block trees and the range expansion walk over them.
//!
//! This module provides:
//! - `Block`, the capability set a host's block tree exposes
//! - `SimpleBlock`, an owned block tree for hosts without their own node type
//! - `RangeExpansionWalker`, a resumable walk collecting extra ranges
//! - Driver loops stepping a walker to completion or cancellation

mod driver;
mod tree;
mod walker;

pub use driver::{drive, run_to_completion, DriveOptions, DriveOutcome};
pub use tree::SimpleBlock;
pub use walker::RangeExpansionWalker;

use crate::range::{RangesInfo, TextRange};

/// A node of the host's formatting block tree.
pub trait Block {
    /// The document range this block covers.
    fn range(&self) -> TextRange;

    /// Child blocks in document order. Empty for leaves.
    fn children(&self) -> Vec<&dyn Block>;

    /// Ranges this block wants formatted on their own, such as embedded
    /// sub-languages.
    ///
    /// The ranges passed in are the plan as it stood when the walk started.
    /// Blocks without such ranges return `None`.
    fn extra_ranges(&self, _ranges: &dyn RangesInfo) -> Option<Vec<TextRange>> {
        None
    }
}
