//! Format ranges and the set that keeps them merged.
//!
//! This module provides:
//! - `TextRange`, a half-open byte range
//! - `FormatRange`, one scheduled range plus its heading-whitespace flag
//! - `FormatRangeSet`, the merge-on-insert collection answering read-only queries

mod entry;
mod set;
mod text;

pub use entry::{BoundaryPolicy, FormatRange, ReadOnlyPolicy};
pub use set::{FormatRangeSet, RangesInfo};
pub use text::TextRange;
