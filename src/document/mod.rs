//! Document text utilities.
//!
//! This module provides:
//! - `LineIndex` for byte offset <-> LSP position conversion
//! - Formatter marker scanning producing disabled ranges

mod markers;
mod text;

pub use markers::{disabled_ranges, MarkerError};
pub use text::LineIndex;
