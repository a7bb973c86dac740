//! Format range planning.
//!
//! Given a document's block tree and the ranges a caller asked to format,
//! computes the merged set of ranges to reformat, including the extra ranges
//! blocks report for embedded content, and skipping subtrees the request
//! leaves read-only.

use log::{debug, warn};
use tower_lsp::lsp_types::Range;

mod block;
mod document;
mod range;
pub(crate) mod settings;

pub use block::{
    drive, run_to_completion, Block, DriveOptions, DriveOutcome, RangeExpansionWalker, SimpleBlock,
};
pub use document::{disabled_ranges, LineIndex, MarkerError};
pub use range::{
    BoundaryPolicy, FormatRange, FormatRangeSet, RangesInfo, ReadOnlyPolicy, TextRange,
};
pub use settings::{
    discover_settings, load_settings, try_load_settings, FormatSettings, MarkerSettings,
    Settings, SettingsError,
};

/// What the caller asked to format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatRequest {
    /// The whole document.
    Document,
    /// Byte ranges of the document.
    Ranges(Vec<TextRange>),
    /// Editor selections in LSP coordinates.
    Selections(Vec<Range>),
}

/// Build the format plan for `request` over the tree rooted at `root`.
///
/// Requested ranges are seeded into a fresh set, formatter markers in
/// `source` become disabled ranges, and the extra ranges reported by the
/// blocks are folded in.
pub fn plan_format_ranges(
    root: &dyn Block,
    request: &FormatRequest,
    source: &str,
    settings: &FormatSettings,
) -> Result<FormatRangeSet, MarkerError> {
    let mut ranges = seed_ranges(request, source, settings)?;

    let mut walker = RangeExpansionWalker::new(root, &mut ranges);
    let steps = run_to_completion(&mut walker);

    debug!(
        "planned {} format ranges in {} steps",
        ranges.len(),
        steps
    );
    Ok(ranges)
}

/// Like [`plan_format_ranges`], but drives the walk cooperatively.
///
/// Returns `Ok(None)` when `is_cancelled` stopped the walk.
pub async fn plan_format_ranges_async<F>(
    root: &dyn Block,
    request: &FormatRequest,
    source: &str,
    settings: &FormatSettings,
    is_cancelled: F,
) -> Result<Option<FormatRangeSet>, MarkerError>
where
    F: Fn() -> bool,
{
    let mut ranges = seed_ranges(request, source, settings)?;

    let mut walker = RangeExpansionWalker::new(root, &mut ranges);
    match drive(&mut walker, settings.drive_options(), is_cancelled).await {
        DriveOutcome::Completed { steps } => {
            debug!(
                "planned {} format ranges in {} steps",
                ranges.len(),
                steps
            );
            Ok(Some(ranges))
        }
        DriveOutcome::Cancelled { .. } => Ok(None),
    }
}

fn seed_ranges(
    request: &FormatRequest,
    source: &str,
    settings: &FormatSettings,
) -> Result<FormatRangeSet, MarkerError> {
    let heading = settings.process_heading_whitespace;
    let mut ranges = FormatRangeSet::new();

    match request {
        FormatRequest::Document => ranges.add(TextRange::new(0, source.len()), heading),
        FormatRequest::Ranges(requested) => {
            for range in requested {
                if range.end() > source.len() {
                    warn!("ignoring format range {} past end of document", range);
                    continue;
                }
                ranges.add(*range, heading);
            }
        }
        FormatRequest::Selections(selections) => {
            let index = LineIndex::new(source.to_string());
            for selection in selections {
                match index.range_to_text_range(*selection) {
                    Some(range) => ranges.add(range, heading),
                    None => warn!("ignoring selection {:?} outside the document", selection),
                }
            }
        }
    }

    ranges.set_disabled_ranges(disabled_ranges(source, &settings.markers)?);
    Ok(ranges)
}
