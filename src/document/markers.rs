//! Formatter on/off markers.
//!
//! Text between an off marker (`@formatter:off` by default) and the next on
//! marker is excluded from formatting. An off marker without a matching on
//! marker disables the rest of the document.

use regex::{Match, Regex};
use thiserror::Error;

use crate::range::TextRange;
use crate::settings::MarkerSettings;

#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("invalid formatter marker pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("formatter marker pattern '{0}' matches empty text")]
    MatchesEmpty(String),
}

/// Find the ranges disabled by formatter markers in `source`.
///
/// Each range starts at an off marker and ends after the next on marker.
/// Off markers inside a disabled range are ignored.
pub fn disabled_ranges(
    source: &str,
    settings: &MarkerSettings,
) -> Result<Vec<TextRange>, MarkerError> {
    if !settings.enabled {
        return Ok(Vec::new());
    }

    let off = tag_pattern(&settings.off_tag, settings.accept_regexp)?;
    let on = tag_pattern(&settings.on_tag, settings.accept_regexp)?;

    let mut ranges = Vec::new();
    let mut cursor = 0;
    while let Some(off_match) = off.find_at(source, cursor) {
        let off_match = non_empty(off_match, &settings.off_tag)?;
        match on.find_at(source, off_match.end()) {
            Some(on_match) => {
                let on_match = non_empty(on_match, &settings.on_tag)?;
                ranges.push(TextRange::new(off_match.start(), on_match.end()));
                cursor = on_match.end();
            }
            None => {
                ranges.push(TextRange::new(off_match.start(), source.len()));
                break;
            }
        }
    }

    Ok(ranges)
}

fn tag_pattern(tag: &str, accept_regexp: bool) -> Result<Regex, MarkerError> {
    let pattern = if accept_regexp {
        tag.to_string()
    } else {
        regex::escape(tag)
    };

    let regex = Regex::new(&pattern).map_err(|source| MarkerError::InvalidPattern {
        pattern: tag.to_string(),
        source,
    })?;

    if regex.is_match("") {
        return Err(MarkerError::MatchesEmpty(tag.to_string()));
    }
    Ok(regex)
}

/// Reject zero-width matches such as `\b` or `(?m)^`; they never advance the scan.
fn non_empty<'s>(found: Match<'s>, tag: &str) -> Result<Match<'s>, MarkerError> {
    if found.start() == found.end() {
        return Err(MarkerError::MatchesEmpty(tag.to_string()));
    }
    Ok(found)
}
