//! Loops stepping a [`RangeExpansionWalker`] on behalf of a host.

use log::debug;

use crate::range::ReadOnlyPolicy;

use super::RangeExpansionWalker;

/// Tuning for [`drive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveOptions {
    /// Steps taken between yields to the async scheduler. Zero is treated as one.
    pub steps_per_yield: usize,
}

impl Default for DriveOptions {
    fn default() -> Self {
        Self {
            steps_per_yield: 256,
        }
    }
}

/// How a driven walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// The walk finished and its extra ranges were folded into the set.
    Completed { steps: usize },
    /// The walk was abandoned; the set was not modified.
    Cancelled { steps: usize },
}

/// Step `walker` until it is done. Returns the number of steps taken.
pub fn run_to_completion<P: ReadOnlyPolicy>(walker: &mut RangeExpansionWalker<'_, P>) -> usize {
    let mut steps = 0;
    while !walker.is_done() {
        walker.step();
        steps += 1;
    }
    steps
}

/// Step `walker` cooperatively on the current tokio runtime.
///
/// `is_cancelled` is checked before every step. Once it returns `true` the
/// walk stops and the collected extra ranges are dropped.
pub async fn drive<P, F>(
    walker: &mut RangeExpansionWalker<'_, P>,
    options: DriveOptions,
    is_cancelled: F,
) -> DriveOutcome
where
    P: ReadOnlyPolicy,
    F: Fn() -> bool,
{
    let steps_per_yield = options.steps_per_yield.max(1);
    let mut steps = 0;

    while !walker.is_done() {
        if is_cancelled() {
            debug!(
                "range expansion cancelled after {} steps, dropping {} pending ranges",
                steps,
                walker.pending().len()
            );
            return DriveOutcome::Cancelled { steps };
        }

        walker.step();
        steps += 1;

        if steps % steps_per_yield == 0 {
            tokio::task::yield_now().await;
        }
    }

    DriveOutcome::Completed { steps }
}
