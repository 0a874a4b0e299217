//! Phase 6: Ranked report selection.
//!
//! Truncates the sorted summary table to the worst `top_n` entities.
//! A table shorter than `top_n` is returned whole, never an error.

use fraudscope_core::report::EntitySummary;

/// Keep the first `top_n` rows of an already-sorted summary table.
pub fn select_top(mut summaries: Vec<EntitySummary>, top_n: usize) -> Vec<EntitySummary> {
    summaries.truncate(top_n);
    summaries
}
