//! Anomaly ordering and capping.
//!
//! Recency is the display order: most recent event first, truncated to a
//! configurable maximum. Severity-based reordering is deliberately left to
//! callers via the event's `severity` field.

use crate::model::AnomalyEvent;

/// Default maximum number of events returned by a detection run.
pub const DEFAULT_MAX_RESULTS: usize = 6;

/// Order events descending by date and cap the result.
pub fn rank(mut events: Vec<AnomalyEvent>, max_results: usize) -> Vec<AnomalyEvent> {
    events.sort_by(|a, b| b.date.cmp(&a.date));
    events.truncate(max_results);
    events
}
