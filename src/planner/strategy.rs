//! Sub-range partitioning for a single cut request

use tracing::debug;

use crate::domain::model::{CutRequest, MediaProfile, SubRange};
use crate::planner::SplitPoints;

/// Splits cut requests into the shortest possible re-encode edges around a
/// stream-copied middle
pub struct CutPlanner;

impl CutPlanner {
    /// Create a new cut planner
    pub fn new() -> Self {
        Self
    }

    /// Partition `request` into ordered, gapless sub-ranges.
    ///
    /// The leading piece runs from the requested start to the first split
    /// point, the trailing piece from the last split point to the requested
    /// end. Both are re-encoded; everything between is copied. When no split
    /// point lies inside the request the whole range is re-encoded.
    pub fn plan(&self, profile: &MediaProfile, request: &CutRequest) -> Vec<SubRange> {
        let points = SplitPoints::new(profile);
        let (start, end) = (request.start, request.end);

        let first = points.first_at_or_after(start).filter(|p| *p <= end);
        let last = points.last_at_or_before(end).filter(|p| *p >= start);

        let (first, last) = match (first, last) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                debug!(%start, %end, "no split point inside the request, re-encoding all of it");
                return vec![SubRange::reencode(start, end)];
            }
        };

        let mut ranges = Vec::with_capacity(3);
        if start < first {
            ranges.push(SubRange::reencode(start, first));
        }
        if first < last {
            ranges.push(SubRange::copy(first, last));
        }
        if last < end {
            ranges.push(SubRange::reencode(last, end));
        }

        debug!(
            %start,
            %end,
            pieces = ranges.len(),
            "partitioned request: {}",
            ranges
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        ranges
    }
}

impl Default for CutPlanner {
    fn default() -> Self {
        Self::new()
    }
}
