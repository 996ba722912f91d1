//! Gap reconciliation between segments of a group.
//!
//! Pages can fall between segments when an identifier was not found on them
//! or when they were left out of every segment. Reconciliation folds every such
//! page into the segment that precedes it, so each group covers one contiguous
//! run of submission pages:
//!
//! 1. holes inside a segment are absorbed by that segment;
//! 2. a gap before the next segment is absorbed by the earlier segment;
//! 3. the last segment is extended up to its trailing boundary.
//!
//! A run of more than 10 000 missing pages points at a corrupt page number
//! and is logged and left unfilled.

use super::segment::{Segment, SegmentMap};

/// Largest run of missing pages a single fill may add.
const MAX_FILL_PAGES: u32 = 10_000;

/// Reconcile every group of a segment map, returning the number of pages filled.
pub fn reconcile(map: &mut SegmentMap) -> usize {
    map.groups_mut()
        .map(|segments| reconcile_group(segments))
        .sum()
}

/// Reconcile the segments of one group, returning the number of pages filled.
///
/// Segments must be in document order.
pub fn reconcile_group(segments: &mut [Segment]) -> usize {
    let mut filled = 0;

    for index in 0..segments.len() {
        filled += fill_internal_gaps(&mut segments[index]);

        let boundary = match segments.get(index + 1) {
            Some(next) => next.start().saturating_sub(1),
            None => segments[index].trailing_boundary(),
        };
        filled += extend_to(&mut segments[index], boundary);
    }

    filled
}

fn fill_internal_gaps(segment: &mut Segment) -> usize {
    segment.pages.sort_unstable();
    segment.pages.dedup();

    let (Some(&first), Some(&last)) = (segment.pages.first(), segment.pages.last()) else {
        return 0;
    };
    let before = segment.pages.len();
    let mut filled = Vec::with_capacity(before);
    for pair in segment.pages.windows(2) {
        let (low, high) = (pair[0], pair[1]);
        filled.push(low);
        if fillable(low, high) {
            filled.extend(low + 1..high);
        }
    }
    filled.push(last);

    segment.pages = filled;
    segment.first_page = first;
    segment.last_page = last;
    segment.pages.len() - before
}

fn extend_to(segment: &mut Segment, boundary: u32) -> usize {
    let end = segment.end();
    if boundary <= end || !fillable(end, boundary.saturating_add(1)) {
        return 0;
    }
    segment.pages.extend(end + 1..=boundary);
    segment.last_page = boundary;
    (boundary - end) as usize
}

/// Check whether the pages strictly between `low` and `high` may be filled.
fn fillable(low: u32, high: u32) -> bool {
    let gap = high.saturating_sub(low).saturating_sub(1);
    if gap > MAX_FILL_PAGES {
        log::warn!(
            "Not filling {} page(s) between pages {} and {}: gap exceeds {} pages",
            gap,
            low,
            high,
            MAX_FILL_PAGES
        );
        return false;
    }
    true
}
