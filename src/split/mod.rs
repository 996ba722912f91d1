//! Document splitting: segmentation, reconciliation, directives and synthesis.
//!
//! The segment map is built once from the first-pass snapshot
//! ([`plan`] = [`segment`] followed by [`reconcile`]) and then read by two
//! independent consumers: [`assign_directives`] gates human review before the
//! split, and [`synthesize`] carves the second-pass snapshot into
//! [`SplitDocument`](crate::model::SplitDocument)s.

mod directives;
mod reconcile;
mod segment;
mod segmenter;
mod synthesize;

pub use directives::{assign_directives, assign_post_split_directives};
pub use reconcile::{reconcile, reconcile_group};
pub use segment::{GroupKey, Segment, SegmentMap};
pub use segmenter::{segment, segment_with_stats};
pub use synthesize::{synthesize, synthesize_with_stats, SynthesisStats};

use crate::config::LayoutSplitConfig;
use crate::model::Submission;
use serde::{Deserialize, Serialize};

/// Statistics collected while planning segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    /// Documents examined
    pub documents_seen: usize,

    /// Documents skipped because they have no pages
    pub documents_skipped: usize,

    /// Field-tracked documents whose identifier never occurred
    pub documents_unresolved: usize,

    /// Segments produced
    pub segments: usize,

    /// Segment groups produced
    pub groups: usize,

    /// Pages added to segments by reconciliation
    pub pages_filled: usize,
}

/// Segment a submission and reconcile the gaps between segments.
pub fn plan(submission: &Submission, config: &LayoutSplitConfig) -> SegmentMap {
    plan_with_stats(submission, config).0
}

/// Segment and reconcile a submission, collecting statistics.
pub fn plan_with_stats(
    submission: &Submission,
    config: &LayoutSplitConfig,
) -> (SegmentMap, SegmentStats) {
    let (mut map, mut stats) = segment_with_stats(submission, config);
    stats.pages_filled = reconcile(&mut map);
    (map, stats)
}
