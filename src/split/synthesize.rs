//! Synthesis of split documents from a second classification pass.
//!
//! The segment map is computed on the first pass, while synthesis runs against
//! a snapshot re-classified by an independent machine pass. The two are joined
//! only by group key and submission page number: every segment keeps the pages
//! of the second-pass document it still overlaps, and segments that no longer
//! overlap anything are dropped. This boundary is lossy by nature.

use super::segment::{GroupKey, SegmentMap};
use crate::model::{Page, SplitDocument, Submission};
use serde::{Deserialize, Serialize};

/// Statistics collected while synthesizing split documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisStats {
    /// Documents of the second pass examined
    pub documents_seen: usize,

    /// Documents whose group has no segments
    pub documents_unmatched: usize,

    /// Split documents emitted
    pub documents_emitted: usize,

    /// Segments that matched no page of their document
    pub segments_dropped: usize,
}

/// Carve the documents of a second-pass submission along the segment map.
pub fn synthesize(submission: &Submission, segments: &SegmentMap) -> Vec<SplitDocument> {
    synthesize_with_stats(submission, segments).0
}

/// Carve the documents of a second-pass submission and collect statistics.
pub fn synthesize_with_stats(
    submission: &Submission,
    segments: &SegmentMap,
) -> (Vec<SplitDocument>, SynthesisStats) {
    let mut documents = Vec::new();
    let mut stats = SynthesisStats::default();

    for document in &submission.documents {
        stats.documents_seen += 1;

        let Some(key) = GroupKey::for_document(document) else {
            continue;
        };
        let Some(group) = segments.get(&key) else {
            log::debug!("No segments for document group {}", key);
            stats.documents_unmatched += 1;
            continue;
        };

        let mut pages: Vec<&Page> = document.pages.iter().collect();
        pages.sort_by_key(|p| p.submission_page_number);

        for segment in group {
            let page_ids: Vec<u64> = pages
                .iter()
                .filter(|p| segment.contains(p.submission_page_number))
                .map(|p| p.id)
                .collect();

            if page_ids.is_empty() {
                log::debug!(
                    "Segment {}-{} of {} matches no page, dropped",
                    segment.start(),
                    segment.end(),
                    key
                );
                stats.segments_dropped += 1;
                continue;
            }

            documents.push(SplitDocument::new(
                document.layout_version_uuid.as_str(),
                page_ids,
            ));
        }
    }

    stats.documents_emitted = documents.len();
    (documents, stats)
}
