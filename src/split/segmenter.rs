//! Segmentation of classified documents into candidate sub-documents.

use super::segment::{GroupKey, PageCounts, Segment, SegmentMap};
use super::SegmentStats;
use crate::config::{LayoutSplitConfig, SplitPolicy};
use crate::model::{Document, Submission};
use std::num::NonZeroU32;

/// Segment every document of a submission according to its layout policy.
///
/// The result is not reconciled yet; see [`super::reconcile`].
pub fn segment(submission: &Submission, config: &LayoutSplitConfig) -> SegmentMap {
    segment_with_stats(submission, config).0
}

/// Segment a submission and collect statistics.
pub fn segment_with_stats(
    submission: &Submission,
    config: &LayoutSplitConfig,
) -> (SegmentMap, SegmentStats) {
    let mut map = SegmentMap::new();
    let mut stats = SegmentStats::default();
    let mut submission_pages = 0u32;

    for document in &submission.documents {
        stats.documents_seen += 1;

        let Some(key) = GroupKey::for_document(document) else {
            log::debug!("Skipping document of layout {} without pages", document.layout_uuid);
            stats.documents_skipped += 1;
            continue;
        };

        submission_pages += document.num_pages();
        let counts = PageCounts {
            combined_pages: document.num_pages(),
            submission_pages,
            document_last_page: document.last_submission_page().unwrap_or(0),
        };

        let segments = match config.policy_for(&document.layout_uuid) {
            SplitPolicy::FieldTracking(field) => split_by_field(document, field, counts),
            SplitPolicy::FixedCount(size) => split_by_count(document, *size, counts),
            SplitPolicy::NoSplit => whole_document(document, counts).into_iter().collect(),
        };

        if segments.is_empty() {
            log::warn!(
                "Document {} of layout {} produced no segments",
                key,
                config
                    .layout_name(&document.layout_uuid)
                    .unwrap_or(&document.layout_uuid)
            );
            stats.documents_unresolved += 1;
            continue;
        }

        log::debug!("Document {} split into {} segment(s)", key, segments.len());
        stats.segments += segments.len();
        map.extend_group(key, segments);
    }

    stats.groups = map.len();
    (map, stats)
}

/// Tracking state while walking identifier occurrences.
enum Tracker {
    Idle,
    Open {
        value: Option<String>,
        pages: Vec<u32>,
    },
}

impl Tracker {
    /// Feed one occurrence, pushing a closed segment on a value change.
    ///
    /// Losing the value counts as a change: the valueless occurrence opens a
    /// new segment, which adopts the next value seen.
    fn advance(
        self,
        page: u32,
        value: Option<&str>,
        counts: PageCounts,
        closed: &mut Vec<Segment>,
    ) -> Self {
        match self {
            Tracker::Idle => Tracker::Open {
                value: value.map(str::to_owned),
                pages: vec![page],
            },
            Tracker::Open {
                value: None,
                mut pages,
            } => {
                pages.push(page);
                Tracker::Open {
                    value: value.map(str::to_owned),
                    pages,
                }
            }
            Tracker::Open {
                value: Some(current),
                mut pages,
            } if value == Some(current.as_str()) => {
                pages.push(page);
                Tracker::Open {
                    value: Some(current),
                    pages,
                }
            }
            Tracker::Open {
                value: Some(current),
                pages,
            } => {
                closed.extend(Segment::close(Some(current), pages, counts));
                Tracker::Open {
                    value: value.map(str::to_owned),
                    pages: vec![page],
                }
            }
        }
    }

    fn finish(self, counts: PageCounts, closed: &mut Vec<Segment>) {
        if let Tracker::Open { value, pages } = self {
            closed.extend(Segment::close(value, pages, counts));
        }
    }
}

/// Start a new segment whenever the identifier field changes value.
fn split_by_field(document: &Document, field: &str, counts: PageCounts) -> Vec<Segment> {
    let mut occurrences: Vec<(u32, Option<&str>)> = document
        .fields_named(field)
        .filter_map(|occurrence| {
            let page = document.submission_page_for(occurrence.page_number);
            if page.is_none() {
                log::warn!(
                    "Field '{}' refers to page {} which is not part of the document",
                    field,
                    occurrence.page_number
                );
            }
            page.map(|page| {
                let value = occurrence.canonical_value().filter(|v| !v.is_empty());
                (page, value)
            })
        })
        .collect();
    occurrences.sort_by_key(|(page, _)| *page);

    let mut segments = Vec::new();
    let tracker = occurrences
        .into_iter()
        .fold(Tracker::Idle, |tracker, (page, value)| {
            tracker.advance(page, value, counts, &mut segments)
        });
    tracker.finish(counts, &mut segments);
    segments
}

/// Cut the pages into chunks of `size`; the remainder forms the last chunk.
fn split_by_count(document: &Document, size: NonZeroU32, counts: PageCounts) -> Vec<Segment> {
    document
        .submission_pages()
        .chunks(size.get() as usize)
        .filter_map(|chunk| Segment::close(None, chunk.to_vec(), counts))
        .collect()
}

fn whole_document(document: &Document, counts: PageCounts) -> Option<Segment> {
    Segment::close(None, document.submission_pages(), counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentField, Page};

    fn document(layout: &str, first_page: u32, count: u32) -> Document {
        let mut doc = Document::new(layout, format!("{}-v1", layout));
        for offset in 0..count {
            let page = first_page + offset;
            doc.add_page(Page::new(u64::from(page) * 10, page, offset + 1, "file"));
        }
        doc
    }

    fn pages(segments: &[Segment]) -> Vec<Vec<u32>> {
        segments.iter().map(|s| s.pages.clone()).collect()
    }

    fn counts() -> PageCounts {
        PageCounts {
            combined_pages: 6,
            submission_pages: 6,
            document_last_page: 6,
        }
    }

    #[test]
    fn test_field_value_changes_are_boundaries() {
        let mut doc = document("l", 1, 6);
        for (page, value) in ["A", "A", "B", "B", "B", "A"].iter().enumerate() {
            doc.add_field(DocumentField::new("acct", page as u32 + 1).with_normalized(*value));
        }

        let segments = split_by_field(&doc, "acct", counts());
        assert_eq!(pages(&segments), vec![vec![1, 2], vec![3, 4, 5], vec![6]]);
        let values: Vec<_> = segments.iter().map(|s| s.value.as_deref()).collect();
        assert_eq!(values, vec![Some("A"), Some("B"), Some("A")]);
        assert_eq!(segments[1].first_page, 3);
        assert_eq!(segments[1].last_page, 5);
    }

    #[test]
    fn test_field_occurrences_follow_page_order() {
        let mut doc = document("l", 1, 3);
        doc.add_field(DocumentField::new("acct", 3).with_transcription("B"));
        doc.add_field(DocumentField::new("acct", 1).with_transcription("A"));
        doc.add_field(DocumentField::new("acct", 2).with_transcription("A"));

        let segments = split_by_field(&doc, "acct", counts());
        assert_eq!(pages(&segments), vec![vec![1, 2], vec![3]]);
    }

    fn occurrences(doc: &mut Document, values: &[Option<&str>]) {
        for (page, value) in values.iter().enumerate() {
            let field = DocumentField::new("acct", page as u32 + 1);
            doc.add_field(match value {
                Some(value) => field.with_transcription(*value),
                None => field,
            });
        }
    }

    #[test]
    fn test_valueless_occurrence_opens_segment() {
        let mut doc = document("l", 1, 3);
        occurrences(&mut doc, &[Some("A"), None, Some("B")]);

        let segments = split_by_field(&doc, "acct", counts());
        assert_eq!(pages(&segments), vec![vec![1], vec![2, 3]]);
        let values: Vec<_> = segments.iter().map(|s| s.value.as_deref()).collect();
        assert_eq!(values, vec![Some("A"), Some("B")]);
    }

    #[test]
    fn test_value_after_valueless_occurrence_is_new_segment() {
        let mut doc = document("l", 1, 3);
        occurrences(&mut doc, &[Some("A"), None, Some("A")]);

        let segments = split_by_field(&doc, "acct", counts());
        assert_eq!(pages(&segments), vec![vec![1], vec![2, 3]]);
        let values: Vec<_> = segments.iter().map(|s| s.value.as_deref()).collect();
        assert_eq!(values, vec![Some("A"), Some("A")]);
    }

    #[test]
    fn test_leading_valueless_occurrences_adopt_value() {
        let mut doc = document("l", 1, 4);
        occurrences(&mut doc, &[None, None, Some("A"), None]);

        let segments = split_by_field(&doc, "acct", counts());
        assert_eq!(pages(&segments), vec![vec![1, 2, 3], vec![4]]);
        assert_eq!(segments[0].value.as_deref(), Some("A"));
        assert_eq!(segments[1].value, None);
    }

    #[test]
    fn test_empty_transcription_is_valueless() {
        let mut doc = document("l", 1, 3);
        occurrences(&mut doc, &[Some("A"), Some(""), Some("B")]);

        let segments = split_by_field(&doc, "acct", counts());
        assert_eq!(pages(&segments), vec![vec![1], vec![2, 3]]);
    }

    #[test]
    fn test_occurrence_on_unknown_page_is_ignored() {
        let mut doc = document("l", 1, 2);
        doc.add_field(DocumentField::new("acct", 1).with_transcription("A"));
        doc.add_field(DocumentField::new("acct", 9).with_transcription("B"));

        let segments = split_by_field(&doc, "acct", counts());
        assert_eq!(pages(&segments), vec![vec![1]]);
    }

    #[test]
    fn test_repeated_occurrence_on_one_page() {
        let mut doc = document("l", 1, 2);
        doc.add_field(DocumentField::new("acct", 1).with_transcription("A"));
        doc.add_field(DocumentField::new("acct", 1).with_transcription("A"));
        doc.add_field(DocumentField::new("acct", 2).with_transcription("A"));

        let segments = split_by_field(&doc, "acct", counts());
        assert_eq!(pages(&segments), vec![vec![1, 2]]);
    }

    #[test]
    fn test_fixed_count_chunks() {
        let doc = document("l", 1, 7);
        let size = NonZeroU32::new(3).unwrap();
        let segments = split_by_count(&doc, size, counts());
        assert_eq!(pages(&segments), vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
        assert!(segments.iter().all(|s| s.value.is_none()));
    }

    #[test]
    fn test_fixed_count_exact_multiple() {
        let doc = document("l", 4, 4);
        let size = NonZeroU32::new(2).unwrap();
        let segments = split_by_count(&doc, size, counts());
        assert_eq!(pages(&segments), vec![vec![4, 5], vec![6, 7]]);
    }

    #[test]
    fn test_fixed_count_single_page() {
        let doc = document("l", 1, 1);
        let size = NonZeroU32::new(3).unwrap();
        assert_eq!(pages(&split_by_count(&doc, size, counts())), vec![vec![1]]);
    }

    #[test]
    fn test_running_submission_pages() {
        let mut submission = Submission::new(1);
        submission.add_document(document("a", 1, 2));
        submission.add_document(Document::new("empty", "empty-v1"));
        submission.add_document(document("b", 3, 3));

        let (map, stats) = segment_with_stats(&submission, &LayoutSplitConfig::new());
        let b = map.get(&GroupKey::new("b", "file")).unwrap();
        assert_eq!(b[0].combined_pages, 3);
        assert_eq!(b[0].submission_pages, 5);
        assert_eq!(stats.documents_seen, 3);
        assert_eq!(stats.documents_skipped, 1);
        assert_eq!(stats.segments, 2);
        assert_eq!(stats.groups, 2);
    }
}
