//! Integration tests for segmentation, reconciliation and synthesis.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use docsplit::model::DocumentField;
use docsplit::{
    plan, plan_with_stats, segment, synthesize, synthesize_with_stats, Document, GroupKey,
    LayoutSplitConfig, Page, Segment, SegmentMap, SplitPolicy, Submission,
};

const FILE: &str = "file-1";

/// Builds a document whose pages start at `first_page`, with one identifier
/// occurrence per entry of `values` (`None` = identifier missing on that page).
fn tracked_document(layout: &str, first_page: u32, values: &[Option<&str>]) -> Document {
    let mut doc = Document::new(layout, format!("{}-v1", layout));
    for (offset, value) in values.iter().enumerate() {
        let document_page = offset as u32 + 1;
        let submission_page = first_page + offset as u32;
        doc.add_page(Page::new(
            u64::from(submission_page) * 100,
            submission_page,
            document_page,
            FILE,
        ));
        if let Some(value) = value {
            doc.add_field(DocumentField::new("acct", document_page).with_normalized(*value));
        }
    }
    doc
}

fn plain_document(layout: &str, first_page: u32, count: u32) -> Document {
    let mut doc = Document::new(layout, format!("{}-v1", layout));
    for offset in 0..count {
        let page = first_page + offset;
        doc.add_page(Page::new(u64::from(page) * 100, page, offset + 1, FILE));
    }
    doc
}

fn submission_of(documents: Vec<Document>) -> Submission {
    let mut submission = Submission::new(1);
    for doc in documents {
        submission.add_document(doc);
    }
    submission
}

fn tracking_config() -> LayoutSplitConfig {
    LayoutSplitConfig::new()
        .with_layout("statement", SplitPolicy::FieldTracking("acct".into()))
        .with_layout("batch", SplitPolicy::FixedCount(NonZeroU32::new(3).unwrap()))
}

fn pages_of(segments: &[Segment]) -> Vec<Vec<u32>> {
    segments.iter().map(|s| s.pages.clone()).collect()
}

fn group<'a>(map: &'a SegmentMap, layout: &str) -> &'a [Segment] {
    map.get(&GroupKey::new(layout, FILE)).unwrap()
}

#[test]
fn test_field_tracking_repeated_value_is_new_segment() {
    let values = [Some("A"), Some("A"), Some("B"), Some("B"), Some("B"), Some("A")];
    let submission = submission_of(vec![tracked_document("statement", 1, &values)]);

    let map = segment(&submission, &tracking_config());
    let segments = group(&map, "statement");

    assert_eq!(pages_of(segments), vec![vec![1, 2], vec![3, 4, 5], vec![6]]);
    let values: Vec<_> = segments.iter().map(|s| s.value.as_deref()).collect();
    assert_eq!(values, vec![Some("A"), Some("B"), Some("A")]);
}

#[test]
fn test_fixed_count_remainder_chunk() {
    let submission = submission_of(vec![plain_document("batch", 1, 7)]);

    let map = plan(&submission, &tracking_config());

    assert_eq!(
        pages_of(group(&map, "batch")),
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]
    );
}

#[test]
fn test_unconfigured_layout_is_one_segment() {
    let submission = submission_of(vec![plain_document("letter", 4, 3)]);

    let map = plan(&submission, &tracking_config());

    assert_eq!(pages_of(group(&map, "letter")), vec![vec![4, 5, 6]]);
}

#[test]
fn test_gap_joins_earlier_segment() {
    let values = [Some("A"), Some("A"), Some("A"), None, Some("B"), Some("B")];
    let submission = submission_of(vec![tracked_document("statement", 1, &values)]);

    let raw = segment(&submission, &tracking_config());
    assert_eq!(pages_of(group(&raw, "statement")), vec![vec![1, 2, 3], vec![5, 6]]);

    let map = plan(&submission, &tracking_config());
    assert_eq!(pages_of(group(&map, "statement")), vec![vec![1, 2, 3, 4], vec![5, 6]]);
}

#[test]
fn test_trailing_pages_join_last_segment() {
    let values = [Some("A"), Some("A"), Some("A"), None, None];
    let submission = submission_of(vec![tracked_document("statement", 1, &values)]);

    let (map, stats) = plan_with_stats(&submission, &tracking_config());
    let segments = group(&map, "statement");

    assert_eq!(segments[0].combined_pages, 5);
    assert_eq!(pages_of(segments), vec![vec![1, 2, 3, 4, 5]]);
    assert_eq!(segments[0].last_page, 5);
    assert_eq!(stats.pages_filled, 2);
}

#[test]
fn test_trailing_pages_after_unassigned_pages_kept() {
    let values = [Some("A"), None, None];
    let mut submission = submission_of(vec![tracked_document("statement", 3, &values)]);
    submission.unassigned_pages.push(Page::new(100, 1, 0, FILE));
    submission.unassigned_pages.push(Page::new(200, 2, 0, FILE));

    let map = plan(&submission, &tracking_config());
    assert_eq!(pages_of(group(&map, "statement")), vec![vec![3, 4, 5]]);

    let docs = synthesize(&submission, &map);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].page_ids(), vec![300, 400, 500]);
}

#[test]
fn test_documents_listed_out_of_page_order_keep_their_pages() {
    let later = tracked_document("statement", 4, &[Some("B"), None, None]);
    let earlier = plain_document("letter", 1, 3);
    let submission = submission_of(vec![later, earlier]);

    let map = plan(&submission, &tracking_config());

    assert_eq!(pages_of(group(&map, "statement")), vec![vec![4, 5, 6]]);
    assert_eq!(group(&map, "letter")[0].start(), 1);
}

#[test]
fn test_reconciled_groups_are_contiguous() {
    let statement = [Some("A"), None, Some("B"), None, Some("B"), Some("C"), None];
    let submission = submission_of(vec![
        plain_document("letter", 1, 2),
        tracked_document("statement", 3, &statement),
        plain_document("batch", 10, 8),
    ]);

    let map = plan(&submission, &tracking_config());

    for (key, segments) in map.iter() {
        let mut all: Vec<u32> = segments.iter().flat_map(|s| s.pages.clone()).collect();
        let unique: BTreeSet<u32> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len(), "duplicate pages in {}", key);

        all.sort_unstable();
        let min = all[0];
        let max = all[all.len() - 1];
        assert_eq!(all, (min..=max).collect::<Vec<_>>(), "gap in {}", key);
    }

    assert_eq!(
        pages_of(group(&map, "statement")),
        vec![vec![3, 4], vec![5, 6, 7], vec![8, 9]]
    );
}

/// When the identifier never occurs the document produces no segment and is
/// therefore absent from synthesis. Whether it should instead become a single
/// whole-document segment is undecided; this pins the current behaviour.
#[test]
fn test_missing_identifier_produces_no_segment() {
    let values = [None, None, None];
    let submission = submission_of(vec![tracked_document("statement", 1, &values)]);

    let (map, stats) = plan_with_stats(&submission, &tracking_config());

    assert!(map.get(&GroupKey::new("statement", FILE)).is_none());
    assert_eq!(stats.documents_unresolved, 1);
    assert!(synthesize(&submission, &map).is_empty());
}

#[test]
fn test_empty_document_skipped() {
    let submission = submission_of(vec![
        Document::new("statement", "statement-v1"),
        plain_document("letter", 1, 2),
    ]);

    let (map, stats) = plan_with_stats(&submission, &tracking_config());

    assert_eq!(map.len(), 1);
    assert_eq!(stats.documents_skipped, 1);
}

#[test]
fn test_synthesis_renumbers_in_page_order() {
    let values = [Some("A"), Some("A"), Some("B"), Some("B"), Some("B")];
    let first_pass = submission_of(vec![tracked_document("statement", 1, &values)]);
    let map = plan(&first_pass, &tracking_config());

    // The second pass lists pages out of order.
    let mut second = Document::new("statement", "statement-v2");
    for page in [5u32, 3, 1, 4, 2] {
        second.add_page(Page::new(u64::from(page) + 900, page, page, FILE));
    }
    let second_pass = submission_of(vec![second]);

    let docs = synthesize(&second_pass, &map);

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].page_ids(), vec![901, 902]);
    assert_eq!(docs[1].page_ids(), vec![903, 904, 905]);
    for doc in &docs {
        let numbers: Vec<u32> = doc.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, (1..=doc.pages.len() as u32).collect::<Vec<_>>());
        assert_eq!(doc.layout_version_uuid, "statement-v2");
    }
}

#[test]
fn test_synthesis_drops_segment_without_pages() {
    let values = [Some("A"), Some("A"), Some("B"), Some("B")];
    let first_pass = submission_of(vec![tracked_document("statement", 1, &values)]);
    let map = plan(&first_pass, &tracking_config());

    // Pages 3 and 4 were rejected as unassigned on the second pass.
    let mut second = plain_document("statement", 1, 2);
    second.layout_version_uuid = "statement-v2".to_string();
    let mut second_pass = submission_of(vec![second]);
    second_pass.unassigned_pages.push(Page::new(300, 3, 0, FILE));
    second_pass.unassigned_pages.push(Page::new(400, 4, 0, FILE));

    let (docs, stats) = synthesize_with_stats(&second_pass, &map);

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].page_ids(), vec![100, 200]);
    assert_eq!(stats.segments_dropped, 1);
}

#[test]
fn test_synthesis_keys_by_source_file() {
    let first_pass = submission_of(vec![plain_document("letter", 1, 2)]);
    let map = plan(&first_pass, &tracking_config());

    let mut other_file = Document::new("letter", "letter-v1");
    other_file.add_page(Page::new(1, 1, 1, "file-2"));
    let (docs, stats) = synthesize_with_stats(&submission_of(vec![other_file]), &map);

    assert!(docs.is_empty());
    assert_eq!(stats.documents_unmatched, 1);
}

#[test]
fn test_segment_map_survives_json() {
    let values = [Some("A"), None, Some("B")];
    let submission = submission_of(vec![tracked_document("statement", 1, &values)]);
    let map = plan(&submission, &tracking_config());

    let json = docsplit::to_json(&map, docsplit::JsonFormat::Compact).unwrap();
    assert!(json.contains("\"statement:file-1\""));
    let back = SegmentMap::from_json_str(&json).unwrap();

    assert_eq!(back, map);
    assert_eq!(synthesize(&submission, &back).len(), 2);
}
