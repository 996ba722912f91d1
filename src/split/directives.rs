//! Manual-review directives for the identification and transcription steps.
//!
//! Before splitting, only the identifier field of a field-tracked layout may
//! need a human: it is forced into manual identification when the machine did
//! not find exactly one identifier per page, and skipped otherwise. Every
//! other field, and every table, is skipped until the document has been split.

use crate::config::{LayoutSplitConfig, SplitPolicy};
use crate::model::{Document, Submission};

/// Annotate a first-pass submission with directives gating review before the
/// split.
///
/// Returns an annotated copy; applying it twice yields the same directives.
pub fn assign_directives(submission: &Submission, config: &LayoutSplitConfig) -> Submission {
    let mut annotated = submission.clone();
    for document in &mut annotated.documents {
        annotate_before_split(document, config.policy_for(&document.layout_uuid));
    }
    annotated
}

/// Annotate a submission of synced split documents before their own review.
///
/// Only identifier fields are touched; every other field and table keeps its
/// directives so the second review pass can pick them up.
pub fn assign_post_split_directives(
    submission: &Submission,
    config: &LayoutSplitConfig,
) -> Submission {
    let mut annotated = submission.clone();
    for document in &mut annotated.documents {
        if let Some(field) = config.policy_for(&document.layout_uuid).identifier_field() {
            let identifier_count = review_identifiers(document, field);
            record_counts(document, identifier_count);
        }
    }
    annotated
}

fn annotate_before_split(document: &mut Document, policy: &SplitPolicy) {
    let identifier_count = match policy.identifier_field() {
        Some(field) => {
            document
                .document_fields
                .iter_mut()
                .filter(|f| f.field_name != field)
                .for_each(|f| f.skip_review());
            review_identifiers(document, field)
        }
        None => {
            document
                .document_fields
                .iter_mut()
                .for_each(|f| f.skip_review());
            0
        }
    };
    record_counts(document, identifier_count);

    for table in &mut document.tables {
        table.skip_review();
    }
}

/// Force or skip review of the identifier field, returning its occurrence count.
fn review_identifiers(document: &mut Document, field: &str) -> u32 {
    let page_count = document.num_pages();
    let identifier_count = document.fields_named(field).count() as u32;
    let trusted = identifier_count == page_count;

    if !trusted {
        log::debug!(
            "Layout {}: {} '{}' occurrence(s) on {} page(s), forcing manual identification",
            document.layout_uuid,
            identifier_count,
            field,
            page_count
        );
    }

    for occurrence in document
        .document_fields
        .iter_mut()
        .filter(|f| f.field_name == field)
    {
        if trusted {
            occurrence.skip_review();
        } else {
            occurrence.force_identification();
        }
    }

    identifier_count
}

fn record_counts(document: &mut Document, identifier_count: u32) {
    document.page_count = Some(document.num_pages());
    document.identifier_count = Some(identifier_count);
}
