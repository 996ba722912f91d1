//! # docsplit
//!
//! Document splitting engine for classified multi-page scan submissions.
//!
//! An upstream recognition service classifies every page of a submission into
//! documents. Documents of some layouts actually hold several logical
//! documents back to back: statements for different accounts, or fixed-size
//! forms scanned in one batch. This library decides where to cut them.
//!
//! ## Quick Start
//!
//! ```
//! use docsplit::{Docsplit, Document, LayoutSplitConfig, Page, Submission, SplitPolicy};
//! use docsplit::model::DocumentField;
//!
//! let config = LayoutSplitConfig::new()
//!     .with_layout("statement", SplitPolicy::FieldTracking("account".into()));
//!
//! let mut doc = Document::new("statement", "statement-v1");
//! for (n, account) in ["A", "A", "B"].iter().enumerate() {
//!     let n = n as u32 + 1;
//!     doc.add_page(Page::new(u64::from(n), n, n, "scan-1"));
//!     doc.add_field(DocumentField::new("account", n).with_transcription(*account));
//! }
//! let mut submission = Submission::new(1);
//! submission.add_document(doc);
//!
//! let splitter = Docsplit::new(config);
//! let plan = splitter.plan(&submission);
//! let documents = splitter.split(&submission, &plan);
//!
//! assert_eq!(documents.len(), 2);
//! assert_eq!(documents[0].page_ids(), vec![1, 2]);
//! assert_eq!(documents[1].page_ids(), vec![3]);
//! ```
//!
//! ## Features
//!
//! - **Three split policies**: by identifier field value, by fixed page count,
//!   or not at all
//! - **Gap reconciliation**: pages missed by the identifier are folded into the
//!   preceding segment
//! - **Review directives**: only the fields that drive the split are routed to
//!   manual identification before splitting
//! - **Pass-independent synthesis**: split documents are rebuilt from a later
//!   classification pass by submission page number

pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod split;

// Re-export commonly used types
pub use config::{LayoutSplitConfig, LayoutSplitEntry, SplitPolicy};
pub use error::{Error, Result};
pub use model::{
    ClassificationType, Confidence, Directive, Document, DocumentField, Page, SplitDocument,
    SplitPage, Submission, Table, TableCell, TableColumn,
};
pub use render::{to_json, JsonFormat};
pub use split::{
    assign_directives, assign_post_split_directives, plan, plan_with_stats, reconcile, segment,
    synthesize, synthesize_with_stats, GroupKey, Segment, SegmentMap, SegmentStats,
    SynthesisStats,
};

use std::path::Path;

/// Read a layout split configuration from a JSON file.
///
/// # Example
///
/// ```no_run
/// let config = docsplit::load_config("layouts.json")?;
/// println!("{} layouts configured", config.len());
/// # Ok::<(), docsplit::Error>(())
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LayoutSplitConfig> {
    LayoutSplitConfig::from_path(path)
}

/// Read a submission snapshot from a JSON file.
pub fn load_submission<P: AsRef<Path>>(path: P) -> Result<Submission> {
    Submission::from_path(path)
}

/// Read a segment map from a JSON file.
pub fn load_segments<P: AsRef<Path>>(path: P) -> Result<SegmentMap> {
    SegmentMap::from_path(path)
}

/// Splitter bound to one layout configuration.
///
/// Each stage of the surrounding pipeline calls one method, on the snapshot
/// it holds at that point:
///
/// 1. [`review`](Self::review) on the first machine-identification output;
/// 2. [`plan`](Self::plan) once the first pass has been transcribed;
/// 3. [`split`](Self::split) on the second classification pass;
/// 4. [`finalize_review`](Self::finalize_review) after the split documents
///    have been synced and identified again.
#[derive(Debug, Clone, Default)]
pub struct Docsplit {
    config: LayoutSplitConfig,
}

impl Docsplit {
    /// Create a splitter for the given configuration.
    pub fn new(config: LayoutSplitConfig) -> Self {
        Self { config }
    }

    /// Create a splitter from a configuration file.
    pub fn from_config_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(load_config(path)?))
    }

    /// Get the configuration.
    pub fn config(&self) -> &LayoutSplitConfig {
        &self.config
    }

    /// Annotate a first-pass submission with pre-split review directives.
    pub fn review(&self, submission: &Submission) -> Submission {
        assign_directives(submission, &self.config)
    }

    /// Build the reconciled segment map of a first-pass submission.
    pub fn plan(&self, submission: &Submission) -> SegmentMap {
        plan(submission, &self.config)
    }

    /// Build the reconciled segment map and collect statistics.
    pub fn plan_with_stats(&self, submission: &Submission) -> (SegmentMap, SegmentStats) {
        plan_with_stats(submission, &self.config)
    }

    /// Carve a second-pass submission along a segment map.
    pub fn split(&self, submission: &Submission, segments: &SegmentMap) -> Vec<SplitDocument> {
        synthesize(submission, segments)
    }

    /// Annotate a submission of synced split documents for their own review.
    pub fn finalize_review(&self, submission: &Submission) -> Submission {
        assign_post_split_directives(submission, &self.config)
    }
}
