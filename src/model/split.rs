//! Split document records emitted for the sync step.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// How a page was classified into its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationType {
    /// Classified by the machine
    Machine,
}

/// A new document carved out of a classified document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitDocument {
    /// Freshly generated document identifier
    pub uuid: Uuid,

    /// Layout version of the originating document
    pub layout_version_uuid: String,

    /// Pages renumbered from 1
    pub pages: Vec<SplitPage>,

    /// Free-form metadata for the sync step
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl SplitDocument {
    /// Create a split document over the given page identifiers.
    ///
    /// Pages are numbered `1..=k` in the order given and marked as machine
    /// classified.
    pub fn new(
        layout_version_uuid: impl Into<String>,
        page_ids: impl IntoIterator<Item = u64>,
    ) -> Self {
        let pages = page_ids
            .into_iter()
            .zip(1..)
            .map(|(submission_page_id, page_number)| SplitPage {
                submission_page_id,
                page_number,
                classification_type: ClassificationType::Machine,
            })
            .collect();

        Self {
            uuid: Uuid::new_v4(),
            layout_version_uuid: layout_version_uuid.into(),
            pages,
            metadata: Map::new(),
        }
    }

    /// Page identifiers in page order.
    pub fn page_ids(&self) -> Vec<u64> {
        self.pages.iter().map(|p| p.submission_page_id).collect()
    }
}

/// A page reference inside a split document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPage {
    /// Identifier of the submission page
    pub submission_page_id: u64,

    /// Position within the split document (1-indexed)
    pub page_number: u32,

    /// How the page was classified
    pub classification_type: ClassificationType,
}
