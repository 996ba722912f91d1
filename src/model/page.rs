//! Page-level types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single scanned page as classified by the recognition service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Opaque page identifier assigned by the service
    pub id: u64,

    /// Sequence number across the whole submission (1-indexed)
    pub submission_page_number: u32,

    /// Sequence number within the owning document (1-indexed)
    #[serde(default)]
    pub document_page_number: u32,

    /// Source file the page was scanned from
    #[serde(default)]
    pub file_uuid: String,

    /// Keys not modelled here, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    /// Create a new page.
    pub fn new(
        id: u64,
        submission_page_number: u32,
        document_page_number: u32,
        file_uuid: impl Into<String>,
    ) -> Self {
        Self {
            id,
            submission_page_number,
            document_page_number,
            file_uuid: file_uuid.into(),
            extra: Map::new(),
        }
    }
}
