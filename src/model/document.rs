//! Document-level types.

use super::{DocumentField, Page, Table};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A logically identified group of pages sharing one layout.
///
/// All pages of a document are expected to originate from the same source
/// file; the first page's `file_uuid` stands for the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Durable document identifier, once synced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    /// Logical form type
    pub layout_uuid: String,

    /// Concrete version of the layout
    #[serde(default)]
    pub layout_version_uuid: String,

    /// Pages in document order
    #[serde(default)]
    pub pages: Vec<Page>,

    /// Fields identified on the pages
    #[serde(default)]
    pub document_fields: Vec<DocumentField>,

    /// Tables identified on the pages
    #[serde(default)]
    pub tables: Vec<Table>,

    /// Page count recorded by the directive pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    /// Identifier-field occurrences recorded by the directive pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_count: Option<u32>,

    /// Keys not modelled here, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Create a new empty document.
    pub fn new(layout_uuid: impl Into<String>, layout_version_uuid: impl Into<String>) -> Self {
        Self {
            uuid: None,
            layout_uuid: layout_uuid.into(),
            layout_version_uuid: layout_version_uuid.into(),
            pages: Vec::new(),
            document_fields: Vec::new(),
            tables: Vec::new(),
            page_count: None,
            identifier_count: None,
            extra: Map::new(),
        }
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Add a field to the document.
    pub fn add_field(&mut self, field: DocumentField) {
        self.document_fields.push(field);
    }

    /// Add a table to the document.
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Get the number of pages in the document.
    pub fn num_pages(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Source file of the document, taken from its first page.
    pub fn file_uuid(&self) -> Option<&str> {
        self.pages.first().map(|p| p.file_uuid.as_str())
    }

    /// Resolve a document page number to its submission page number.
    pub fn submission_page_for(&self, document_page_number: u32) -> Option<u32> {
        self.pages
            .iter()
            .find(|p| p.document_page_number == document_page_number)
            .map(|p| p.submission_page_number)
    }

    /// Submission page numbers of all pages, ascending.
    pub fn submission_pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self.pages.iter().map(|p| p.submission_page_number).collect();
        pages.sort_unstable();
        pages
    }

    /// Highest submission page number of the document.
    pub fn last_submission_page(&self) -> Option<u32> {
        self.pages.iter().map(|p| p.submission_page_number).max()
    }

    /// Fields with the given name, in document order.
    pub fn fields_named<'a>(
        &'a self,
        field_name: &'a str,
    ) -> impl Iterator<Item = &'a DocumentField> + 'a {
        self.document_fields
            .iter()
            .filter(move |f| f.field_name == field_name)
    }
}
