//! Submission-level types.

use super::{Document, Page};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A scanned case: the unit of work handed over by the recognition service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Submission identifier
    #[serde(default)]
    pub id: u64,

    /// Documents in submission order
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Pages rejected from every document
    #[serde(default)]
    pub unassigned_pages: Vec<Page>,

    /// Keys not modelled here, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Submission {
    /// Create a new empty submission.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Parse a submission snapshot from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a submission snapshot from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Add a document to the submission.
    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Replace the documents with the durable ones returned by a sync,
    /// keeping every other part of the snapshot.
    pub fn with_documents(self, documents: Vec<Document>) -> Self {
        Self { documents, ..self }
    }

    /// Total number of pages across all documents.
    pub fn total_pages(&self) -> u32 {
        self.documents.iter().map(|d| d.num_pages()).sum()
    }
}
