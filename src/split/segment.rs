//! Segments and the segment map shared by the split consumers.

use crate::error::{Error, Result};
use crate::model::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Identity of a segment group: a layout within one source file.
///
/// Rendered as `layout_uuid:file_uuid`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupKey {
    /// Layout of the grouped documents
    pub layout_uuid: String,
    /// Source file of the grouped documents
    pub file_uuid: String,
}

impl GroupKey {
    /// Create a group key.
    pub fn new(layout_uuid: impl Into<String>, file_uuid: impl Into<String>) -> Self {
        Self {
            layout_uuid: layout_uuid.into(),
            file_uuid: file_uuid.into(),
        }
    }

    /// Group key of a document; `None` for a document without pages.
    pub fn for_document(document: &Document) -> Option<Self> {
        document
            .file_uuid()
            .map(|file_uuid| Self::new(document.layout_uuid.as_str(), file_uuid))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.layout_uuid, self.file_uuid)
    }
}

impl FromStr for GroupKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((layout, file)) if !layout.is_empty() => Ok(Self::new(layout, file)),
            _ => Err(Error::InvalidGroupKey(s.to_string())),
        }
    }
}

impl TryFrom<String> for GroupKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<GroupKey> for String {
    fn from(key: GroupKey) -> Self {
        key.to_string()
    }
}

/// Running page totals recorded on every segment of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageCounts {
    pub combined_pages: u32,
    pub submission_pages: u32,
    pub document_last_page: u32,
}

/// A candidate sub-document: a set of submission pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Field value that opened the segment, if split by field
    pub value: Option<String>,

    /// Submission page numbers, ascending
    pub pages: Vec<u32>,

    /// First page of the segment
    pub first_page: u32,

    /// Last page of the segment
    pub last_page: u32,

    /// Page count of the originating document
    pub combined_pages: u32,

    /// Running page total of the submission up to the originating document
    pub submission_pages: u32,

    /// Highest submission page of the originating document
    #[serde(default)]
    pub document_last_page: u32,
}

impl Segment {
    /// Close a segment over the given pages; `None` when there are no pages.
    pub(crate) fn close(value: Option<String>, mut pages: Vec<u32>, counts: PageCounts) -> Option<Self> {
        pages.sort_unstable();
        pages.dedup();
        let first_page = *pages.first()?;
        let last_page = *pages.last()?;
        Some(Self {
            value,
            pages,
            first_page,
            last_page,
            combined_pages: counts.combined_pages,
            submission_pages: counts.submission_pages,
            document_last_page: counts.document_last_page,
        })
    }

    /// Lowest page of the segment.
    pub fn start(&self) -> u32 {
        self.pages.first().copied().unwrap_or(self.first_page)
    }

    /// Highest page of the segment.
    pub fn end(&self) -> u32 {
        self.pages.last().copied().unwrap_or(self.last_page)
    }

    /// Check if the segment holds a submission page.
    pub fn contains(&self, submission_page_number: u32) -> bool {
        self.pages.contains(&submission_page_number)
    }

    /// Number of pages in the segment.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if the segment holds no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Last page a trailing gap may be filled up to.
    ///
    /// At least the running submission total, and never short of the last
    /// page of the originating document, whatever precedes it.
    pub fn trailing_boundary(&self) -> u32 {
        self.submission_pages
            .max(self.combined_pages)
            .max(self.document_last_page)
    }
}

/// Segments grouped by layout and source file, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentMap {
    groups: BTreeMap<GroupKey, Vec<Segment>>,
}

impl SegmentMap {
    /// Create an empty segment map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a segment map from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a segment map from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Append segments to a group, creating it if needed.
    pub fn extend_group(&mut self, key: GroupKey, segments: impl IntoIterator<Item = Segment>) {
        self.groups.entry(key).or_default().extend(segments);
    }

    /// Segments of a group.
    pub fn get(&self, key: &GroupKey) -> Option<&[Segment]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Iterate over groups.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[Segment])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub(crate) fn groups_mut(&mut self) -> impl Iterator<Item = &mut Vec<Segment>> {
        self.groups.values_mut()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if the map has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of segments across all groups.
    pub fn segment_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
