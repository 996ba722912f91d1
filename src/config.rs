//! Layout split configuration.
//!
//! The configuration maps a layout UUID to the policy used to split documents
//! of that layout. On the wire each entry has the shape
//! `{"name": "...", "field": "<field name>" | null, "pages": <int>}`; entries
//! are converted into a [`SplitPolicy`] once, when the configuration is loaded.
//!
//! # Example
//!
//! ```
//! use docsplit::config::{LayoutSplitConfig, SplitPolicy};
//!
//! let config = LayoutSplitConfig::from_json_str(r#"{
//!     "layout-a": {"name": "Statement", "field": "account_number", "pages": 0},
//!     "layout-b": {"field": null, "pages": 2}
//! }"#)?;
//!
//! assert_eq!(config.policy_for("layout-a").identifier_field(), Some("account_number"));
//! assert!(matches!(config.policy_for("layout-b"), SplitPolicy::FixedCount(n) if n.get() == 2));
//! assert_eq!(config.policy_for("unknown"), &SplitPolicy::NoSplit);
//! # Ok::<(), docsplit::Error>(())
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::num::NonZeroU32;
use std::path::Path;

static NO_SPLIT: SplitPolicy = SplitPolicy::NoSplit;

/// How documents of one layout are carved into segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Start a new segment whenever the named field changes value
    FieldTracking(String),
    /// Cut the pages into chunks of a fixed size
    FixedCount(NonZeroU32),
    /// Keep the whole document as one segment
    NoSplit,
}

impl SplitPolicy {
    /// Field whose value drives the split, if any.
    pub fn identifier_field(&self) -> Option<&str> {
        match self {
            SplitPolicy::FieldTracking(field) => Some(field),
            _ => None,
        }
    }
}

/// Configuration of a single layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLayoutEntry", into = "RawLayoutEntry")]
pub struct LayoutSplitEntry {
    /// Human-readable layout name
    pub name: Option<String>,

    /// Split policy
    pub policy: SplitPolicy,
}

impl LayoutSplitEntry {
    /// Create an unnamed entry.
    pub fn new(policy: SplitPolicy) -> Self {
        Self { name: None, policy }
    }
}

#[derive(Serialize, Deserialize)]
struct RawLayoutEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    pages: i64,
}

impl TryFrom<RawLayoutEntry> for LayoutSplitEntry {
    type Error = Error;

    fn try_from(raw: RawLayoutEntry) -> Result<Self> {
        let field = raw.field.filter(|f| !f.is_empty());
        let pages = u32::try_from(raw.pages).map_err(|_| {
            Error::InvalidConfig(format!("pages must be between 0 and {}, got {}", u32::MAX, raw.pages))
        })?;

        let policy = match (field, NonZeroU32::new(pages)) {
            (Some(field), count) => {
                if count.is_some() {
                    log::warn!(
                        "Layout {} sets both field '{}' and pages {}; field takes priority",
                        raw.name.as_deref().unwrap_or("<unnamed>"),
                        field,
                        pages
                    );
                }
                SplitPolicy::FieldTracking(field)
            }
            (None, Some(count)) => SplitPolicy::FixedCount(count),
            (None, None) => SplitPolicy::NoSplit,
        };

        Ok(Self {
            name: raw.name,
            policy,
        })
    }
}

impl From<LayoutSplitEntry> for RawLayoutEntry {
    fn from(entry: LayoutSplitEntry) -> Self {
        let (field, pages) = match entry.policy {
            SplitPolicy::FieldTracking(field) => (Some(field), 0),
            SplitPolicy::FixedCount(count) => (None, i64::from(count.get())),
            SplitPolicy::NoSplit => (None, 0),
        };
        Self {
            name: entry.name,
            field,
            pages,
        }
    }
}

/// Split configuration keyed by layout UUID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutSplitConfig {
    layouts: BTreeMap<String, LayoutSplitEntry>,
}

impl LayoutSplitConfig {
    /// Create an empty configuration (nothing is split).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Set the policy of a layout.
    pub fn with_layout(mut self, layout_uuid: impl Into<String>, policy: SplitPolicy) -> Self {
        self.insert(layout_uuid, LayoutSplitEntry::new(policy));
        self
    }

    /// Set the policy and display name of a layout.
    pub fn with_named_layout(
        mut self,
        layout_uuid: impl Into<String>,
        name: impl Into<String>,
        policy: SplitPolicy,
    ) -> Self {
        self.insert(
            layout_uuid,
            LayoutSplitEntry {
                name: Some(name.into()),
                policy,
            },
        );
        self
    }

    /// Insert or replace a layout entry.
    pub fn insert(&mut self, layout_uuid: impl Into<String>, entry: LayoutSplitEntry) {
        self.layouts.insert(layout_uuid.into(), entry);
    }

    /// Get the entry of a layout.
    pub fn get(&self, layout_uuid: &str) -> Option<&LayoutSplitEntry> {
        self.layouts.get(layout_uuid)
    }

    /// Policy for a layout; layouts without an entry are not split.
    pub fn policy_for(&self, layout_uuid: &str) -> &SplitPolicy {
        match self.layouts.get(layout_uuid) {
            Some(entry) => &entry.policy,
            None => {
                log::debug!("No split configuration for layout {}", layout_uuid);
                &NO_SPLIT
            }
        }
    }

    /// Display name of a layout, if configured.
    pub fn layout_name(&self, layout_uuid: &str) -> Option<&str> {
        self.layouts.get(layout_uuid).and_then(|e| e.name.as_deref())
    }

    /// Iterate over configured layouts.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LayoutSplitEntry)> {
        self.layouts.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of configured layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Check if no layout is configured.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
