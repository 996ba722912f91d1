//! Document field types and manual-review directives.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Processing directive for a manual review step.
///
/// An unset directive (`None` on the field) leaves the decision to the
/// service's own confidence thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Directive {
    /// Always route to a human reviewer
    Force,
    /// Never route to a human reviewer
    Skip,
}

/// Machine identification confidence reported for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// The machine is confident in its identification
    Sure,
    /// The machine is not confident; review is expected
    NotSure,
    /// Any other value reported by the service
    #[serde(untagged)]
    Other(String),
}

/// A field identified on one page of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentField {
    /// Field name as defined by the layout
    pub field_name: String,

    /// Raw machine or manual transcription
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,

    /// Normalized transcription
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription_normalized: Option<String>,

    /// Page the field was read from (document page number)
    #[serde(default)]
    pub page_number: u32,

    /// Identification confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identification_confidence: Option<Confidence>,

    /// Directive for the manual identification step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_manual_identification_type: Option<Directive>,

    /// Directive for the manual transcription step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_manual_transcription_type: Option<Directive>,

    /// Keys not modelled here, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DocumentField {
    /// Create a field read from the given document page.
    pub fn new(field_name: impl Into<String>, page_number: u32) -> Self {
        Self {
            field_name: field_name.into(),
            transcription: None,
            transcription_normalized: None,
            page_number,
            identification_confidence: None,
            process_manual_identification_type: None,
            process_manual_transcription_type: None,
            extra: Map::new(),
        }
    }

    /// Set the raw transcription.
    pub fn with_transcription(mut self, text: impl Into<String>) -> Self {
        self.transcription = Some(text.into());
        self
    }

    /// Set the normalized transcription.
    pub fn with_normalized(mut self, text: impl Into<String>) -> Self {
        self.transcription_normalized = Some(text.into());
        self
    }

    /// The field's canonical value.
    ///
    /// A non-empty normalized transcription wins over the raw transcription.
    pub fn canonical_value(&self) -> Option<&str> {
        self.transcription_normalized
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(self.transcription.as_deref())
    }

    /// Skip both manual identification and manual transcription.
    pub fn skip_review(&mut self) {
        self.process_manual_identification_type = Some(Directive::Skip);
        self.process_manual_transcription_type = Some(Directive::Skip);
    }

    /// Force manual identification and flag the machine reading as uncertain.
    pub fn force_identification(&mut self) {
        self.identification_confidence = Some(Confidence::NotSure);
        self.process_manual_identification_type = Some(Directive::Force);
    }
}
