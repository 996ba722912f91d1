//! Submission model types exchanged with the recognition service.
//!
//! These records mirror the JSON snapshots produced by the upstream
//! classification and identification passes. Every record keeps the keys it
//! does not model in an `extra` map, so a snapshot survives a round trip
//! through the splitting core without losing service-owned data.

mod document;
mod field;
mod page;
mod split;
mod submission;
mod table;

pub use document::Document;
pub use field::{Confidence, Directive, DocumentField};
pub use page::Page;
pub use split::{ClassificationType, SplitDocument, SplitPage};
pub use submission::Submission;
pub use table::{Table, TableCell, TableColumn};
