//! Table types.

use super::Directive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A table identified on a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Directive for the manual table identification step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_manual_identification_type: Option<Directive>,

    /// Columns in the table
    #[serde(default)]
    pub columns: Vec<TableColumn>,

    /// Keys not modelled here, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column to the table.
    pub fn add_column(&mut self, column: TableColumn) {
        self.columns.push(column);
    }

    /// Iterate over every cell, column by column.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.columns.iter().flat_map(|c| &c.cells)
    }

    /// Skip manual identification of the table and manual transcription of
    /// every cell.
    pub fn skip_review(&mut self) {
        self.process_manual_identification_type = Some(Directive::Skip);
        for cell in self.columns.iter_mut().flat_map(|c| &mut c.cells) {
            cell.process_manual_transcription_type = Some(Directive::Skip);
        }
    }
}

/// A table column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Cells in the column, top to bottom
    #[serde(default)]
    pub cells: Vec<TableCell>,

    /// Keys not modelled here, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TableColumn {
    /// Create a column with the given number of empty cells.
    pub fn with_cells(count: usize) -> Self {
        Self {
            cells: vec![TableCell::default(); count],
            extra: Map::new(),
        }
    }
}

/// A single table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Directive for the manual transcription step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_manual_transcription_type: Option<Directive>,

    /// Keys not modelled here, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
