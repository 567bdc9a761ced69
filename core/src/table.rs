//! Tabular input structure handed to the normalizer by the file-reading
//! collaborator. The core never parses file bytes; it receives blocks of
//! named columns and typed cells and works from there.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single cell as produced by a spreadsheet or CSV reader.
///
/// CSV readers only produce `Text` and `Empty`; spreadsheet readers are
/// expected to materialize native date cells as `DateTime` (serial-number
/// dates are their job, not ours).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
    Empty,
}

impl CellValue {
    /// Trimmed text content, or `None` for empty / whitespace-only cells.
    /// Numbers render with their natural formatting so numeric case IDs
    /// survive the trip through a spreadsheet reader.
    pub fn as_trimmed_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{n}"))
                }
            }
            CellValue::DateTime(dt) => Some(dt.to_string()),
            CellValue::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// One rectangular block of input data: ordered named columns, ordered rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableBlock {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TableBlock {
    /// Build a block, padding ragged rows with `Empty` and truncating
    /// overlong ones so every row matches the column count.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.truncate(width);
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a named column, if present. Names match exactly after
    /// trimming; the reader collaborator owns header normalization.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.columns.iter().position(|c| c.trim() == wanted)
    }

    pub fn cell(&self, row_idx: usize, col_idx: usize) -> &CellValue {
        &self.rows[row_idx][col_idx]
    }
}
