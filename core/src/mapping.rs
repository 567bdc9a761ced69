//! Field mapping: the user-supplied binding from logical record roles to
//! actual source column names, resolved against one block before any row
//! is touched. A mapping that fails to resolve rejects the whole block.

use crate::{
    error::{AnalysisError, AnalysisResult},
    table::TableBlock,
};
use serde::{Deserialize, Serialize};

/// Logical roles bound to source column names for one input block.
/// `response_date` is optional: an unbound response column simply means
/// every complaint in the block is treated as unanswered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    pub id_case: String,
    pub opening_date: String,
    pub deadline_date: String,
    pub company_name: String,
    #[serde(default)]
    pub response_date: Option<String>,
}

/// Column indices after resolution against a concrete block.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMapping {
    pub id_case: usize,
    pub opening_date: usize,
    pub deadline_date: usize,
    pub company_name: usize,
    pub response_date: Option<usize>,
}

impl FieldMapping {
    /// Parse a mapping from its JSON form, as written by hand or saved
    /// from a previous run (`sla-runner --map-file`).
    pub fn from_json(text: &str) -> AnalysisResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolve every bound role to a column index in `block`.
    ///
    /// Fails on the first problem: an empty required binding or a bound
    /// column (required or optional) that the block does not have. The
    /// caller turns this into the single block-level error message.
    pub fn resolve(&self, block: &TableBlock, source: &str) -> AnalysisResult<ResolvedMapping> {
        let required = [
            ("id_case", &self.id_case),
            ("opening_date", &self.opening_date),
            ("deadline_date", &self.deadline_date),
            ("company_name", &self.company_name),
        ];

        let mut indices = [0usize; 4];
        for (i, (role, column)) in required.into_iter().enumerate() {
            if column.trim().is_empty() {
                return Err(AnalysisError::MissingMapping {
                    role: role.to_string(),
                });
            }
            indices[i] = block.column_index(column).ok_or_else(|| {
                AnalysisError::ColumnNotFound {
                    column: column.clone(),
                    role: role.to_string(),
                    source_label: source.to_string(),
                }
            })?;
        }

        // An explicitly bound response column that does not exist is a
        // configuration fault, not an empty response.
        let response_date = match &self.response_date {
            Some(column) if !column.trim().is_empty() => Some(
                block
                    .column_index(column)
                    .ok_or_else(|| AnalysisError::ColumnNotFound {
                        column: column.to_string(),
                        role: "response_date".to_string(),
                        source_label: source.to_string(),
                    })?,
            ),
            _ => None,
        };

        Ok(ResolvedMapping {
            id_case: indices[0],
            opening_date: indices[1],
            deadline_date: indices[2],
            company_name: indices[3],
            response_date,
        })
    }
}
