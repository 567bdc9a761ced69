//! Read-only data-quality pre-scan.
//!
//! Runs before normalization so callers can warn users about what the
//! normalizer is about to exclude. Scanning never mutates the block and
//! never changes what `normalize` will do; it only predicts it.

use crate::{
    dates::parse_cell_date,
    mapping::FieldMapping,
    table::TableBlock,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How many leading non-empty values of each date column get pushed
/// through the parser chain when sampling for format problems.
const DATE_SAMPLE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub total_values: usize,
    pub missing_count: usize,
    pub unique_values: usize,
    pub valid_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_rows: usize,
    /// Rows with every critical cell present; the upper bound on how many
    /// records normalization can produce.
    pub processable_rows: usize,
    pub issues: Vec<String>,
    pub date_parsing_issues: Vec<String>,
    /// Keyed by logical role, not source column name.
    pub column_stats: BTreeMap<String, ColumnStats>,
}

/// Scan one block against a mapping. Roles whose column is unbound or
/// absent are skipped; mapping validity is the normalizer's call to make.
pub fn scan_quality(block: &TableBlock, mapping: &FieldMapping) -> QualityReport {
    let roles: [(&str, Option<&str>, bool); 5] = [
        ("id_case", Some(mapping.id_case.as_str()), true),
        ("opening_date", Some(mapping.opening_date.as_str()), true),
        ("deadline_date", Some(mapping.deadline_date.as_str()), true),
        ("company_name", Some(mapping.company_name.as_str()), true),
        ("response_date", mapping.response_date.as_deref(), false),
    ];

    let mut report = QualityReport {
        total_rows: block.row_count(),
        processable_rows: 0,
        issues: Vec::new(),
        date_parsing_issues: Vec::new(),
        column_stats: BTreeMap::new(),
    };

    let mut critical_indices = Vec::new();
    for (role, column, critical) in roles {
        let Some(column) = column else { continue };
        let Some(col_idx) = block.column_index(column) else {
            continue;
        };
        if critical {
            critical_indices.push(col_idx);
        }

        let stats = column_stats(block, col_idx);
        if critical && stats.missing_count > 0 {
            report.issues.push(format!(
                "Critical column '{column}' ({role}) has {} missing values",
                stats.missing_count
            ));
        }

        if role.ends_with("_date") {
            if let Some(issue) = sample_date_column(block, col_idx, column) {
                report.date_parsing_issues.push(issue);
            }
        }

        report.column_stats.insert(role.to_string(), stats);
    }

    report.processable_rows = (0..block.row_count())
        .filter(|&row| {
            critical_indices
                .iter()
                .all(|&col| !block.cell(row, col).is_empty())
        })
        .count();

    report
}

fn column_stats(block: &TableBlock, col_idx: usize) -> ColumnStats {
    let total_values = block.row_count();
    let mut missing_count = 0usize;
    let mut seen = BTreeSet::new();

    for row in 0..total_values {
        let cell = block.cell(row, col_idx);
        if cell.is_empty() {
            missing_count += 1;
        } else if let Some(text) = cell.as_trimmed_text() {
            seen.insert(text);
        }
    }

    let valid = total_values - missing_count;
    let valid_percentage = if total_values == 0 {
        0.0
    } else {
        valid as f64 / total_values as f64 * 100.0
    };

    ColumnStats {
        total_values,
        missing_count,
        unique_values: seen.len(),
        valid_percentage,
    }
}

/// Push a sample of the column through the date parser chain; report when
/// any sampled value fails.
fn sample_date_column(block: &TableBlock, col_idx: usize, column: &str) -> Option<String> {
    let mut sampled = 0usize;
    let mut failures = 0usize;

    for row in 0..block.row_count() {
        if sampled >= DATE_SAMPLE_SIZE {
            break;
        }
        let cell = block.cell(row, col_idx);
        if cell.is_empty() {
            continue;
        }
        sampled += 1;
        if parse_cell_date(cell).is_none() {
            failures += 1;
        }
    }

    if failures > 0 {
        Some(format!(
            "Column '{column}': {failures}/{sampled} sampled values could not be read as dates"
        ))
    } else {
        None
    }
}
