//! Record normalizer: one raw tabular block + a field mapping in,
//! canonical complaint records + human-readable exclusion messages out.
//!
//! RULES:
//!   - Mapping faults reject the whole block with one message.
//!   - Row faults exclude that row with one message; processing continues.
//!   - Missing response dates and company names are tolerated silently.
//!   - The processing instant is captured once at construction and shared
//!     by every row of every block in the batch. Two blocks normalized by
//!     the same instance can never disagree on "days to deadline".

use crate::{
    dates::parse_cell_date,
    mapping::{FieldMapping, ResolvedMapping},
    record::{AlertLevel, ComplaintRecord, DeadlineStatus, Outcome, PendingStatus},
    table::TableBlock,
    types::UNIDENTIFIED_COMPANY,
};
use chrono::{NaiveDateTime, Utc};

pub struct Normalizer {
    processing_instant: NaiveDateTime,
}

impl Normalizer {
    /// Capture the wall clock once for the whole batch.
    pub fn new() -> Self {
        Self::at(Utc::now().naive_utc())
    }

    /// Build with an explicit processing instant. Used by tests and by
    /// callers that spread one batch across multiple blocks.
    pub fn at(processing_instant: NaiveDateTime) -> Self {
        Self { processing_instant }
    }

    pub fn processing_instant(&self) -> NaiveDateTime {
        self.processing_instant
    }

    /// Normalize one block. Returns every successfully normalized row in
    /// input order, plus the accumulated error descriptions. Data-quality
    /// problems never escape as `Err`; callers surface the strings as
    /// warnings next to whatever valid records were still produced.
    pub fn normalize(
        &self,
        block: &TableBlock,
        mapping: &FieldMapping,
        source_label: &str,
    ) -> (Vec<ComplaintRecord>, Vec<String>) {
        let mut errors = Vec::new();

        let resolved = match mapping.resolve(block, source_label) {
            Ok(resolved) => resolved,
            Err(e) => {
                log::warn!("block '{source_label}' rejected: {e}");
                errors.push(e.to_string());
                return (Vec::new(), errors);
            }
        };

        let mut records = Vec::with_capacity(block.row_count());
        for row_idx in 0..block.row_count() {
            let row_num = row_idx + 1;
            match self.normalize_row(block, &resolved, source_label, row_idx) {
                Some(record) => records.push(record),
                None => {
                    log::debug!("row {row_num} in '{source_label}' excluded: critical data missing");
                    errors.push(format!(
                        "Row {row_num} in {source_label}: critical data missing"
                    ));
                }
            }
        }

        log::info!(
            "block '{source_label}': {} of {} rows normalized, {} excluded",
            records.len(),
            block.row_count(),
            errors.len(),
        );
        (records, errors)
    }

    /// Normalize a single row, or `None` when the case ID, opening date
    /// or deadline date is missing/unparseable.
    fn normalize_row(
        &self,
        block: &TableBlock,
        mapping: &ResolvedMapping,
        source_label: &str,
        row_idx: usize,
    ) -> Option<ComplaintRecord> {
        let case_id = block.cell(row_idx, mapping.id_case).as_trimmed_text()?;

        let opening_date = parse_cell_date(block.cell(row_idx, mapping.opening_date))?;
        let deadline_date = parse_cell_date(block.cell(row_idx, mapping.deadline_date))?;

        // Absent, unbound or unparseable response cells all mean "no
        // response yet". Tolerated, never reported.
        let response_date = mapping
            .response_date
            .and_then(|col| parse_cell_date(block.cell(row_idx, col)));

        let company_name = block
            .cell(row_idx, mapping.company_name)
            .as_trimmed_text()
            .unwrap_or_else(|| UNIDENTIFIED_COMPANY.to_string());

        let outcome = match response_date {
            Some(response_date) => {
                let deadline_status = if response_date <= deadline_date {
                    DeadlineStatus::WithinDeadline
                } else {
                    DeadlineStatus::PastDeadline
                };
                Outcome::Responded {
                    response_date,
                    response_time_days: (response_date - opening_date).num_days(),
                    deadline_status,
                }
            }
            None => {
                // Date portions only: a deadline later today still counts
                // as zero days remaining, not a fraction.
                let days_to_deadline =
                    (deadline_date.date() - self.processing_instant.date()).num_days();
                let status_pending = if days_to_deadline < 0 {
                    PendingStatus::OverdueUnanswered
                } else {
                    PendingStatus::OnTimeUnanswered
                };
                Outcome::NotResponded {
                    days_to_deadline,
                    status_pending,
                    alert_level: AlertLevel::for_days_remaining(days_to_deadline),
                }
            }
        };

        Some(ComplaintRecord {
            case_id,
            company_name,
            opening_date,
            deadline_date,
            outcome,
            source_file: source_label.to_string(),
            source_row: row_idx + 1,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
