//! Consolidated metrics over the full record set.
//!
//! `aggregate` is a pure function of the records: order-independent,
//! recomputed from scratch whenever the set changes, and safe on empty
//! input. Every division guards its denominator; there is no code path
//! that divides by zero.

use crate::record::{AlertLevel, ComplaintRecord, DeadlineStatus, PendingStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-company rollup. `avg_response_time_days` is `None` when the
/// company has no responded complaints to average over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyStats {
    pub total: u64,
    pub responded: u64,
    pub within_deadline: u64,
    pub avg_response_time_days: Option<f64>,
}

/// The consolidated, read-only metrics summary.
///
/// BTreeMaps keep iteration deterministic so two aggregations over the
/// same records always render identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_complaints: u64,
    pub total_responded: u64,
    pub responded_percentage: f64,
    pub total_not_responded: u64,
    pub within_deadline: u64,
    pub within_deadline_percentage: f64,
    pub average_response_time: f64,
    pub in_deadline_not_responded: u64,
    pub overdue_not_responded: u64,
    pub alert_breakdown: BTreeMap<AlertLevel, u64>,
    pub company_breakdown: BTreeMap<String, CompanyStats>,
    pub processing_date: NaiveDateTime,
}

impl MetricsSummary {
    /// Zero-valued summary for an empty record set.
    pub fn empty(processing_date: NaiveDateTime) -> Self {
        Self {
            total_complaints: 0,
            total_responded: 0,
            responded_percentage: 0.0,
            total_not_responded: 0,
            within_deadline: 0,
            within_deadline_percentage: 0.0,
            average_response_time: 0.0,
            in_deadline_not_responded: 0,
            overdue_not_responded: 0,
            alert_breakdown: BTreeMap::new(),
            company_breakdown: BTreeMap::new(),
            processing_date,
        }
    }
}

/// Percentage with a guarded denominator.
fn safe_percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// Mean over the contributing values, or `None` when there are none.
fn safe_mean(sum: i64, count: u64) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Aggregate the full record set into one summary. `processing_date` is
/// the instant the normalizer used, carried through for provenance.
pub fn aggregate(records: &[ComplaintRecord], processing_date: NaiveDateTime) -> MetricsSummary {
    if records.is_empty() {
        return MetricsSummary::empty(processing_date);
    }

    let total_complaints = records.len() as u64;
    let mut total_responded = 0u64;
    let mut within_deadline = 0u64;
    let mut response_time_sum = 0i64;
    let mut response_time_count = 0u64;
    let mut in_deadline_not_responded = 0u64;
    let mut overdue_not_responded = 0u64;
    let mut alert_breakdown: BTreeMap<AlertLevel, u64> = BTreeMap::new();

    struct CompanyAccum {
        total: u64,
        responded: u64,
        within_deadline: u64,
        response_time_sum: i64,
        response_time_count: u64,
    }
    let mut companies: BTreeMap<&str, CompanyAccum> = BTreeMap::new();

    for record in records {
        let company = companies
            .entry(record.company_name.as_str())
            .or_insert(CompanyAccum {
                total: 0,
                responded: 0,
                within_deadline: 0,
                response_time_sum: 0,
                response_time_count: 0,
            });
        company.total += 1;

        if record.is_responded() {
            total_responded += 1;
            company.responded += 1;

            if record.deadline_status() == Some(DeadlineStatus::WithinDeadline) {
                within_deadline += 1;
                company.within_deadline += 1;
            }
            if let Some(days) = record.response_time_days() {
                response_time_sum += days;
                response_time_count += 1;
                company.response_time_sum += days;
                company.response_time_count += 1;
            }
        } else {
            match record.status_pending() {
                Some(PendingStatus::OnTimeUnanswered) => in_deadline_not_responded += 1,
                Some(PendingStatus::OverdueUnanswered) => overdue_not_responded += 1,
                None => {}
            }
            if let Some(level) = record.alert_level() {
                *alert_breakdown.entry(level).or_insert(0) += 1;
            }
        }
    }

    let company_breakdown = companies
        .into_iter()
        .map(|(name, c)| {
            (
                name.to_string(),
                CompanyStats {
                    total: c.total,
                    responded: c.responded,
                    within_deadline: c.within_deadline,
                    avg_response_time_days: safe_mean(c.response_time_sum, c.response_time_count),
                },
            )
        })
        .collect();

    MetricsSummary {
        total_complaints,
        total_responded,
        responded_percentage: safe_percentage(total_responded, total_complaints),
        total_not_responded: total_complaints - total_responded,
        within_deadline,
        within_deadline_percentage: safe_percentage(within_deadline, total_responded),
        average_response_time: safe_mean(response_time_sum, response_time_count).unwrap_or(0.0),
        in_deadline_not_responded,
        overdue_not_responded,
        alert_breakdown,
        company_breakdown,
        processing_date,
    }
}
