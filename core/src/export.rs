//! Export assembly: turns records and metrics into the plain tabular
//! sections an external exporter renders into a downloadable spreadsheet.
//! The core builds complete, internally consistent sections; it never
//! touches the filesystem.

use crate::{
    dates::{format_date, format_datetime},
    metrics::MetricsSummary,
    record::{AlertLevel, ComplaintRecord},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One export section: a sheet name, a header row and string-rendered
/// data rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The full set of sections, in render order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportWorkbook {
    pub sheets: Vec<ExportSheet>,
}

/// Render a number with one decimal place, the display convention for
/// percentages and means.
fn format_number(value: f64) -> String {
    format!("{value:.1}")
}

/// Assemble the four export sections: processed records, metric summary
/// lines, per-company rollup, and the company x alert-level cross-tab.
pub fn build_workbook(records: &[ComplaintRecord], metrics: &MetricsSummary) -> ExportWorkbook {
    ExportWorkbook {
        sheets: vec![
            records_sheet(records),
            metrics_sheet(metrics),
            company_sheet(metrics),
            alert_summary_sheet(records),
        ],
    }
}

fn records_sheet(records: &[ComplaintRecord]) -> ExportSheet {
    let header = [
        "Case ID",
        "Company",
        "Opening Date",
        "Deadline Date",
        "Response Date",
        "Status",
        "Response Time (days)",
        "Deadline Status",
        "Days to Deadline",
        "Pending Status",
        "Alert Level",
        "Source File",
        "Source Row",
    ]
    .map(String::from)
    .to_vec();

    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.case_id.clone(),
                r.company_name.clone(),
                format_date(r.opening_date),
                format_date(r.deadline_date),
                r.response_date().map(format_date).unwrap_or_default(),
                if r.is_responded() {
                    "Responded".to_string()
                } else {
                    "Not responded".to_string()
                },
                r.response_time_days()
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                r.deadline_status()
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                r.days_to_deadline()
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                r.status_pending()
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                r.alert_level().map(|a| a.to_string()).unwrap_or_default(),
                r.source_file.clone(),
                r.source_row.to_string(),
            ]
        })
        .collect();

    ExportSheet {
        name: "Processed Data".to_string(),
        header,
        rows,
    }
}

fn metrics_sheet(metrics: &MetricsSummary) -> ExportSheet {
    let mut rows = vec![
        vec!["GENERAL METRICS".to_string(), String::new()],
        vec![
            "Total Complaints".to_string(),
            metrics.total_complaints.to_string(),
        ],
        vec![
            "Total Responded".to_string(),
            format!(
                "{} ({}%)",
                metrics.total_responded,
                format_number(metrics.responded_percentage)
            ),
        ],
        vec![
            "Total Not Responded".to_string(),
            metrics.total_not_responded.to_string(),
        ],
        vec![
            "Average Response Time".to_string(),
            format!("{} days", format_number(metrics.average_response_time)),
        ],
        vec![String::new(), String::new()],
        vec!["DEADLINE COMPLIANCE".to_string(), String::new()],
        vec![
            "Responded Within Deadline".to_string(),
            format!(
                "{} ({}%)",
                metrics.within_deadline,
                format_number(metrics.within_deadline_percentage)
            ),
        ],
        vec![
            "Responded Past Deadline".to_string(),
            (metrics.total_responded - metrics.within_deadline).to_string(),
        ],
        vec![String::new(), String::new()],
        vec!["PENDING".to_string(), String::new()],
        vec![
            "On Time (Not Responded)".to_string(),
            metrics.in_deadline_not_responded.to_string(),
        ],
        vec![
            "Overdue (Not Responded)".to_string(),
            metrics.overdue_not_responded.to_string(),
        ],
        vec![String::new(), String::new()],
        vec!["DEADLINE ALERTS".to_string(), String::new()],
    ];

    for (level, count) in &metrics.alert_breakdown {
        rows.push(vec![level.to_string(), count.to_string()]);
    }

    rows.push(vec![String::new(), String::new()]);
    rows.push(vec![
        "Processing Date".to_string(),
        format_datetime(metrics.processing_date),
    ]);

    ExportSheet {
        name: "Metrics".to_string(),
        header: vec!["Metric".to_string(), "Value".to_string()],
        rows,
    }
}

fn company_sheet(metrics: &MetricsSummary) -> ExportSheet {
    let rows = metrics
        .company_breakdown
        .iter()
        .map(|(name, stats)| {
            vec![
                name.clone(),
                stats.total.to_string(),
                stats.responded.to_string(),
                stats.within_deadline.to_string(),
                stats
                    .avg_response_time_days
                    .map(format_number)
                    .unwrap_or_default(),
            ]
        })
        .collect();

    ExportSheet {
        name: "By Company".to_string(),
        header: [
            "Company",
            "Total",
            "Responded",
            "Within Deadline",
            "Avg Response Time (days)",
        ]
        .map(String::from)
        .to_vec(),
        rows,
    }
}

/// Company x alert-level cross-tabulation over unanswered complaints.
/// Only levels actually present get a column; companies with no open
/// alerts still appear with zero counts when they have records.
fn alert_summary_sheet(records: &[ComplaintRecord]) -> ExportSheet {
    let mut table: BTreeMap<&str, BTreeMap<AlertLevel, u64>> = BTreeMap::new();
    for record in records {
        let row = table.entry(record.company_name.as_str()).or_default();
        if let Some(level) = record.alert_level() {
            *row.entry(level).or_insert(0) += 1;
        }
    }

    let levels: Vec<AlertLevel> = AlertLevel::ALL
        .into_iter()
        .filter(|level| table.values().any(|row| row.contains_key(level)))
        .collect();

    let mut header = vec!["Company".to_string()];
    header.extend(levels.iter().map(|l| l.to_string()));

    let rows = table
        .iter()
        .map(|(company, counts)| {
            let mut row = vec![company.to_string()];
            row.extend(
                levels
                    .iter()
                    .map(|level| counts.get(level).copied().unwrap_or(0).to_string()),
            );
            row
        })
        .collect();

    ExportSheet {
        name: "Alert Summary".to_string(),
        header,
        rows,
    }
}
