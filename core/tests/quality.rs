//! Data-quality pre-scan tests: column statistics, critical-data issues
//! and the guarantee that scanning predicts but never changes
//! normalization.

use chrono::{NaiveDate, NaiveDateTime};
use sladesk_core::{quality::scan_quality, CellValue, FieldMapping, Normalizer, TableBlock};

fn instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 20)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn mapping() -> FieldMapping {
    FieldMapping {
        id_case: "ID".into(),
        opening_date: "Opened".into(),
        deadline_date: "Deadline".into(),
        company_name: "Company".into(),
        response_date: None,
    }
}

fn block(rows: &[[&str; 4]]) -> TableBlock {
    let cells = rows
        .iter()
        .map(|r| {
            r.iter()
                .map(|s| {
                    if s.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(s.to_string())
                    }
                })
                .collect()
        })
        .collect();
    TableBlock::from_rows(
        vec![
            "ID".into(),
            "Opened".into(),
            "Deadline".into(),
            "Company".into(),
        ],
        cells,
    )
}

/// Column statistics count missing and unique values per logical role.
#[test]
fn column_stats_count_missing_and_unique() {
    let block = block(&[
        ["C-1", "01/05/2025", "10/05/2025", "Acme"],
        ["", "01/05/2025", "10/05/2025", "Acme"],
        ["C-3", "", "10/05/2025", "Birch"],
    ]);
    let report = scan_quality(&block, &mapping());

    let ids = &report.column_stats["id_case"];
    assert_eq!(ids.total_values, 3);
    assert_eq!(ids.missing_count, 1);
    assert_eq!(ids.unique_values, 2);
    assert!((ids.valid_percentage - 66.666).abs() < 0.01);

    let companies = &report.column_stats["company_name"];
    assert_eq!(companies.missing_count, 0);
    assert_eq!(companies.unique_values, 2);

    // Unbound optional role produces no stats entry.
    assert!(!report.column_stats.contains_key("response_date"));
}

/// Missing critical cells surface as issues and cap the processable-row
/// estimate.
#[test]
fn critical_missing_data_is_reported() {
    let block = block(&[
        ["C-1", "01/05/2025", "10/05/2025", "Acme"],
        ["", "01/05/2025", "10/05/2025", "Acme"],
        ["C-3", "", "10/05/2025", "Birch"],
    ]);
    let report = scan_quality(&block, &mapping());

    assert_eq!(report.total_rows, 3);
    assert_eq!(report.processable_rows, 1);
    assert_eq!(report.issues.len(), 2, "one issue per critical column with gaps");
    assert!(report.issues.iter().any(|i| i.contains("id_case")));
    assert!(report.issues.iter().any(|i| i.contains("opening_date")));
}

/// Unreadable date samples are flagged per column.
#[test]
fn unparseable_date_samples_are_flagged() {
    let block = block(&[
        ["C-1", "soon", "10/05/2025", "Acme"],
        ["C-2", "whenever", "10/05/2025", "Acme"],
    ]);
    let report = scan_quality(&block, &mapping());

    assert_eq!(report.date_parsing_issues.len(), 1);
    assert!(
        report.date_parsing_issues[0].contains("2/2"),
        "both sampled values failed: {}",
        report.date_parsing_issues[0]
    );
}

/// A clean block scans clean.
#[test]
fn clean_block_has_no_issues() {
    let block = block(&[
        ["C-1", "01/05/2025", "10/05/2025", "Acme"],
        ["C-2", "02/05/2025", "11/05/2025", "Birch"],
    ]);
    let report = scan_quality(&block, &mapping());

    assert!(report.issues.is_empty());
    assert!(report.date_parsing_issues.is_empty());
    assert_eq!(report.processable_rows, 2);
}

/// Scanning is read-only: normalization over the same block yields the
/// same records whether or not a scan ran first, and never more records
/// than the processable estimate.
#[test]
fn scan_never_changes_normalization() {
    let block = block(&[
        ["C-1", "01/05/2025", "10/07/2025", "Acme"],
        ["", "01/05/2025", "10/07/2025", "Acme"],
        ["C-3", "junk", "10/07/2025", "Birch"],
    ]);
    let normalizer = Normalizer::at(instant());

    let (before, _) = normalizer.normalize(&block, &mapping(), "q.csv");
    let report = scan_quality(&block, &mapping());
    let (after, _) = normalizer.normalize(&block, &mapping(), "q.csv");

    assert_eq!(before, after);
    assert!(before.len() <= report.processable_rows);
}

/// Mapped columns absent from the block are skipped; mapping validity is
/// the normalizer's call.
#[test]
fn absent_columns_are_skipped_not_fatal() {
    let block = block(&[["C-1", "01/05/2025", "10/05/2025", "Acme"]]);
    let mut mapping = mapping();
    mapping.company_name = "Vendor".into();
    let report = scan_quality(&block, &mapping);

    assert!(!report.column_stats.contains_key("company_name"));
    assert!(report.column_stats.contains_key("id_case"));
}
