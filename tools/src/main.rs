//! sla-runner: headless complaint SLA analysis over CSV exports.
//!
//! Usage:
//!   sla-runner --input complaints.csv \
//!       --map-id "Case ID" --map-opened "Opened" \
//!       --map-deadline "Deadline" --map-company "Company" \
//!       [--map-response "Responded At"] [--header-row 1] \
//!       [--export out.json] [--quality]
//!
//! The column mapping can also be loaded from a JSON file with
//! --map-file map.json instead of the individual --map-* flags.
//!
//! Repeat --input to analyze several files as one batch; all of them
//! share a single processing instant.

use anyhow::{Context, Result};
use sladesk_core::{
    export::build_workbook,
    metrics::{aggregate, MetricsSummary},
    quality::scan_quality,
    CellValue, ComplaintRecord, FieldMapping, Normalizer, TableBlock,
};
use std::env;
use std::fs::File;
use std::path::Path;

#[derive(serde::Serialize)]
struct RunReport<'a> {
    metrics: &'a MetricsSummary,
    warnings: &'a [String],
    workbook: sladesk_core::export::ExportWorkbook,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let inputs = collect_args(&args, "--input");
    if inputs.is_empty() {
        eprintln!("error: at least one --input <file.csv> is required");
        print_usage();
        std::process::exit(2);
    }

    let mapping = match optional_arg(&args, "--map-file") {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {path}"))?;
            FieldMapping::from_json(&text).with_context(|| format!("invalid mapping in {path}"))?
        }
        None => FieldMapping {
            id_case: required_arg(&args, "--map-id")?,
            opening_date: required_arg(&args, "--map-opened")?,
            deadline_date: required_arg(&args, "--map-deadline")?,
            company_name: required_arg(&args, "--map-company")?,
            response_date: optional_arg(&args, "--map-response"),
        },
    };
    let header_row: usize = parse_arg(&args, "--header-row", 1);
    let export_path = optional_arg(&args, "--export");
    let show_quality = args.iter().any(|a| a == "--quality");

    // One normalizer for the whole batch so every block shares the same
    // processing instant.
    let normalizer = Normalizer::new();
    let mut records: Vec<ComplaintRecord> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for input in &inputs {
        let label = Path::new(input)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.clone());
        let block = read_csv_block(input, header_row)
            .with_context(|| format!("failed to read {input}"))?;

        if show_quality {
            print_quality(&label, &block, &mapping);
        }

        let (mut block_records, block_errors) = normalizer.normalize(&block, &mapping, &label);
        log::info!(
            "{label}: {} records, {} warnings",
            block_records.len(),
            block_errors.len()
        );
        records.append(&mut block_records);
        warnings.extend(block_errors);
    }

    let metrics = aggregate(&records, normalizer.processing_instant());
    print_summary(&metrics, &warnings);

    if let Some(path) = export_path {
        let report = RunReport {
            metrics: &metrics,
            warnings: &warnings,
            workbook: build_workbook(&records, &metrics),
        };
        let file = File::create(&path).with_context(|| format!("failed to create {path}"))?;
        serde_json::to_writer_pretty(file, &report)?;
        println!("\nexport written to {path}");
    }

    Ok(())
}

/// Read one CSV file into a `TableBlock`. `header_row` is 1-based; rows
/// above it are discarded, the row itself supplies the column names.
fn read_csv_block(path: &str, header_row: usize) -> Result<TableBlock> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<CellValue>> = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let row_num = idx + 1;
        if row_num < header_row {
            continue;
        }
        if row_num == header_row {
            columns = record.iter().map(|f| f.trim().to_string()).collect();
            continue;
        }
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    anyhow::ensure!(!columns.is_empty(), "no header row found in {path}");
    let block = TableBlock::from_rows(columns, rows);
    log::debug!(
        "{path}: {} columns, {} data rows",
        block.columns().len(),
        block.row_count()
    );
    Ok(block)
}

fn print_quality(label: &str, block: &TableBlock, mapping: &FieldMapping) {
    let report = scan_quality(block, mapping);
    println!("=== QUALITY: {label} ===");
    println!(
        "  rows: {} total, {} processable",
        report.total_rows, report.processable_rows
    );
    for issue in report.issues.iter().chain(&report.date_parsing_issues) {
        println!("  ! {issue}");
    }
    for (role, stats) in &report.column_stats {
        println!(
            "  {role:<14} missing={:<4} unique={:<5} valid={:.1}%",
            stats.missing_count, stats.unique_values, stats.valid_percentage
        );
    }
    println!();
}

fn print_summary(metrics: &MetricsSummary, warnings: &[String]) {
    println!("=== RUN SUMMARY ===");
    println!("  total complaints:  {}", metrics.total_complaints);
    println!(
        "  responded:         {} ({:.1}%)",
        metrics.total_responded, metrics.responded_percentage
    );
    println!("  not responded:     {}", metrics.total_not_responded);
    println!(
        "  within deadline:   {} ({:.1}% of responded)",
        metrics.within_deadline, metrics.within_deadline_percentage
    );
    println!(
        "  avg response time: {:.1} days",
        metrics.average_response_time
    );
    println!(
        "  pending on time:   {}",
        metrics.in_deadline_not_responded
    );
    println!("  pending overdue:   {}", metrics.overdue_not_responded);

    if !metrics.alert_breakdown.is_empty() {
        println!();
        println!("=== ALERTS ===");
        for (level, count) in &metrics.alert_breakdown {
            let label = level.to_string();
            println!("  {label:<22} {count}");
        }
    }

    if !metrics.company_breakdown.is_empty() {
        println!();
        println!("=== BY COMPANY ===");
        for (company, stats) in &metrics.company_breakdown {
            let avg = stats
                .avg_response_time_days
                .map(|d| format!("{d:.1}"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {company} | total: {} | responded: {} | within deadline: {} | avg days: {avg}",
                stats.total, stats.responded, stats.within_deadline
            );
        }
    }

    if !warnings.is_empty() {
        println!();
        println!("=== WARNINGS ({}) ===", warnings.len());
        for warning in warnings {
            println!("  - {warning}");
        }
    }
}

fn print_usage() {
    eprintln!(
        "usage: sla-runner --input <file.csv> [--input <file2.csv> ...] \\\n\
         \x20          --map-id <col> --map-opened <col> --map-deadline <col> \\\n\
         \x20          --map-company <col> [--map-response <col>] \\\n\
         \x20          [--map-file map.json] [--header-row N] \\\n\
         \x20          [--export out.json] [--quality]"
    );
}

fn collect_args(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].clone())
        .collect()
}

fn optional_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn required_arg(args: &[String], flag: &str) -> Result<String> {
    optional_arg(args, flag).ok_or_else(|| {
        print_usage();
        anyhow::anyhow!("missing required argument {flag}")
    })
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
