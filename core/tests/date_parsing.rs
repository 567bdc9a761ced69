//! Date parsing strategy tests: fixed format list, day-first bias,
//! fallback behavior and canonical round-tripping.

use chrono::{NaiveDate, NaiveDateTime};
use sladesk_core::dates::{format_date, parse_cell_date, parse_text_date};
use sladesk_core::CellValue;

fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Every documented input format parses to the expected calendar date.
#[test]
fn fixed_formats_all_parse() {
    let cases = [
        ("26/05/2025 16:33:46", date(2025, 5, 26).date()),
        ("26/05/2025 16:33", date(2025, 5, 26).date()),
        ("09/06/2025", date(2025, 6, 9).date()),
        ("26-05-2025 16:33:46", date(2025, 5, 26).date()),
        ("26-05-2025 16:33", date(2025, 5, 26).date()),
        ("09-06-2025", date(2025, 6, 9).date()),
        ("26/05/25 16:33:46", date(2025, 5, 26).date()),
        ("26/05/25 16:33", date(2025, 5, 26).date()),
        ("09/06/25", date(2025, 6, 9).date()),
        ("2025-06-09 16:33:46", date(2025, 6, 9).date()),
        ("2025-06-09 16:33", date(2025, 6, 9).date()),
        ("2025-06-09", date(2025, 6, 9).date()),
        ("2025/06/09 16:33:46", date(2025, 6, 9).date()),
        ("2025/06/09 16:33", date(2025, 6, 9).date()),
        ("2025/06/09", date(2025, 6, 9).date()),
    ];

    for (input, expected) in cases {
        let parsed = parse_text_date(input)
            .unwrap_or_else(|| panic!("'{input}' should parse"));
        assert_eq!(parsed.date(), expected, "wrong date for '{input}'");
    }
}

/// The domain convention is day/month/year: "03/04/2025" is April 3rd,
/// never March 4th.
#[test]
fn ambiguous_numeric_dates_are_day_first() {
    let parsed = parse_text_date("03/04/2025").expect("should parse");
    assert_eq!(parsed.date(), date(2025, 4, 3).date());
}

/// Month-first is only reached when the day-first reading is impossible.
#[test]
fn month_first_only_when_day_first_impossible() {
    let parsed = parse_text_date("04/13/2025").expect("should parse");
    assert_eq!(
        parsed.date(),
        date(2025, 4, 13).date(),
        "13 cannot be a month, so 04/13 must be April 13th"
    );
}

/// Time-of-day survives parsing when present.
#[test]
fn time_of_day_is_preserved() {
    let parsed = parse_text_date("26/05/2025 16:33:46").expect("should parse");
    assert_eq!(
        parsed,
        NaiveDate::from_ymd_opt(2025, 5, 26)
            .unwrap()
            .and_hms_opt(16, 33, 46)
            .unwrap()
    );
}

/// Two-digit years expand like chrono's %y: 00-68 into the 2000s.
#[test]
fn two_digit_years_expand_to_current_century() {
    let parsed = parse_text_date("09/06/25").expect("should parse");
    assert_eq!(parsed.date(), date(2025, 6, 9).date());

    let parsed = parse_text_date("09/06/99").expect("should parse");
    assert_eq!(parsed.date(), date(1999, 6, 9).date());
}

/// The fallback covers separators and widths the fixed list misses.
#[test]
fn fallback_handles_dotted_and_single_digit_dates() {
    let parsed = parse_text_date("3.4.2025").expect("dotted date should parse");
    assert_eq!(parsed.date(), date(2025, 4, 3).date());

    let parsed = parse_text_date("3.4.25 16:33").expect("should parse");
    assert_eq!(parsed.date(), date(2025, 4, 3).date());
    assert_eq!(parsed.time(), chrono::NaiveTime::from_hms_opt(16, 33, 0).unwrap());
}

/// Native date-time cells pass through untouched; numbers and junk text
/// are treated as absent, not as errors.
#[test]
fn cell_values_parse_by_type() {
    let dt = date(2025, 5, 26);
    assert_eq!(parse_cell_date(&CellValue::DateTime(dt)), Some(dt));
    assert_eq!(parse_cell_date(&CellValue::Number(45_000.0)), None);
    assert_eq!(parse_cell_date(&CellValue::Empty), None);
    assert_eq!(parse_cell_date(&CellValue::Text("soon".into())), None);
    assert_eq!(parse_cell_date(&CellValue::Text("".into())), None);
}

/// Formatting a parsed date back to the canonical display form and
/// re-parsing yields the same calendar date for every supported format.
#[test]
fn display_form_round_trips() {
    let inputs = [
        "26/05/2025 16:33:46",
        "09/06/2025",
        "26-05-2025",
        "09/06/25",
        "2025-06-09",
        "2025/06/09 16:33",
        "3.4.2025",
        "04/13/2025",
    ];

    for input in inputs {
        let parsed = parse_text_date(input).unwrap_or_else(|| panic!("'{input}' should parse"));
        let display = format_date(parsed);
        let reparsed = parse_text_date(&display)
            .unwrap_or_else(|| panic!("display form '{display}' should re-parse"));
        assert_eq!(
            reparsed.date(),
            parsed.date(),
            "round-trip changed the date for '{input}'"
        );
    }
}
