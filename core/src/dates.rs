//! Date parsing for heterogeneous spreadsheet input.
//!
//! Strategy order is fixed and deterministic:
//!   1. Native `DateTime` cells pass through untouched.
//!   2. A fixed format list, day-first before month-first and ISO, since
//!      the domain's primary convention is day/month/year.
//!   3. A tolerant numeric fallback that still prefers the day-first
//!      reading and only swaps to month-first when day-first is
//!      impossible (middle component > 12).
//!
//! Anything that survives none of the strategies is treated as absent,
//! never as an error.

use crate::table::CellValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Canonical display form, `dd/mm/YYYY`. Re-parsing this yields the same
/// calendar date for every supported input format.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
pub const DISPLAY_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// The fixed format list, tried in order. `true` marks formats that carry
/// a time-of-day component.
const TEXT_FORMATS: &[(&str, bool)] = &[
    ("%d/%m/%Y %H:%M:%S", true),  // 26/05/2025 16:33:46
    ("%d/%m/%Y %H:%M", true),     // 26/05/2025 16:33
    ("%d/%m/%Y", false),          // 09/06/2025
    ("%d-%m-%Y %H:%M:%S", true),  // 26-05-2025 16:33:46
    ("%d-%m-%Y %H:%M", true),     // 26-05-2025 16:33
    ("%d-%m-%Y", false),          // 09-06-2025
    ("%d/%m/%y %H:%M:%S", true),  // 26/05/25 16:33:46
    ("%d/%m/%y %H:%M", true),     // 26/05/25 16:33
    ("%d/%m/%y", false),          // 09/06/25
    ("%Y-%m-%d %H:%M:%S", true),  // ISO
    ("%Y-%m-%d %H:%M", true),
    ("%Y-%m-%d", false),
    ("%m/%d/%Y %H:%M:%S", true),  // US order, only reached when
    ("%m/%d/%Y %H:%M", true),     // day-first readings fail
    ("%m/%d/%Y", false),
    ("%Y/%m/%d %H:%M:%S", true),
    ("%Y/%m/%d %H:%M", true),
    ("%Y/%m/%d", false),
];

/// Parse one cell into a date-time, or `None` if the cell holds nothing
/// date-like. Numbers are rejected: spreadsheet serial dates are the
/// reader collaborator's job to materialize as `DateTime` cells.
pub fn parse_cell_date(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Text(s) => parse_text_date(s),
        CellValue::Number(_) | CellValue::Empty => None,
    }
}

/// Parse a text value through the ordered strategy list.
pub fn parse_text_date(raw: &str) -> Option<NaiveDateTime> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    for (format, has_time) in TEXT_FORMATS {
        let parsed = if *has_time {
            NaiveDateTime::parse_from_str(text, format).ok()
        } else {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        };
        // %Y happily consumes 2-digit years as year 00xx, which would
        // shadow the %y formats further down the list. Treat such a
        // parse as a miss and keep trying.
        if let Some(dt) = parsed {
            if chrono::Datelike::year(&dt) >= 100 {
                return Some(dt);
            }
        }
    }

    parse_fallback(text)
}

/// Last-resort tolerant parser for numeric dates the fixed list missed
/// (e.g. dotted separators: "3.4.2025", "26.05.25 16:33").
///
/// Tie-break policy: a leading 4-digit component forces year-month-day;
/// otherwise the first two components read as day, month, swapped only
/// when that reading is impossible.
fn parse_fallback(text: &str) -> Option<NaiveDateTime> {
    let (date_part, time_part) = match text.split_once(' ') {
        Some((d, t)) => (d, Some(t.trim())),
        None => (text, None),
    };

    let tokens: Vec<&str> = date_part
        .split(['/', '-', '.'])
        .map(str::trim)
        .collect();
    if tokens.len() != 3 || tokens.iter().any(|t| t.is_empty()) {
        return None;
    }

    let nums: Vec<i32> = tokens
        .iter()
        .map(|t| t.parse::<i32>().ok())
        .collect::<Option<Vec<_>>>()?;

    let date = if tokens[0].len() == 4 {
        NaiveDate::from_ymd_opt(nums[0], nums[1] as u32, nums[2] as u32)?
    } else {
        let year = expand_year(nums[2], tokens[2].len());
        let (day, month) = if nums[1] > 12 && nums[0] <= 12 {
            (nums[1], nums[0]) // day-first impossible, swap
        } else {
            (nums[0], nums[1])
        };
        NaiveDate::from_ymd_opt(year, month as u32, day as u32)?
    };

    let time = match time_part {
        Some(t) => parse_time(t)?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };

    Some(date.and_time(time))
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

/// Two-digit years follow chrono's %y convention: 00-68 land in the
/// 2000s, 69-99 in the 1900s.
fn expand_year(value: i32, digits: usize) -> i32 {
    if digits >= 3 {
        return value;
    }
    if value <= 68 {
        2000 + value
    } else {
        1900 + value
    }
}

/// Render the canonical display form of a date (date portion only).
pub fn format_date(dt: NaiveDateTime) -> String {
    dt.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Render the canonical display form including time-of-day.
pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(DISPLAY_DATETIME_FORMAT).to_string()
}
