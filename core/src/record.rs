//! Canonical complaint record and its status taxonomy.
//!
//! The responded/not-responded split is a variant type, so the invariant
//! "deadline_status only when responded, pending/alert fields only when
//! unanswered" is unrepresentable to violate.

use crate::types::{RowNumber, SourceLabel};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deadline compliance for complaints that received a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    WithinDeadline,
    PastDeadline,
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineStatus::WithinDeadline => write!(f, "Within deadline"),
            DeadlineStatus::PastDeadline => write!(f, "Past deadline"),
        }
    }
}

/// Pending classification for complaints still awaiting a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingStatus {
    OnTimeUnanswered,
    OverdueUnanswered,
}

impl fmt::Display for PendingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingStatus::OnTimeUnanswered => write!(f, "On time, unanswered"),
            PendingStatus::OverdueUnanswered => write!(f, "Overdue, unanswered"),
        }
    }
}

/// Urgency bucket for unanswered complaints, by days remaining until the
/// deadline. `Overdue` is assigned directly when the deadline has passed
/// and never goes through the threshold table. Ordering follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Overdue,
    Urgent,
    Warning,
    Attention,
    Flexible,
}

impl AlertLevel {
    /// The fixed threshold table. Thresholds are deliberately not
    /// configurable.
    pub fn for_days_remaining(days: i64) -> AlertLevel {
        match days {
            d if d < 0 => AlertLevel::Overdue,
            d if d <= 1 => AlertLevel::Urgent,
            2..=3 => AlertLevel::Warning,
            4 => AlertLevel::Attention,
            _ => AlertLevel::Flexible,
        }
    }

    pub const ALL: [AlertLevel; 5] = [
        AlertLevel::Overdue,
        AlertLevel::Urgent,
        AlertLevel::Warning,
        AlertLevel::Attention,
        AlertLevel::Flexible,
    ];
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::Overdue => write!(f, "Overdue"),
            AlertLevel::Urgent => write!(f, "Urgent (<= 1 day)"),
            AlertLevel::Warning => write!(f, "Warning (2-3 days)"),
            AlertLevel::Attention => write!(f, "Attention (4 days)"),
            AlertLevel::Flexible => write!(f, "Flexible (>= 5 days)"),
        }
    }
}

/// The responded / not-responded split with only the applicable derived
/// fields present on each arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "complaint_status", rename_all = "snake_case")]
pub enum Outcome {
    Responded {
        response_date: NaiveDateTime,
        /// Whole days from opening to response. Negative when the source
        /// data is inconsistent; reported as-is, never corrected.
        response_time_days: i64,
        deadline_status: DeadlineStatus,
    },
    NotResponded {
        /// Whole calendar days from the processing instant to the
        /// deadline; negative once the deadline has passed.
        days_to_deadline: i64,
        status_pending: PendingStatus,
        alert_level: AlertLevel,
    },
}

/// One normalized complaint. Opening and deadline dates are always
/// present: rows missing either never become records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub case_id: String,
    pub company_name: String,
    pub opening_date: NaiveDateTime,
    pub deadline_date: NaiveDateTime,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub source_file: SourceLabel,
    pub source_row: RowNumber,
}

impl ComplaintRecord {
    pub fn is_responded(&self) -> bool {
        matches!(self.outcome, Outcome::Responded { .. })
    }

    pub fn response_date(&self) -> Option<NaiveDateTime> {
        match &self.outcome {
            Outcome::Responded { response_date, .. } => Some(*response_date),
            Outcome::NotResponded { .. } => None,
        }
    }

    pub fn response_time_days(&self) -> Option<i64> {
        match &self.outcome {
            Outcome::Responded {
                response_time_days, ..
            } => Some(*response_time_days),
            Outcome::NotResponded { .. } => None,
        }
    }

    pub fn deadline_status(&self) -> Option<DeadlineStatus> {
        match &self.outcome {
            Outcome::Responded {
                deadline_status, ..
            } => Some(*deadline_status),
            Outcome::NotResponded { .. } => None,
        }
    }

    pub fn days_to_deadline(&self) -> Option<i64> {
        match &self.outcome {
            Outcome::NotResponded {
                days_to_deadline, ..
            } => Some(*days_to_deadline),
            Outcome::Responded { .. } => None,
        }
    }

    pub fn status_pending(&self) -> Option<PendingStatus> {
        match &self.outcome {
            Outcome::NotResponded { status_pending, .. } => Some(*status_pending),
            Outcome::Responded { .. } => None,
        }
    }

    pub fn alert_level(&self) -> Option<AlertLevel> {
        match &self.outcome {
            Outcome::NotResponded { alert_level, .. } => Some(*alert_level),
            Outcome::Responded { .. } => None,
        }
    }
}
