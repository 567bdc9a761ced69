//! SLA Desk core: complaint normalization and SLA metrics.
//!
//! PIPELINE (fixed, two entry points):
//!   1. `Normalizer::normalize` turns one raw tabular block plus a field
//!      mapping into canonical complaint records and exclusion messages.
//!      Blocks are independent; the only merge point is concatenating
//!      their record lists.
//!   2. `metrics::aggregate` folds the unioned records into one
//!      consolidated summary.
//!
//! RULES:
//!   - The processing instant is captured once per batch, at
//!     `Normalizer` construction, and shared by every row.
//!   - Data-quality problems become returned strings, never errors.
//!   - File reading and spreadsheet rendering live with external
//!     collaborators (see the `sla-runner` tool); the core only consumes
//!     `TableBlock`s and produces plain data.

pub mod dates;
pub mod error;
pub mod export;
pub mod mapping;
pub mod metrics;
pub mod normalizer;
pub mod quality;
pub mod record;
pub mod table;
pub mod types;

pub use error::{AnalysisError, AnalysisResult};
pub use mapping::FieldMapping;
pub use metrics::{aggregate, CompanyStats, MetricsSummary};
pub use normalizer::Normalizer;
pub use record::{AlertLevel, ComplaintRecord, DeadlineStatus, Outcome, PendingStatus};
pub use table::{CellValue, TableBlock};
