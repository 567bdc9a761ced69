//! Shared primitive types used across the analysis pipeline.

/// 1-based row number within a source block, as shown to users.
pub type RowNumber = usize;

/// Provenance label for an input block, usually the source file name.
pub type SourceLabel = String;

/// Sentinel company name for rows whose company cell is empty or missing.
pub const UNIDENTIFIED_COMPANY: &str = "Unidentified";
