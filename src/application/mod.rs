//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the screening, summary and reporting use cases.

mod reporting;
mod screening;
mod summary;

pub use reporting::ReportService;
pub use screening::{ScreeningOutcome, ScreeningService, SummaryOutcome};
pub use summary::{first_sentences, not_found_message, SummaryService};
