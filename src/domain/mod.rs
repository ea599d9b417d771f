//! Domain layer: Core screening types and logic.
//!
//! Pure Rust types with no I/O. Everything here is constructed per
//! interaction and never persisted.

mod bundle;
mod catalog;
mod features;
mod report;
mod verdict;

pub use bundle::{BundleError, ModelBundle, BUILTIN_BUNDLES};
pub use catalog::{CatalogError, Language, SymptomCatalog};
pub use features::{encode, FeatureVector, Selection};
pub use report::{ReportError, SymptomReport, MAX_REPORT_CHARS, REPORT_SUBJECT};
pub use verdict::{Assessment, DecisionError, DecisionPolicy, Score, Verdict};
