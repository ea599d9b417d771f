//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides:
//! - English and Kiswahili checklist tabs
//! - Free-text symptom reports
//! - Result view with the malaria summary

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use worker::{JobKind, Worker, WorkerHandle, WorkerProgress};
