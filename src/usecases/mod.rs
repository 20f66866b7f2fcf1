//! Application use cases. Orchestrate domain logic via ports.

pub mod analysis_service;
pub mod report_parser;

pub use analysis_service::{AnalysisService, SubmissionForm, UploadedFile};
pub use report_parser::parse_report;
