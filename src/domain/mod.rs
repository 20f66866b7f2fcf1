//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod report;

pub use entities::{
    AnalysisRequest, AnalysisResult, ApiCredential, BudgetRange, EncodedImage, ImageKind,
    RoofImage, BUDGET_CEILING, BUDGET_FLOOR,
};
pub use errors::{DomainError, ErrorKind};
pub use report::{ParsedReport, ReportSection, SolarReport};
