//! Infrastructure adapters. Implement ports.
//!
//! Completion endpoint, image encoding, web UI. Map errors to DomainError.

pub mod ai;
pub mod imaging;
pub mod ui;
